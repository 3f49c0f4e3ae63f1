//! Intermediate representation consumed and produced by the compiler passes.
//!
//! The IR is a conventional SSA form: a [`Module`] holds [`Function`]s, a function owns
//! [`BasicBlock`]s and an arena of [`Instruction`]s, and instruction operands are
//! [`Value`]s that reference literals, parameters or other instructions.
//!
//! # Key Components
//!
//! - [`ApInt`] - width-tagged arbitrary-precision integers with wraparound semantics
//! - [`IrType`] / [`FunctionType`] - value and signature types
//! - [`BinaryOp`] / [`CmpPredicate`] - opcode tags
//! - [`Function`] - arena, blocks and the use-list index
//! - [`FunctionBuilder`] - type-checked construction at an insertion point
//! - [`FunctionCfg`] - control flow graph view with reverse postorder
//! - [`verify`] - structural verification
//!
//! # Building a function
//!
//! ```rust
//! use ssafold::ir::{verify, FunctionBuilder, FunctionType, IrType, Module, Value};
//!
//! let mut module = Module::new("demo");
//! let callee = module.get_or_insert_function(
//!     "foo",
//!     FunctionType::new(vec![IrType::I32], IrType::I32),
//! )?;
//! let foo = module.function_mut(&callee.name).unwrap();
//!
//! let mut builder = FunctionBuilder::new(foo);
//! let entry = builder.append_block("entry");
//! builder.position_at_end(entry);
//! let doubled = builder.build_mul(builder.arg(0).unwrap(), Value::i32(2), "doubled")?;
//! builder.build_ret(Some(doubled))?;
//!
//! verify(module.function("foo").unwrap())?;
//! # Ok::<(), ssafold::Error>(())
//! ```

mod apint;
mod block;
mod builder;
mod cfg;
mod function;
mod instruction;
mod module;
mod opcode;
mod types;
mod value;
mod verify;

pub use apint::{ApInt, MAX_INT_WIDTH};
pub use block::{BasicBlock, BlockId};
pub use builder::{Callee, FunctionBuilder};
pub use cfg::FunctionCfg;
pub use function::{Function, Param};
pub use instruction::{InstId, InstKind, Instruction};
pub use module::Module;
pub use opcode::{BinaryOp, CmpPredicate};
pub use types::{FunctionType, IrType};
pub use value::{ParamId, Value};
pub use verify::verify;
