// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # ssafold
//!
//! Constant folding for a small SSA intermediate representation.
//!
//! `ssafold` provides an LLVM-flavoured IR (modules, functions, basic blocks, typed
//! instructions over arbitrary-width integers) together with a pass that evaluates
//! every binary operator whose operands are literal integers, replaces all uses of the
//! operator with the computed literal and erases it. The pass sweeps the reachable
//! blocks of a function in reverse postorder until a sweep folds nothing.
//!
//! ## Features
//!
//! - **Exact integer semantics** - two's-complement wraparound at any width up to
//!   [`ir::MAX_INT_WIDTH`] bits, backed by `num-bigint`
//! - **Poison for undefined results** - division and remainder by zero fold to
//!   [`ir::Value::Poison`] instead of trapping
//! - **Arena IR with use-lists** - replacing all uses is proportional to the number of
//!   users, and erasing an instruction while iterating a block is safe
//! - **Parallel pipeline** - [`compiler::PassScheduler`] runs passes over the functions
//!   of a module on the rayon thread pool and records every change in an event log
//!
//! ## Quick Start
//!
//! ```rust
//! use ssafold::prelude::*;
//!
//! let mut function = Function::new("answer", FunctionType::new(vec![], IrType::I32));
//! let mut builder = FunctionBuilder::new(&mut function);
//! let entry = builder.append_block("entry");
//! builder.position_at_end(entry);
//! let t1 = builder.build_add(Value::i32(2), Value::i32(2), "t1")?;
//! let t2 = builder.build_mul(t1, Value::i32(10), "t2")?;
//! builder.build_ret(Some(t2))?;
//!
//! assert!(ConstantFoldingPass::new().run(&mut function));
//! assert_eq!(
//!     function.to_string(),
//!     "define i32 @answer() {\nentry:\n  ret i32 40\n}\n"
//! );
//! # Ok::<(), ssafold::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`ir`] - the data model, builder, control flow graph view and verifier
//! - [`compiler`] - the pass trait, the constant folding pass, context, events and the
//!   scheduler
//! - [`utils`] - generic graph traits and traversals used by the CFG view
//!
//! ## Logging
//!
//! The crate logs through the `log` facade: every fold at `debug`, every sweep at
//! `trace`, scheduler summaries at `info` and hit iteration limits at `warn`. Install
//! any logger (for example `env_logger`) to see them.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use ssafold::prelude::*;
///
/// let pass = ConstantFoldingPass::with_max_sweeps(8);
/// assert_eq!(pass.max_sweeps(), Some(8));
/// ```
pub mod prelude;

/// The intermediate representation: modules, functions, blocks and instructions.
pub mod ir;

/// Pass infrastructure and the constant folding pass.
pub mod compiler;

/// Generic graph utilities.
pub mod utils;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
///
/// # Examples
///
/// ```rust
/// use ssafold::{ir::IrType, Result};
///
/// fn byte() -> Result<IrType> {
///     IrType::int(8)
/// }
/// # assert_eq!(byte().unwrap(), IrType::I8);
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `ssafold` Error type
///
/// The main error type for all operations in this crate. IR construction, mutation and
/// verification report failures through it; the constant folding pass itself never
/// fails on a well-formed function.
///
/// # Examples
///
/// ```rust
/// use ssafold::{ir::IrType, Error};
///
/// match IrType::int(0) {
///     Err(Error::InvalidWidth(width)) => println!("bad width {width}"),
///     Err(e) => println!("Error: {}", e),
///     Ok(ty) => println!("{ty}"),
/// }
/// ```
pub use error::Error;

/// Folds binary operators over literal integers to a fixpoint.
///
/// See [`compiler::ConstantFoldingPass`].
pub use compiler::ConstantFoldingPass;
