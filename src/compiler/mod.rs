//! Compiler infrastructure for SSA-based transformations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Compiler Pipeline                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  CompilerConfig            Iteration and sweep limits        │
//! │                                                              │
//! │  CompilerContext           Shared state for one run          │
//! │    ├─ EventLog             (append-only, lock-free)          │
//! │    ├─ processed functions  (DashSet)                         │
//! │    └─ fold sweep counters  (DashMap)                         │
//! │                                                              │
//! │  PassScheduler             Module-wide fixpoint execution    │
//! │    └─ each iteration runs every pass over every definition,  │
//! │       functions in parallel, until nothing changes           │
//! │                                                              │
//! │  FunctionPass trait        Interface for all passes          │
//! │    ├─ run_on_function()    Per-function transformation       │
//! │    ├─ initialize()         One-time setup before the run     │
//! │    └─ finalize()           Cleanup after the run             │
//! │                                                              │
//! │  Passes                                                      │
//! │    └─ ConstantFoldingPass  Binary operator folding           │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use ssafold::compiler::{CompilerConfig, CompilerContext, EventKind, PassScheduler};
//! use ssafold::ir::{FunctionBuilder, FunctionType, IrType, Module, Value};
//!
//! let mut module = Module::new("demo");
//! let callee = module.get_or_insert_function("f", FunctionType::new(vec![], IrType::I32))?;
//! let mut builder = FunctionBuilder::new(module.function_mut(&callee.name).unwrap());
//! let entry = builder.append_block("entry");
//! builder.position_at_end(entry);
//! let sum = builder.build_add(Value::i32(5), Value::i32(3), "sum")?;
//! builder.build_ret(Some(sum))?;
//!
//! let ctx = CompilerContext::new();
//! let mut scheduler = PassScheduler::standard(&CompilerConfig::default());
//! scheduler.run(&mut module, &ctx)?;
//!
//! assert_eq!(ctx.events.count_kind(EventKind::ConstantFolded), 1);
//! # Ok::<(), ssafold::Error>(())
//! ```

mod config;
mod context;
mod events;
mod pass;
mod passes;
mod scheduler;

pub use config::CompilerConfig;
pub use context::CompilerContext;
pub use events::{Event, EventBuilder, EventKind, EventLog};
pub use pass::FunctionPass;
pub use passes::{evaluate, fold_binary, ConstantFoldingPass, FoldStats};
pub use scheduler::PassScheduler;
