//! Built-in function passes.
//!
//! Each pass implements [`FunctionPass`](crate::compiler::FunctionPass) and records the
//! modifications it makes in the context's [`EventLog`](crate::compiler::EventLog).
//!
//! | Pass | Description |
//! |------|-------------|
//! | [`ConstantFoldingPass`] | Folds binary operators over literal integers to a fixpoint |

mod constfold;

pub use constfold::{evaluate, fold_binary, ConstantFoldingPass, FoldStats};
