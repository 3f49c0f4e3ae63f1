//! The [`FunctionPass`] trait implemented by every transformation.

use crate::{compiler::CompilerContext, ir::Function, Result};

/// A transformation that runs on one function at a time.
///
/// Passes are shared between the worker threads of the [`PassScheduler`], so they take
/// `&self` while running; per-run state lives on the stack of
/// [`run_on_function`](FunctionPass::run_on_function) or in the [`CompilerContext`].
///
/// [`PassScheduler`]: crate::compiler::PassScheduler
pub trait FunctionPass: Send + Sync {
    /// Short identifier used in logs and events.
    fn name(&self) -> &'static str;

    /// Returns `false` to skip `function`. Declarations are never offered to a pass.
    fn should_run(&self, _function: &Function, _ctx: &CompilerContext) -> bool {
        true
    }

    /// Transforms `function` in place.
    ///
    /// Returns `Ok(true)` if the function changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the function is structurally invalid.
    fn run_on_function(&self, function: &mut Function, ctx: &CompilerContext) -> Result<bool>;

    /// Called once before the first iteration of the pipeline.
    ///
    /// # Errors
    ///
    /// Implementations may fail setup; the scheduler aborts the run.
    fn initialize(&mut self, _ctx: &CompilerContext) -> Result<()> {
        Ok(())
    }

    /// Called once after the pipeline finished.
    ///
    /// # Errors
    ///
    /// Implementations may fail cleanup; the scheduler reports it.
    fn finalize(&mut self, _ctx: &CompilerContext) -> Result<()> {
        Ok(())
    }

    /// One-line description of the transformation.
    fn description(&self) -> &'static str {
        "No description available"
    }
}
