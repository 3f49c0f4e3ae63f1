//! Pass scheduler for running function passes over a module.
//!
//! The `PassScheduler` runs its passes in registration order over every defined
//! function of a [`Module`], repeating the whole sequence until an iteration changes
//! nothing or the iteration limit is hit. Functions are independent, so each pass is
//! applied to all functions of the module in parallel.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};
use rayon::prelude::*;

use crate::{
    compiler::{
        config::CompilerConfig, context::CompilerContext, pass::FunctionPass,
        passes::ConstantFoldingPass, EventKind,
    },
    ir::{Function, Module},
    Result,
};

/// Orchestrates function pass execution to a module-wide fixpoint.
pub struct PassScheduler {
    /// Maximum iterations for the entire pipeline.
    max_iterations: usize,
    /// Number of stable iterations before stopping.
    stable_iterations: usize,
    /// Process the functions of a module on the rayon pool.
    parallel: bool,
    /// Passes in execution order.
    passes: Vec<Box<dyn FunctionPass>>,
}

impl Default for PassScheduler {
    fn default() -> Self {
        Self::new(10, 1)
    }
}

impl PassScheduler {
    /// Creates an empty parallel scheduler with the specified iteration limits.
    ///
    /// # Arguments
    ///
    /// * `max_iterations` - Maximum iterations for the entire pipeline before stopping.
    /// * `stable_iterations` - Stop early if no changes for this many iterations.
    #[must_use]
    pub fn new(max_iterations: usize, stable_iterations: usize) -> Self {
        Self {
            max_iterations,
            stable_iterations: stable_iterations.max(1),
            parallel: true,
            passes: Vec::new(),
        }
    }

    /// Creates an empty scheduler from `config`.
    #[must_use]
    pub fn from_config(config: &CompilerConfig) -> Self {
        let mut scheduler = Self::new(config.max_iterations, config.stable_iterations);
        scheduler.parallel = config.parallel;
        scheduler
    }

    /// Creates a scheduler from `config` with the constant folding pass registered.
    #[must_use]
    pub fn standard(config: &CompilerConfig) -> Self {
        let mut scheduler = Self::from_config(config);
        scheduler.add_pass(Box::new(ConstantFoldingPass::from_config(config)));
        scheduler
    }

    /// Appends `pass` to the pipeline.
    pub fn add_pass(&mut self, pass: Box<dyn FunctionPass>) -> &mut Self {
        self.passes.push(pass);
        self
    }

    /// Names of the registered passes in execution order.
    #[must_use]
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    /// Runs every pass once over every defined function of `module`.
    ///
    /// Returns `true` if any pass made changes.
    fn run_passes_once(
        ctx: &CompilerContext,
        passes: &[Box<dyn FunctionPass>],
        module: &mut Module,
        parallel: bool,
    ) -> Result<bool> {
        let any_changed = AtomicBool::new(false);

        for pass in passes {
            let pass = pass.as_ref();
            ctx.events
                .record(EventKind::PassStarted)
                .pass(pass.name())
                .message(pass.description());

            let process = |function: &mut Function| -> Result<()> {
                if function.is_declaration() || !pass.should_run(function, ctx) {
                    return Ok(());
                }
                if pass.run_on_function(function, ctx)? {
                    any_changed.store(true, Ordering::Relaxed);
                    ctx.mark_processed(function.name());
                }
                Ok(())
            };

            if parallel {
                module.functions_mut().par_iter_mut().try_for_each(&process)?;
            } else {
                module.functions_mut().iter_mut().try_for_each(&process)?;
            }

            ctx.events.record(EventKind::PassCompleted).pass(pass.name());
        }

        Ok(any_changed.load(Ordering::Relaxed))
    }

    /// Runs the pipeline over `module` until it stops changing.
    ///
    /// # Returns
    ///
    /// The number of iterations completed. Events are accumulated in `ctx.events`.
    ///
    /// # Errors
    ///
    /// Returns an error if a pass fails to initialize, run or finalize.
    pub fn run(&mut self, module: &mut Module, ctx: &CompilerContext) -> Result<usize> {
        for pass in &mut self.passes {
            pass.initialize(ctx)?;
        }

        let mut stable_count = 0;
        let mut iterations = 0;

        for iteration in 0..self.max_iterations {
            iterations = iteration + 1;
            let changed = Self::run_passes_once(ctx, &self.passes, module, self.parallel)?;
            debug!(
                "module '{}': iteration {iterations} {}",
                module.name(),
                if changed { "changed" } else { "stable" }
            );

            if changed {
                stable_count = 0;
            } else {
                stable_count += 1;
                if stable_count >= self.stable_iterations {
                    break;
                }
            }
        }

        for pass in &mut self.passes {
            pass.finalize(ctx)?;
        }

        info!(
            "module '{}': {} after {iterations} iterations in {:?}",
            module.name(),
            ctx.events.summary(),
            ctx.elapsed()
        );
        Ok(iterations)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::{
        compiler::{
            context::CompilerContext, pass::FunctionPass, CompilerConfig, EventKind,
            PassScheduler,
        },
        ir::{Function, FunctionBuilder, FunctionType, IrType, Module, Value},
        Error, Result,
    };

    /// Reports a change on its first `changes` invocations per run.
    struct TestPass {
        name: &'static str,
        changes: usize,
        calls: AtomicUsize,
    }

    impl TestPass {
        fn new(name: &'static str, changes: usize) -> Self {
            Self {
                name,
                changes,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl FunctionPass for TestPass {
        fn name(&self) -> &'static str {
            self.name
        }

        fn run_on_function(&self, function: &mut Function, ctx: &CompilerContext) -> Result<bool> {
            let call = self.calls.fetch_add(1, Ordering::Relaxed);
            if call >= self.changes {
                return Ok(false);
            }
            ctx.events
                .record(EventKind::ConstantFolded)
                .function(function.name())
                .message("test");
            Ok(true)
        }
    }

    struct FailingPass;

    impl FunctionPass for FailingPass {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn run_on_function(
            &self,
            _function: &mut Function,
            _ctx: &CompilerContext,
        ) -> Result<bool> {
            Err(malformed_error!("broken function"))
        }
    }

    fn create_test_module() -> Module {
        let mut module = Module::new("test");
        for name in ["a", "b"] {
            let callee = module
                .get_or_insert_function(name, FunctionType::new(vec![], IrType::I32))
                .unwrap();
            let function = module.function_mut(&callee.name).unwrap();
            let mut builder = FunctionBuilder::new(function);
            let entry = builder.append_block("entry");
            builder.position_at_end(entry);
            builder.build_ret(Some(Value::i32(0))).unwrap();
        }
        module
            .get_or_insert_function("decl", FunctionType::new(vec![], IrType::Void))
            .unwrap();
        module
    }

    #[test]
    fn test_scheduler_iteration_limits() {
        let scheduler = PassScheduler::new(10, 3);
        assert_eq!(scheduler.max_iterations, 10);
        assert_eq!(scheduler.stable_iterations, 3);
        assert!(scheduler.parallel);
    }

    #[test]
    fn test_default_scheduler() {
        let scheduler = PassScheduler::default();
        assert_eq!(scheduler.max_iterations, 10);
        assert_eq!(scheduler.stable_iterations, 1);
        assert!(scheduler.pass_names().is_empty());
    }

    #[test]
    fn test_standard_registers_constant_folding() {
        let scheduler = PassScheduler::standard(&CompilerConfig::sequential());
        assert_eq!(scheduler.pass_names(), vec!["constant-folding"]);
        assert!(!scheduler.parallel);
    }

    #[test]
    fn test_pass_names() {
        let mut scheduler = PassScheduler::default();
        scheduler
            .add_pass(Box::new(TestPass::new("pass1", 0)))
            .add_pass(Box::new(TestPass::new("pass2", 0)));
        assert_eq!(scheduler.pass_names(), vec!["pass1", "pass2"]);
    }

    #[test]
    fn test_run_until_stable() {
        let mut module = create_test_module();
        let ctx = CompilerContext::new();
        let mut scheduler = PassScheduler::new(10, 1);
        // One change per defined function, all in the first iteration
        scheduler.add_pass(Box::new(TestPass::new("changer", 2)));

        let iterations = scheduler.run(&mut module, &ctx).unwrap();
        assert_eq!(iterations, 2);
        assert_eq!(ctx.events.count_kind(EventKind::ConstantFolded), 2);
        assert!(ctx.was_processed("a"));
        assert!(ctx.was_processed("b"));
        assert!(!ctx.was_processed("decl"));
        assert_eq!(ctx.events.count_kind(EventKind::PassStarted), 2);
    }

    #[test]
    fn test_iteration_limit() {
        let mut module = create_test_module();
        let ctx = CompilerContext::new();
        let mut scheduler = PassScheduler::new(3, 1);
        scheduler.add_pass(Box::new(TestPass::new("always", usize::MAX)));

        assert_eq!(scheduler.run(&mut module, &ctx).unwrap(), 3);
        assert_eq!(ctx.events.count_kind(EventKind::ConstantFolded), 6);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        for config in [CompilerConfig::default(), CompilerConfig::sequential()] {
            let mut module = create_test_module();
            let ctx = CompilerContext::new();
            let mut scheduler = PassScheduler::from_config(&config);
            scheduler.add_pass(Box::new(TestPass::new("changer", 2)));
            assert_eq!(scheduler.run(&mut module, &ctx).unwrap(), 2);
            assert_eq!(ctx.processed_functions.len(), 2);
        }
    }

    #[test]
    fn test_pass_error_propagates() {
        let mut module = create_test_module();
        let ctx = CompilerContext::new();
        let mut scheduler = PassScheduler::default();
        scheduler.add_pass(Box::new(FailingPass));
        assert!(matches!(
            scheduler.run(&mut module, &ctx),
            Err(Error::Malformed { .. })
        ));
    }
}
