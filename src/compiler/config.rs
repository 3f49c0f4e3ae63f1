//! Pipeline configuration.

/// Knobs for a [`PassScheduler`](crate::compiler::PassScheduler) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Upper bound on pipeline iterations over the whole module.
    pub max_iterations: usize,
    /// Consecutive change-free iterations required before the pipeline stops early.
    pub stable_iterations: usize,
    /// Optional cap on constant folding sweeps per function. `None` runs to the
    /// fixpoint.
    pub max_fold_sweeps: Option<usize>,
    /// Run functions of a module on the rayon thread pool.
    pub parallel: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            stable_iterations: 1,
            max_fold_sweeps: None,
            parallel: true,
        }
    }
}

impl CompilerConfig {
    /// Configuration for deterministic single-threaded runs.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}
