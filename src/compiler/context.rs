//! Shared state for a pipeline run.

use std::time::{Duration, Instant};

use dashmap::{DashMap, DashSet};

use crate::compiler::EventLog;

/// State shared by every pass of a pipeline run.
///
/// All fields use interior mutability so the context can be handed out as `&self` to
/// passes running on different functions in parallel.
#[derive(Debug)]
pub struct CompilerContext {
    /// Transformations and diagnostics recorded by the passes.
    pub events: EventLog,
    /// Functions that at least one pass changed.
    pub processed_functions: DashSet<String>,
    /// Sweeps the constant folder needed per function, summed over runs.
    pub fold_sweeps: DashMap<String, usize>,
    start_time: Instant,
}

impl CompilerContext {
    /// Creates an empty context and starts its clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: EventLog::new(),
            processed_functions: DashSet::new(),
            fold_sweeps: DashMap::new(),
            start_time: Instant::now(),
        }
    }

    /// Time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Marks `function` as changed.
    pub fn mark_processed(&self, function: &str) {
        self.processed_functions.insert(function.to_string());
    }

    /// Returns `true` if a pass changed `function`.
    #[must_use]
    pub fn was_processed(&self, function: &str) -> bool {
        self.processed_functions.contains(function)
    }

    /// Adds `sweeps` to the running total of `function`.
    pub fn record_sweeps(&self, function: &str, sweeps: usize) {
        *self.fold_sweeps.entry(function.to_string()).or_insert(0) += sweeps;
    }

    /// Total sweeps recorded for `function`.
    #[must_use]
    pub fn sweeps(&self, function: &str) -> Option<usize> {
        self.fold_sweeps.get(function).map(|entry| *entry)
    }
}

impl Default for CompilerContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processed_tracking() {
        let ctx = CompilerContext::new();
        assert!(!ctx.was_processed("foo"));
        ctx.mark_processed("foo");
        ctx.mark_processed("foo");
        assert!(ctx.was_processed("foo"));
        assert_eq!(ctx.processed_functions.len(), 1);
    }

    #[test]
    fn test_sweeps_accumulate() {
        let ctx = CompilerContext::new();
        assert_eq!(ctx.sweeps("foo"), None);
        ctx.record_sweeps("foo", 2);
        ctx.record_sweeps("foo", 1);
        assert_eq!(ctx.sweeps("foo"), Some(3));
    }
}
