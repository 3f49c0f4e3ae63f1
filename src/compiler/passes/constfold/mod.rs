//! Constant folding pass.
//!
//! Replaces every binary operator whose operands are both literal integers with the
//! literal it computes, redirects all uses of the old result to that literal, and
//! erases the operator. Folding one operator can make its users foldable, so the pass
//! sweeps the function until a sweep folds nothing.
//!
//! # Sweep order
//!
//! Each sweep visits the blocks reachable from the entry in reverse postorder,
//! recomputed at the start of the sweep. Definitions are therefore usually folded before
//! the blocks that use them, and a chain of dependent operators collapses within one
//! sweep. Blocks that cannot be reached from the entry are never visited.
//!
//! Within a block the pass walks a snapshot of the instruction list taken when the
//! block is entered. Erasing the current instruction never invalidates the cursor, and
//! every other snapshot entry is still live when it is reached.
//!
//! # Semantics
//!
//! | Operation         | Result                                     |
//! |-------------------|--------------------------------------------|
//! | add, sub, mul     | wraps modulo `2^width`                     |
//! | udiv, urem        | unsigned; poison for a zero divisor        |
//! | sdiv, srem        | truncates toward zero; poison for zero     |
//! | shl, lshr         | `0` for an amount of `width` or more       |
//! | ashr              | sign fill for an amount of `width` or more |
//! | and, or, xor      | bitwise                                    |
//!
//! Operators reading poison, a parameter or another instruction are left alone, as are
//! all non-binary instructions.

mod evaluator;

use log::{debug, error, trace, warn};

pub use evaluator::{evaluate, fold_binary};

use crate::{
    compiler::{pass::FunctionPass, CompilerConfig, CompilerContext, EventKind, EventLog},
    ir::{BinaryOp, Function, FunctionCfg, InstId, Value},
    Result,
};

/// Outcome of running the pass on one function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoldStats {
    /// Sweeps performed, including the final one that folded nothing.
    pub sweeps: usize,
    /// Operators replaced, poison results included.
    pub folded: usize,
    /// Operators replaced by poison.
    pub poisoned: usize,
    /// Operators replaced in each sweep. When `converged` is set the last entry is the
    /// fold-free sweep that confirmed the fixpoint, and is always `0`.
    pub per_sweep: Vec<usize>,
    /// `false` if the sweep limit stopped the pass before a fold-free sweep.
    pub converged: bool,
}

impl FoldStats {
    /// Returns `true` if at least one operator was replaced.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.folded > 0
    }
}

/// A single replacement made by a sweep.
#[derive(Debug)]
struct Fold {
    inst: InstId,
    op: BinaryOp,
    value: Value,
    uses: usize,
}

/// Folds binary operators over literal integers until nothing is left to fold.
#[derive(Debug, Clone, Default)]
pub struct ConstantFoldingPass {
    max_sweeps: Option<usize>,
}

impl ConstantFoldingPass {
    /// Creates a pass that runs every function to its fixpoint.
    #[must_use]
    pub fn new() -> Self {
        Self { max_sweeps: None }
    }

    /// Creates a pass that stops after `max_sweeps` sweeps even if the last one folded
    /// something.
    #[must_use]
    pub fn with_max_sweeps(max_sweeps: usize) -> Self {
        Self {
            max_sweeps: Some(max_sweeps),
        }
    }

    /// Creates a pass honouring [`CompilerConfig::max_fold_sweeps`].
    #[must_use]
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            max_sweeps: config.max_fold_sweeps,
        }
    }

    /// The configured sweep limit.
    #[must_use]
    pub fn max_sweeps(&self) -> Option<usize> {
        self.max_sweeps
    }

    /// Folds `function` in place and returns `true` if anything was folded.
    ///
    /// Running the pass again on its own output returns `false`.
    pub fn run(&self, function: &mut Function) -> bool {
        self.run_with_stats(function).changed()
    }

    /// Folds `function` in place and reports what happened.
    ///
    /// A function whose use-lists are inconsistent stops the pass at the first
    /// replacement that fails; the failure is logged and the statistics cover the work
    /// done up to that point.
    pub fn run_with_stats(&self, function: &mut Function) -> FoldStats {
        let mut stats = FoldStats::default();
        if let Err(err) = self.fold_to_fixpoint(function, &mut stats, |_| {}) {
            error!("@{}: constant folding aborted: {err}", function.name());
        }
        stats
    }

    fn fold_to_fixpoint(
        &self,
        function: &mut Function,
        stats: &mut FoldStats,
        mut on_fold: impl FnMut(&Fold),
    ) -> Result<()> {
        loop {
            if self.max_sweeps.is_some_and(|max| stats.sweeps >= max) {
                warn!(
                    "@{}: stopped after {} sweeps without reaching a fixpoint",
                    function.name(),
                    stats.sweeps
                );
                return Ok(());
            }

            stats.sweeps += 1;
            let folded = Self::sweep(function, stats, &mut on_fold)?;
            stats.per_sweep.push(folded);
            trace!(
                "@{}: sweep {} folded {folded} instructions",
                function.name(),
                stats.sweeps
            );

            if folded == 0 {
                stats.converged = true;
                return Ok(());
            }
        }
    }

    /// One pass over the reachable blocks in reverse postorder.
    fn sweep(
        function: &mut Function,
        stats: &mut FoldStats,
        on_fold: &mut impl FnMut(&Fold),
    ) -> Result<usize> {
        let order = FunctionCfg::new(function).reverse_postorder();
        let mut folded = 0;

        for block in order {
            let Some(snapshot) = function.block(block).map(|b| b.instructions().to_vec()) else {
                continue;
            };

            for inst in snapshot {
                let Some(candidate) = function.instruction(inst) else {
                    continue;
                };
                let Some((op, _, _)) = candidate.as_binary() else {
                    continue;
                };
                let Some(value) = evaluate(candidate) else {
                    continue;
                };

                let uses = function.replace_all_uses_with(inst, value.clone())?;
                function.erase_instruction(inst)?;

                debug!(
                    "@{}: {inst} = {op} folded to {value} ({uses} uses)",
                    function.name()
                );
                if value.is_poison() {
                    stats.poisoned += 1;
                }
                stats.folded += 1;
                folded += 1;
                on_fold(&Fold {
                    inst,
                    op,
                    value,
                    uses,
                });
            }
        }

        Ok(folded)
    }
}

impl FunctionPass for ConstantFoldingPass {
    fn name(&self) -> &'static str {
        "constant-folding"
    }

    fn description(&self) -> &'static str {
        "Fold binary operators with literal operands to a fixpoint"
    }

    fn run_on_function(&self, function: &mut Function, ctx: &CompilerContext) -> Result<bool> {
        let changes = EventLog::new();
        let name = function.name().to_string();
        let mut stats = FoldStats::default();

        self.fold_to_fixpoint(function, &mut stats, |fold| {
            let kind = if fold.value.is_poison() {
                EventKind::PoisonFolded
            } else {
                EventKind::ConstantFolded
            };
            changes
                .record(kind)
                .at(name.as_str(), fold.inst)
                .pass(self.name())
                .message(format!(
                    "{} folded to {}, {} uses rewritten",
                    fold.op, fold.value, fold.uses
                ));
            changes
                .record(EventKind::InstructionRemoved)
                .at(name.as_str(), fold.inst)
                .pass(self.name())
                .message(format!("{} erased", fold.op));
        })?;

        ctx.record_sweeps(&name, stats.sweeps);
        if !stats.converged {
            changes.warn(format!(
                "@{name}: sweep limit reached after {} sweeps",
                stats.sweeps
            ));
        }

        let changed = stats.changed();
        if !changes.is_empty() {
            ctx.events.merge(&changes);
        }
        Ok(changed)
    }
}
