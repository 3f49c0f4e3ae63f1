//! Basic blocks.

use std::fmt;

use crate::ir::InstId;

/// Stable identifier of a basic block; block `0` is the function entry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    /// Creates a block identifier from a raw index.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        BlockId(index)
    }

    /// Returns the raw block index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// An ordered run of instructions ending in a terminator.
///
/// The block only stores instruction identifiers; the instructions themselves live in
/// the function arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    id: BlockId,
    name: String,
    insts: Vec<InstId>,
}

impl BasicBlock {
    pub(crate) fn new(id: BlockId, name: impl Into<String>) -> Self {
        BasicBlock {
            id,
            name: name.into(),
            insts: Vec::new(),
        }
    }

    /// This block's identifier.
    #[must_use]
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Label used by the printer.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instructions in execution order.
    #[must_use]
    pub fn instructions(&self) -> &[InstId] {
        &self.insts
    }

    /// Number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.insts.len()
    }

    /// Returns `true` if the block has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    /// The last instruction, the terminator in a well-formed block.
    #[must_use]
    pub fn last(&self) -> Option<InstId> {
        self.insts.last().copied()
    }

    pub(crate) fn push(&mut self, inst: InstId) {
        self.insts.push(inst);
    }

    /// Unlinks `inst`, returning `false` if it was not part of this block.
    pub(crate) fn remove(&mut self, inst: InstId) -> bool {
        match self.insts.iter().position(|id| *id == inst) {
            Some(position) => {
                self.insts.remove(position);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_remove() {
        let mut block = BasicBlock::new(BlockId::new(0), "entry");
        block.push(InstId::new(0));
        block.push(InstId::new(1));
        block.push(InstId::new(2));

        assert!(block.remove(InstId::new(1)));
        assert!(!block.remove(InstId::new(1)));
        assert_eq!(block.instructions(), &[InstId::new(0), InstId::new(2)]);
        assert_eq!(block.last(), Some(InstId::new(2)));
    }

    #[test]
    fn test_empty_block() {
        let block = BasicBlock::new(BlockId::new(3), "bb3");
        assert!(block.is_empty());
        assert_eq!(block.last(), None);
        assert_eq!(block.name(), "bb3");
        assert_eq!(block.id().to_string(), "B3");
    }
}
