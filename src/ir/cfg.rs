//! Control flow graph view of functions.
//!
//! [`FunctionCfg`] is a lightweight, read-only view that derives edges from block
//! terminators. It implements the graph traits from [`crate::utils::graph`]:
//!
//! - [`GraphBase`] - Node count and iteration (one node per block)
//! - [`Successors`] - Forward edges from the block terminator
//! - [`Predecessors`] - Backward edges, computed once at construction
//! - [`RootedGraph`] - Entry node (block 0)
//!
//! The view borrows the function, so it must be rebuilt after any change to the
//! function. The constant folding pass does exactly that at the start of every sweep.
//!
//! ```rust,ignore
//! use ssafold::ir::FunctionCfg;
//!
//! let cfg = FunctionCfg::new(&function);
//! for block in cfg.reverse_postorder() {
//!     println!("{block}");
//! }
//! ```

use crate::{
    ir::{BlockId, Function},
    utils::graph::{
        algorithms::{dfs, postorder, reverse_postorder},
        GraphBase, NodeId, Predecessors, RootedGraph, Successors,
    },
};

/// A control-flow graph view over a [`Function`].
#[derive(Debug)]
pub struct FunctionCfg<'a> {
    function: &'a Function,
    predecessors: Vec<Vec<BlockId>>,
}

impl<'a> FunctionCfg<'a> {
    /// Builds the view, computing predecessor lists from every block terminator.
    ///
    /// Edges to blocks that do not exist are dropped.
    #[must_use]
    pub fn new(function: &'a Function) -> Self {
        let block_count = function.block_count();
        let mut predecessors = vec![Vec::new(); block_count];

        for block in function.blocks() {
            for succ in function.successors(block.id()) {
                if succ.index() < block_count && !predecessors[succ.index()].contains(&block.id()) {
                    predecessors[succ.index()].push(block.id());
                }
            }
        }

        Self {
            function,
            predecessors,
        }
    }

    /// The function this view was built from.
    #[must_use]
    pub const fn function(&self) -> &'a Function {
        self.function
    }

    /// Number of blocks, reachable or not.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.function.block_count()
    }

    /// Successor blocks of `block`, in terminator operand order.
    #[must_use]
    pub fn block_successors(&self, block: BlockId) -> Vec<BlockId> {
        self.function
            .successors(block)
            .into_iter()
            .filter(|succ| succ.index() < self.block_count())
            .collect()
    }

    /// Predecessor blocks of `block`.
    #[must_use]
    pub fn block_predecessors(&self, block: BlockId) -> &[BlockId] {
        self.predecessors.get(block.index()).map_or(&[], Vec::as_slice)
    }

    /// Blocks reachable from the entry, in depth-first pre-order.
    #[must_use]
    pub fn reachable(&self) -> Vec<BlockId> {
        if self.block_count() == 0 {
            return Vec::new();
        }
        dfs(self, self.entry()).map(to_block).collect()
    }

    /// Reachable blocks in postorder.
    #[must_use]
    pub fn postorder(&self) -> Vec<BlockId> {
        postorder(self, self.entry())
            .into_iter()
            .map(to_block)
            .collect()
    }

    /// Reachable blocks in reverse postorder: each block after all of its
    /// predecessors, back edges aside. Unreachable blocks are excluded.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<BlockId> {
        reverse_postorder(self, self.entry())
            .into_iter()
            .map(to_block)
            .collect()
    }
}

fn to_block(node: NodeId) -> BlockId {
    BlockId::new(node.index())
}

impl GraphBase for FunctionCfg<'_> {
    fn node_count(&self) -> usize {
        self.function.block_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.function.block_count()).map(NodeId::new)
    }
}

impl Successors for FunctionCfg<'_> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.block_successors(BlockId::new(node.index()))
            .into_iter()
            .map(|block| NodeId::new(block.index()))
    }
}

impl Predecessors for FunctionCfg<'_> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.block_predecessors(BlockId::new(node.index()))
            .iter()
            .map(|block| NodeId::new(block.index()))
    }
}

impl RootedGraph for FunctionCfg<'_> {
    fn entry(&self) -> NodeId {
        NodeId::new(0)
    }
}
