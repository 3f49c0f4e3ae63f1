//! Minimal directed-graph abstractions for control-flow analysis.
//!
//! Algorithms in [`algorithms`] are written against the small trait family defined here
//! rather than a concrete graph type, so that views such as
//! [`crate::ir::FunctionCfg`] can expose an existing structure as a graph without
//! copying it.
//!
//! # Traits
//!
//! - [`GraphBase`] - node count and node enumeration
//! - [`Successors`] - outgoing edges
//! - [`Predecessors`] - incoming edges
//! - [`RootedGraph`] - a distinguished entry node

pub mod algorithms;
mod node;

pub use node::NodeId;

/// Node enumeration shared by all graph views.
///
/// Node identifiers are dense: every node has an index in `0..node_count()`.
pub trait GraphBase {
    /// Number of nodes in the graph.
    fn node_count(&self) -> usize;

    /// All node identifiers in index order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Graphs that can enumerate the outgoing edges of a node.
pub trait Successors: GraphBase {
    /// Targets of the edges leaving `node`, in edge order.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Graphs that can enumerate the incoming edges of a node.
pub trait Predecessors: GraphBase {
    /// Sources of the edges entering `node`.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Graphs with a single entry node.
pub trait RootedGraph: GraphBase {
    /// The node all traversals start from.
    fn entry(&self) -> NodeId;
}
