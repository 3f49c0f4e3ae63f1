//! Graph algorithms for control-flow analysis.
//!
//! # Available Algorithms
//!
//! - [`dfs`] - Depth-first search traversal (pre-order)
//! - [`postorder`] - Postorder traversal
//! - [`reverse_postorder`] - Reverse postorder traversal, the visiting order of forward
//!   data flow problems such as constant folding
//!
//! | Algorithm | Time Complexity | Use Case |
//! |-----------|-----------------|----------|
//! | DFS | O(V + E) | Reachability |
//! | Postorder / RPO | O(V + E) | Forward and backward data flow ordering |

mod traversal;

pub use traversal::{dfs, postorder, reverse_postorder, DfsIterator};
