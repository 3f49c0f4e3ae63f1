//! Graph traversal algorithms.
//!
//! - [`dfs`] - Iterative depth-first search (pre-order)
//! - [`postorder`] - Depth-first search with post-order visitation
//! - [`reverse_postorder`] - Reverse post-order (useful for forward data flow)
//!
//! [`dfs`] returns an iterator for lazy evaluation. [`postorder`] and
//! [`reverse_postorder`] return collected vectors since the order requires full
//! traversal anyway. All three only visit nodes reachable from the start node and
//! return nothing for a start node outside the graph.

use crate::utils::graph::{NodeId, Successors};

/// Depth-first search iterator over graph nodes.
///
/// Performs an iterative (non-recursive) traversal, visiting each reachable node exactly
/// once in pre-order.
pub struct DfsIterator<'g, G: Successors> {
    graph: &'g G,
    stack: Vec<NodeId>,
    visited: Vec<bool>,
}

impl<'g, G: Successors> DfsIterator<'g, G> {
    fn new(graph: &'g G, start: NodeId) -> Self {
        let node_count = graph.node_count();
        if start.index() >= node_count {
            return DfsIterator {
                graph,
                stack: Vec::new(),
                visited: Vec::new(),
            };
        }

        let mut visited = vec![false; node_count];
        visited[start.index()] = true;

        DfsIterator {
            graph,
            stack: vec![start],
            visited,
        }
    }
}

impl<G: Successors> Iterator for DfsIterator<'_, G> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Reverse so successors pop in edge order
        let successors: Vec<NodeId> = self.graph.successors(node).collect();
        for &succ in successors.iter().rev() {
            if succ.index() < self.visited.len() && !self.visited[succ.index()] {
                self.visited[succ.index()] = true;
                self.stack.push(succ);
            }
        }

        Some(node)
    }
}

/// Returns a depth-first search iterator starting from the given node.
///
/// # Complexity
///
/// - Time: O(V + E)
/// - Space: O(V) for the visited set and stack
pub fn dfs<G: Successors>(graph: &G, start: NodeId) -> DfsIterator<'_, G> {
    DfsIterator::new(graph, start)
}

/// Computes the postorder traversal of nodes reachable from the start.
///
/// In postorder, a node is emitted after all of its descendants in the DFS tree.
///
/// # Complexity
///
/// - Time: O(V + E)
/// - Space: O(V)
#[allow(clippy::items_after_statements)]
pub fn postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let node_count = graph.node_count();
    if start.index() >= node_count {
        return Vec::new();
    }

    let mut visited = vec![false; node_count];
    let mut result = Vec::with_capacity(node_count);

    #[derive(Clone, Copy)]
    enum State {
        Enter,
        Exit,
    }

    let mut stack = vec![(start, State::Enter)];

    while let Some((node, state)) = stack.pop() {
        match state {
            State::Enter => {
                if visited[node.index()] {
                    continue;
                }
                visited[node.index()] = true;

                // Exit is processed after every child pushed below
                stack.push((node, State::Exit));

                let successors: Vec<NodeId> = graph.successors(node).collect();
                for &succ in successors.iter().rev() {
                    if succ.index() < node_count && !visited[succ.index()] {
                        stack.push((succ, State::Enter));
                    }
                }
            }
            State::Exit => {
                result.push(node);
            }
        }
    }

    result
}

/// Computes the reverse postorder traversal of nodes reachable from the start.
///
/// Ignoring back edges, every node appears after all of its predecessors. This is the
/// preferred iteration order for forward data flow: a value computed in a block is
/// already known when its users in later blocks are visited.
///
/// # Complexity
///
/// - Time: O(V + E)
/// - Space: O(V)
pub fn reverse_postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let mut result = postorder(graph, start);
    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use crate::utils::graph::{
        algorithms::traversal::{dfs, postorder, reverse_postorder},
        GraphBase, NodeId, Successors,
    };

    struct AdjacencyGraph {
        edges: Vec<Vec<usize>>,
    }

    impl AdjacencyGraph {
        fn new(node_count: usize, edges: &[(usize, usize)]) -> Self {
            let mut adjacency = vec![Vec::new(); node_count];
            for &(from, to) in edges {
                adjacency[from].push(to);
            }
            AdjacencyGraph { edges: adjacency }
        }
    }

    impl GraphBase for AdjacencyGraph {
        fn node_count(&self) -> usize {
            self.edges.len()
        }

        fn node_ids(&self) -> impl Iterator<Item = NodeId> {
            (0..self.edges.len()).map(NodeId::new)
        }
    }

    impl Successors for AdjacencyGraph {
        fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.edges[node.index()].iter().copied().map(NodeId::new)
        }
    }

    fn ids(raw: &[usize]) -> Vec<NodeId> {
        raw.iter().copied().map(NodeId::new).collect()
    }

    fn create_linear_graph() -> AdjacencyGraph {
        AdjacencyGraph::new(3, &[(0, 1), (1, 2)])
    }

    fn create_diamond_graph() -> AdjacencyGraph {
        AdjacencyGraph::new(4, &[(0, 1), (0, 2), (1, 3), (2, 3)])
    }

    fn create_cycle_graph() -> AdjacencyGraph {
        AdjacencyGraph::new(3, &[(0, 1), (1, 2), (2, 0)])
    }

    fn create_tree_graph() -> AdjacencyGraph {
        //       0
        //      / \
        //     1   2
        //    / \   \
        //   3   4   5
        AdjacencyGraph::new(6, &[(0, 1), (0, 2), (1, 3), (1, 4), (2, 5)])
    }

    #[test]
    fn test_dfs_linear() {
        let graph = create_linear_graph();
        let order: Vec<NodeId> = dfs(&graph, NodeId::new(0)).collect();
        assert_eq!(order, ids(&[0, 1, 2]));
    }

    #[test]
    fn test_dfs_diamond_visits_once() {
        let graph = create_diamond_graph();
        let order: Vec<NodeId> = dfs(&graph, NodeId::new(0)).collect();
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], NodeId::new(0));
    }

    #[test]
    fn test_dfs_cycle_terminates() {
        let graph = create_cycle_graph();
        assert_eq!(dfs(&graph, NodeId::new(1)).count(), 3);
    }

    #[test]
    fn test_dfs_invalid_start() {
        let graph = create_linear_graph();
        assert_eq!(dfs(&graph, NodeId::new(10)).count(), 0);
    }

    #[test]
    fn test_postorder_linear() {
        let graph = create_linear_graph();
        assert_eq!(postorder(&graph, NodeId::new(0)), ids(&[2, 1, 0]));
    }

    #[test]
    fn test_postorder_tree() {
        let graph = create_tree_graph();
        assert_eq!(postorder(&graph, NodeId::new(0)), ids(&[3, 4, 1, 5, 2, 0]));
    }

    #[test]
    fn test_reverse_postorder_diamond() {
        let graph = create_diamond_graph();
        let order = reverse_postorder(&graph, NodeId::new(0));
        assert_eq!(order, ids(&[0, 2, 1, 3]));
        // The join comes after both arms
        assert_eq!(order.last(), Some(&NodeId::new(3)));
    }

    #[test]
    fn test_reverse_postorder_cycle() {
        let graph = create_cycle_graph();
        assert_eq!(reverse_postorder(&graph, NodeId::new(0)), ids(&[0, 1, 2]));
    }

    #[test]
    fn test_reverse_postorder_skips_unreachable() {
        let graph = AdjacencyGraph::new(4, &[(0, 1), (2, 3), (3, 1)]);
        assert_eq!(reverse_postorder(&graph, NodeId::new(0)), ids(&[0, 1]));
    }

    #[test]
    fn test_reverse_postorder_invalid_start() {
        let graph = create_linear_graph();
        assert!(reverse_postorder(&graph, NodeId::new(3)).is_empty());
    }
}
