//! Depth-first traversal and connected components
//!
//! The traversal is depth-first in the recursive sense (a neighbor is fully
//! explored before the next sibling) but runs on an explicit stack, so long
//! citation chains cannot overflow the call stack.
//!
//! Edges are followed in both directions on every kind of graph, so the
//! components of a directed graph are its weakly connected components.

use super::{Edge, EdgeIndex, Graph, NodeId};
use crate::error::GraphError;
use std::collections::HashSet;

/// One pending frame of the traversal: a node and its remaining edges
struct Frame {
    node: NodeId,
    edges: std::vec::IntoIter<EdgeIndex>,
}

impl Graph {
    /// Traverse the component containing `start`.
    ///
    /// Returns the traversal subgraph: every reached node with its attributes,
    /// and only the edges used to reach a node for the first time. The
    /// subgraph is a spanning tree of the component.
    pub fn dfs(&self, start: &str) -> Result<Graph, GraphError> {
        let mut visited = HashSet::new();
        self.dfs_with(start, &mut visited)
    }

    /// Like [`Graph::dfs`], recording reached nodes in a caller-owned set.
    ///
    /// Nodes already in `visited` are treated as explored and never entered.
    pub fn dfs_with(&self, start: &str, visited: &mut HashSet<NodeId>) -> Result<Graph, GraphError> {
        let root = self
            .node(start)
            .ok_or_else(|| GraphError::node_not_found(start))?;

        let mut tree = Graph::new(self.kind());
        if !visited.insert(root.id.clone()) {
            return Ok(tree);
        }

        tree.add_node(root.clone());
        let mut stack = vec![self.frame(&root.id)];

        while let Some(frame) = stack.last_mut() {
            let Some(idx) = frame.edges.next() else {
                stack.pop();
                continue;
            };

            let current = frame.node.clone();
            let Some(edge) = self.edge_at(idx) else {
                continue;
            };
            let Some(next) = edge.other(&current) else {
                continue;
            };

            // Unvisited -> Visited happens exactly once, on first reach
            if !visited.insert(next.to_string()) {
                continue;
            }

            if let Some(node) = self.node(next) {
                tree.add_node(node.clone());
            }
            tree.add_edge(Edge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                attributes: edge.attributes.clone(),
            });
            stack.push(self.frame(next));
        }

        Ok(tree)
    }

    /// Split the graph into its connected components.
    ///
    /// Every node lands in exactly one returned graph. Each component is the
    /// traversal subgraph from [`Graph::dfs`], so it keeps all nodes but only
    /// the spanning-tree edges of the component.
    pub fn components(&self) -> Vec<Graph> {
        let mut visited: HashSet<NodeId> = HashSet::with_capacity(self.node_count());
        let mut components = Vec::new();

        for node in self.nodes() {
            if visited.contains(&node.id) {
                continue;
            }
            if let Ok(component) = self.dfs_with(&node.id, &mut visited) {
                components.push(component);
            }
        }

        components
    }

    fn frame(&self, id: &str) -> Frame {
        Frame {
            node: id.to_string(),
            edges: self.incident_edges(id).into_iter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AttributeValue, GraphKind, Node};

    fn make_graph(kind: GraphKind, edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::new(kind);
        for (a, b) in edges {
            graph.add_edge(Edge::new(*a, *b));
        }
        graph
    }

    #[test]
    fn test_dfs_single_node() {
        let mut graph = Graph::undirected();
        graph.add_node(Node::new("A").with_attribute("year", 2000i64));

        let tree = graph.dfs("A").unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.edge_count(), 0);
        assert_eq!(
            tree.node("A").unwrap().attribute("year"),
            Some(&AttributeValue::Int(2000))
        );
    }

    #[test]
    fn test_dfs_missing_start() {
        let graph = make_graph(GraphKind::Undirected, &[("A", "B")]);
        assert_eq!(graph.dfs("Z").unwrap_err(), GraphError::node_not_found("Z"));
    }

    #[test]
    fn test_dfs_spanning_tree_of_cycle() {
        // A -> B -> C -> A
        let graph = make_graph(GraphKind::Undirected, &[("A", "B"), ("B", "C"), ("C", "A")]);

        let tree = graph.dfs("A").unwrap();

        assert_eq!(tree.node_count(), 3);
        // A spanning tree of n nodes has n - 1 edges
        assert_eq!(tree.edge_count(), 2);
        // Depth-first: B is explored before returning to A's edge to C
        assert!(tree.edge_between("A", "B").is_some());
        assert!(tree.edge_between("B", "C").is_some());
        assert!(tree.edge_between("A", "C").is_none());
    }

    #[test]
    fn test_dfs_stays_in_component() {
        let graph = make_graph(GraphKind::Undirected, &[("A", "B"), ("C", "D")]);
        let tree = graph.dfs("B").unwrap();
        assert_eq!(tree.node_ids(), vec!["B", "A"]);
    }

    #[test]
    fn test_dfs_with_skips_visited() {
        let graph = make_graph(GraphKind::Undirected, &[("A", "B"), ("B", "C")]);
        let mut visited = HashSet::from(["B".to_string()]);

        let tree = graph.dfs_with("A", &mut visited).unwrap();
        assert_eq!(tree.node_ids(), vec!["A"]);

        let again = graph.dfs_with("A", &mut visited).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_dfs_keeps_edge_attributes_and_direction() {
        let mut graph = Graph::directed();
        graph.add_edge(Edge::new("B", "A").with_attribute("weight", 2i64));

        let tree = graph.dfs("A").unwrap();
        let (_, edge) = tree.edge_between("B", "A").unwrap();
        assert_eq!(edge.attributes["weight"], AttributeValue::Int(2));
        assert!(tree.edge_between("A", "B").is_none());
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut graph = Graph::undirected();
        for i in 0..100_000 {
            graph.add_edge(Edge::new(i.to_string(), (i + 1).to_string()));
        }

        let tree = graph.dfs("0").unwrap();
        assert_eq!(tree.node_count(), 100_001);
        assert_eq!(tree.edge_count(), 100_000);
    }

    #[test]
    fn test_components_partition_nodes() {
        let mut graph = make_graph(
            GraphKind::Undirected,
            &[("A", "B"), ("B", "C"), ("D", "E"), ("F", "F")],
        );
        graph.add_node(Node::new("G"));

        let components = graph.components();
        assert_eq!(components.len(), 4);

        let mut sizes: Vec<_> = components.iter().map(Graph::node_count).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 1, 2, 3]);

        let total: usize = components.iter().map(Graph::node_count).sum();
        assert_eq!(total, graph.node_count());
        for id in graph.node_ids() {
            assert_eq!(components.iter().filter(|c| c.has_node(&id)).count(), 1);
        }
    }

    #[test]
    fn test_directed_components_are_weak() {
        let graph = make_graph(GraphKind::Directed, &[("A", "B"), ("C", "B")]);
        let components = graph.components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].kind(), GraphKind::Directed);
    }

    #[test]
    fn test_components_of_empty_graph() {
        assert!(Graph::undirected().components().is_empty());
    }
}
