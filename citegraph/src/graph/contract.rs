//! Node combination and contraction
//!
//! Contraction replaces part of the graph with a single merged node:
//! - [`combine_nodes`] builds the merged node from two nodes
//! - [`Graph::contract_edge`] merges both endpoints of an edge
//! - [`Graph::contract_node`] removes a node and connects its neighbors

use super::{combine_values, CombineStrategy, Edge, Graph, Node, NodeId};
use crate::error::GraphError;
use tracing::{debug, warn};

/// Merge two nodes into a new one.
///
/// The merged ID is both IDs sorted and joined with `_`, so argument order
/// does not matter. Attributes start as a copy of `n1`; each attribute of `n2`
/// is either added (new key) or combined with the existing value, numbers via
/// `numeric` and strings via `text`.
///
/// When the two values cannot be combined (different types, or a strategy
/// that does not support them) the value from `n1` is kept.
pub fn combine_nodes(
    n1: &Node,
    n2: &Node,
    numeric: &dyn CombineStrategy,
    text: &dyn CombineStrategy,
) -> Node {
    let id = if n1.id < n2.id {
        format!("{}_{}", n1.id, n2.id)
    } else {
        format!("{}_{}", n2.id, n1.id)
    };

    let mut attributes = n1.attributes.clone();
    for (key, incoming) in &n2.attributes {
        match attributes.get(key) {
            Some(existing) => match combine_values(existing, incoming, numeric, text) {
                Ok(merged) => {
                    attributes.insert(key.clone(), merged);
                }
                Err(error) => {
                    warn!(
                        node = %id,
                        attribute = %key,
                        error = %error,
                        "Keeping first value for attribute that cannot be combined"
                    );
                }
            },
            None => {
                attributes.insert(key.clone(), incoming.clone());
            }
        }
    }

    Node { id, attributes }
}

impl Graph {
    /// Remove a node and connect every pair of its distinct neighbors.
    ///
    /// New edges carry no attributes. On directed graphs they point from the
    /// earlier neighbor to the later one in neighbor order.
    pub fn contract_node(&mut self, id: &str) -> Result<(), GraphError> {
        if !self.has_node(id) {
            warn!(node = %id, "Cannot contract missing node");
            return Err(GraphError::node_not_found(id));
        }

        let mut neighbors: Vec<NodeId> = Vec::new();
        for neighbor in self.neighbor_ids(id) {
            if neighbor != id && !neighbors.contains(&neighbor) {
                neighbors.push(neighbor);
            }
        }

        for (i, first) in neighbors.iter().enumerate() {
            for second in &neighbors[i + 1..] {
                self.add_edge(Edge::new(first.clone(), second.clone()));
            }
        }

        self.remove_node(id)?;
        debug!(node = %id, neighbors = neighbors.len(), "Contracted node");
        Ok(())
    }

    /// Merge both endpoints of `edge` into one node.
    ///
    /// The merged node is built with [`combine_nodes`]. Every other edge of
    /// either endpoint is moved onto the merged node, keeping its attributes;
    /// edges that end up parallel are merged by [`Graph::add_edge`]. Both
    /// endpoints and the contracted edge are removed. Returns the merged ID.
    ///
    /// Contracting a self-loop only removes the loop; the node keeps its ID
    /// and attributes, and that ID is returned.
    pub fn contract_edge(
        &mut self,
        edge: &Edge,
        numeric: &dyn CombineStrategy,
        text: &dyn CombineStrategy,
    ) -> Result<NodeId, GraphError> {
        let (idx, stored) = match self.edge(edge) {
            Some(found) => found,
            None => {
                warn!(source = %edge.source, target = %edge.target, "Cannot contract missing edge");
                return Err(GraphError::edge_not_found(&edge.source, &edge.target));
            }
        };

        if stored.source == stored.target {
            let id = stored.source.clone();
            self.remove_edge_at(idx);
            debug!(node = %id, "Removed contracted self-loop");
            return Ok(id);
        }

        let first = self
            .node(&stored.source)
            .ok_or_else(|| GraphError::node_not_found(&stored.source))?;
        let second = self
            .node(&stored.target)
            .ok_or_else(|| GraphError::node_not_found(&stored.target))?;

        let merged = combine_nodes(first, second, numeric, text);
        let ends = [first.id.clone(), second.id.clone()];

        Ok(self.replace_nodes(&ends, merged))
    }

    /// Replace `old` nodes with `merged`, moving their edges onto it.
    ///
    /// Edges between two replaced nodes are dropped rather than turned into
    /// self-loops. If `merged` shares its ID with a node that is not being
    /// replaced, the two are merged with the usual [`Graph::add_node`] rules.
    pub(crate) fn replace_nodes(&mut self, old: &[NodeId], merged: Node) -> NodeId {
        let mut moved: Vec<Edge> = Vec::new();
        for id in old {
            if let Some((_, edges)) = self.detach_node(id) {
                moved.extend(edges);
            }
        }

        let merged_id = merged.id.clone();
        self.add_node(merged);

        let rename = |id: NodeId| {
            if old.contains(&id) {
                merged_id.clone()
            } else {
                id
            }
        };

        for edge in moved {
            let source = rename(edge.source);
            let target = rename(edge.target);
            if source == merged_id && target == merged_id {
                continue;
            }
            self.add_edge(Edge {
                source,
                target,
                attributes: edge.attributes,
            });
        }

        merged_id
    }
}
