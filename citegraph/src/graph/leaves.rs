//! Leaf pruning
//!
//! A leaf is a node with exactly one neighbor. Citation graphs have a large
//! fringe of works cited once; [`Graph::combine_leaves`] folds each of them
//! into its neighbor so the graph shrinks without losing their attributes.

use super::{combine_nodes, Array, Graph, NodeId};
use tracing::{debug, info};

/// Outcome of a [`Graph::combine_leaves`] run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafReport {
    /// Leaves found before any mutation
    pub leaves: usize,
    /// Leaves merged into their neighbor
    pub merged: usize,
    /// Leaves skipped because an earlier merge already absorbed them
    pub skipped: usize,
}

impl Graph {
    /// Check whether a node has exactly one neighbor
    pub fn is_leaf(&self, id: &str) -> bool {
        self.degree(id) == 1
    }

    /// IDs of all current leaves, in arena order
    pub fn leaves(&self) -> Vec<NodeId> {
        self.nodes()
            .filter(|n| self.is_leaf(&n.id))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Remove every leaf without merging it anywhere. Returns how many nodes
    /// were removed.
    ///
    /// The leaf set is fixed up front, so both ends of a two-node component
    /// are removed.
    pub fn remove_leaves(&mut self) -> usize {
        self.leaves()
            .iter()
            .filter(|id| self.remove_node(id).is_ok())
            .count()
    }

    /// Merge every leaf into its sole neighbor.
    ///
    /// The leaf set is computed once before anything changes. Each leaf is
    /// combined with its neighbor using [`Array`] for every attribute type, so
    /// values accumulate as lists. The merged node takes over the neighbor's
    /// other edges and the leaf edge disappears.
    ///
    /// Each leaf is re-checked right before it is processed and skipped if it
    /// is gone or no longer has exactly one other neighbor. This is what
    /// happens to the second node of a two-node component: the first merge
    /// already absorbed it, leaving a single node.
    pub fn combine_leaves(&mut self) -> LeafReport {
        let leaves = self.leaves();
        let mut report = LeafReport {
            leaves: leaves.len(),
            ..LeafReport::default()
        };

        for leaf_id in &leaves {
            let neighbor_id = match self.neighbor_ids(leaf_id).as_slice() {
                [only] if only != leaf_id => only.clone(),
                _ => {
                    debug!(leaf = %leaf_id, "Skipping leaf absorbed by an earlier merge");
                    report.skipped += 1;
                    continue;
                }
            };

            let (Some(leaf), Some(neighbor)) = (self.node(leaf_id), self.node(&neighbor_id)) else {
                report.skipped += 1;
                continue;
            };

            let merged = combine_nodes(leaf, neighbor, &Array, &Array);
            let merged_id = self.replace_nodes(&[leaf_id.clone(), neighbor_id.clone()], merged);

            debug!(
                leaf = %leaf_id,
                neighbor = %neighbor_id,
                merged = %merged_id,
                "Combined leaf into neighbor"
            );
            report.merged += 1;
        }

        info!(
            leaves = report.leaves,
            merged = report.merged,
            skipped = report.skipped,
            nodes = self.node_count(),
            edges = self.edge_count(),
            "Combined leaves"
        );

        report
    }
}
