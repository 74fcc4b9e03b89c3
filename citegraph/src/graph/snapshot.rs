//! Serializable view of a graph
//!
//! The snapshot is what gets persisted once a graph has been reduced: node IDs
//! with their attributes, and edges with their endpoints and attributes, keyed
//! by their index in the graph.

use super::{Attributes, Edge, EdgeIndex, Graph, GraphKind, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Plain-data copy of a [`Graph`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub kind: GraphKind,
    pub nodes: BTreeMap<NodeId, Attributes>,
    pub edges: BTreeMap<EdgeIndex, EdgeSnapshot>,
}

/// Plain-data copy of an [`Edge`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Graph {
    /// Copy the graph into its serializable form
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            kind: self.kind(),
            nodes: self
                .nodes()
                .map(|n| (n.id.clone(), n.attributes.clone()))
                .collect(),
            edges: self
                .edges()
                .map(|(idx, e)| {
                    (
                        idx,
                        EdgeSnapshot {
                            source: e.source.clone(),
                            target: e.target.clone(),
                            attributes: e.attributes.clone(),
                        },
                    )
                })
                .collect(),
        }
    }

    /// Rebuild a graph from a snapshot.
    ///
    /// Edges are re-inserted in index order, so indices are renumbered densely
    /// from 0.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Graph {
        let mut graph = Graph::new(snapshot.kind);
        graph.add_nodes_from(
            snapshot
                .nodes
                .into_iter()
                .map(|(id, attributes)| Node { id, attributes }),
        );
        graph.add_edges_from(snapshot.edges.into_values().map(|e| Edge {
            source: e.source,
            target: e.target,
            attributes: e.attributes,
        }));
        graph
    }

    /// Serialize the graph to JSON bytes.
    ///
    /// Fails if any float attribute is NaN or infinite.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.snapshot())
    }

    /// Write the graph as JSON to any writer
    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer(writer, &self.snapshot())
    }

    /// Write the graph as JSON to a file, replacing it if present
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()
    }
}
