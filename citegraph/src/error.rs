//! Error types for the citation graph engine.
//!
//! Every error here is recoverable: an operation that fails leaves the rest of
//! the graph untouched and usable.

use thiserror::Error;

use crate::graph::GraphKind;

/// Errors reported by graph queries, mutations and attribute merges.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// No node with this ID exists in the graph.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// No edge equal to the requested one exists in the graph.
    #[error("Edge not found: {first} - {second}")]
    EdgeNotFound { first: String, second: String },

    /// A combine strategy was handed values it cannot merge.
    #[error("Type mismatch: {strategy} cannot combine {left} with {right}")]
    TypeMismatch {
        strategy: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// Two graphs of different kinds cannot be combined.
    #[error("Graph kind mismatch: {left} and {right}")]
    KindMismatch { left: GraphKind, right: GraphKind },
}

impl GraphError {
    /// Create a node not found error.
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound(id.into())
    }

    /// Create an edge not found error.
    pub fn edge_not_found(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::EdgeNotFound {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(strategy: &'static str, left: &'static str, right: &'static str) -> Self {
        Self::TypeMismatch {
            strategy,
            left,
            right,
        }
    }
}

/// Errors raised while reading extracted citation records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The reserved `neighbors` attribute is present but is not a list.
    #[error("Record {0} has a neighbors attribute that is not a list")]
    InvalidNeighbors(String),
}
