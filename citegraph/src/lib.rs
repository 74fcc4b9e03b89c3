//! Citegraph - Attributed Citation Graph Engine
//!
//! Builds a graph from extracted citation records and reduces it:
//! - Attributed nodes and edges on undirected, directed or multi graphs
//! - Contraction of nodes and edges with pluggable attribute combination
//! - Leaf pruning, depth-first traversal and connected components
//! - JSON snapshots of the reduced graph

pub mod config;
pub mod error;
pub mod graph;
pub mod records;

pub use error::{GraphError, LoadError};
pub use graph::{Edge, Graph, GraphKind, Node};
