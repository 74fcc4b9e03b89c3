//! Graph data structures and algorithms
//!
//! This module contains the attributed graph engine:
//! - `Graph`: In-memory graph with node arena and indexed edges
//! - `Node`, `Edge`, `GraphKind`: Graph elements and edge semantics
//! - `AttributeValue`: Typed attribute values carried by nodes and edges
//! - `CombineStrategy`: Pluggable rules for merging attributes on contraction
//! - `GraphSnapshot`: Serializable view used for persistence

mod attribute;
mod contract;
mod element;
mod leaves;
mod snapshot;
mod state;
mod strategy;
mod traversal;

pub use attribute::{merge_additive, AttributeValue, Attributes, UnsupportedValue, ValueFamily};
pub use contract::combine_nodes;
pub use element::{Edge, EdgeIndex, GraphKind, Node, NodeId};
pub use leaves::LeafReport;
pub use snapshot::{EdgeSnapshot, GraphSnapshot};
pub use state::{Graph, NodeHandle};
pub use strategy::{combine_values, Array, AvgNum, CombineResult, CombineStrategy, RetainMax, RetainMin};
