//! Node, edge and graph kind types

use super::{AttributeValue, Attributes};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a node (e.g. the URI of a cited work)
pub type NodeId = String;

/// Position of an edge in the graph's edge map.
///
/// Indices are handed out in insertion order and never reused, so removing an
/// edge leaves a hole.
pub type EdgeIndex = usize;

/// How edges of a graph are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphKind {
    /// Endpoint pairs are unordered
    #[default]
    Undirected,
    /// Endpoint pairs are ordered
    Directed,
    /// Unordered endpoints, and edges with different attributes coexist
    Multi,
}

impl GraphKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphKind::Undirected => "undirected",
            GraphKind::Directed => "directed",
            GraphKind::Multi => "multi",
        }
    }

    pub fn is_directed(&self) -> bool {
        matches!(self, GraphKind::Directed)
    }
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GraphKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "undirected" | "graph" => Ok(GraphKind::Undirected),
            "directed" | "digraph" => Ok(GraphKind::Directed),
            "multi" | "multigraph" => Ok(GraphKind::Multi),
            other => Err(format!("unknown graph kind: {other}")),
        }
    }
}

/// A node. Identity is the ID alone; attributes never take part in equality.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub attributes: Attributes,
}

impl Node {
    /// Create a node without attributes
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            attributes: Attributes::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

/// An edge between two nodes, referenced by ID.
///
/// On directed graphs the edge points from `source` to `target`; otherwise
/// the order carries no meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub attributes: Attributes,
}

impl Edge {
    /// Create an edge without attributes
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            attributes: Attributes::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Check whether `id` is one of the endpoints
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.source == id {
            Some(&self.target)
        } else if self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }

    /// Check whether the edge connects `a` and `b` under the given kind
    pub fn connects(&self, a: &str, b: &str, kind: GraphKind) -> bool {
        let forward = self.source == a && self.target == b;
        if kind.is_directed() {
            forward
        } else {
            forward || (self.source == b && self.target == a)
        }
    }

    /// Edge equality under the given kind.
    ///
    /// Multi graphs additionally require identical attribute maps so parallel
    /// edges with different attributes stay distinct.
    pub fn same_as(&self, other: &Edge, kind: GraphKind) -> bool {
        if !self.connects(&other.source, &other.target, kind) {
            return false;
        }
        match kind {
            GraphKind::Multi => self.attributes == other.attributes,
            GraphKind::Undirected | GraphKind::Directed => true,
        }
    }

    /// Canonical string for the endpoint pair: sorted unless directed
    pub fn key(&self, kind: GraphKind) -> String {
        if kind.is_directed() || self.source <= self.target {
            format!("{}-{}", self.source, self.target)
        } else {
            format!("{}-{}", self.target, self.source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_identity_ignores_attributes() {
        let a = Node::new("W1").with_attribute("year", 2001i64);
        let b = Node::new("W1").with_attribute("year", 1999i64);
        assert_eq!(a, b);
        assert_ne!(a, Node::new("W2"));
    }

    #[test]
    fn test_undirected_equality_is_unordered() {
        let ab = Edge::new("A", "B");
        let ba = Edge::new("B", "A");
        assert!(ab.same_as(&ba, GraphKind::Undirected));
        assert!(!ab.same_as(&ba, GraphKind::Directed));
        assert!(ab.same_as(&ab.clone(), GraphKind::Directed));
    }

    #[test]
    fn test_multi_equality_compares_attributes() {
        let cites = Edge::new("A", "B").with_attribute("type", "cites");
        let reviews = Edge::new("B", "A").with_attribute("type", "reviews");
        assert!(!cites.same_as(&reviews, GraphKind::Multi));
        assert!(cites.same_as(&reviews, GraphKind::Undirected));

        let cites_back = Edge::new("B", "A").with_attribute("type", "cites");
        assert!(cites.same_as(&cites_back, GraphKind::Multi));
    }

    #[test]
    fn test_edge_key() {
        let edge = Edge::new("B", "A");
        assert_eq!(edge.key(GraphKind::Undirected), "A-B");
        assert_eq!(edge.key(GraphKind::Directed), "B-A");
    }

    #[test]
    fn test_other_endpoint() {
        let edge = Edge::new("A", "B");
        assert_eq!(edge.other("A"), Some("B"));
        assert_eq!(edge.other("B"), Some("A"));
        assert_eq!(edge.other("C"), None);
    }

    #[test]
    fn test_graph_kind_from_str() {
        assert_eq!("Directed".parse::<GraphKind>(), Ok(GraphKind::Directed));
        assert_eq!("multigraph".parse::<GraphKind>(), Ok(GraphKind::Multi));
        assert_eq!(" graph ".parse::<GraphKind>(), Ok(GraphKind::Undirected));
        assert!("tree".parse::<GraphKind>().is_err());
    }
}
