//! Extracted citation records
//!
//! The extraction step writes a JSON object keyed by work ID. Each value is an
//! object of attributes; the reserved `neighbors` attribute lists the IDs of
//! the works it is linked to.
//!
//! ```json
//! {
//!   "W1": {"year": 2019, "keywords": ["graphs"], "neighbors": ["W2"]},
//!   "W2": {"year": 2021}
//! }
//! ```

use crate::error::LoadError;
use crate::graph::{AttributeValue, Attributes, Edge, Graph, GraphKind, Node};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Attribute key holding the adjacency list of a record
pub const NEIGHBORS_KEY: &str = "neighbors";

/// Records keyed by work ID
pub type CitationRecords = BTreeMap<String, Map<String, Value>>;

/// Build a graph from decoded records.
///
/// All nodes are inserted first, then one edge per listed neighbor. Neighbors
/// without a record of their own become attribute-less nodes. Values with no
/// attribute representation are skipped with a warning.
pub fn graph_from_records(records: CitationRecords, kind: GraphKind) -> Result<Graph, LoadError> {
    let mut graph = Graph::new(kind);
    let mut links: Vec<(String, Vec<String>)> = Vec::with_capacity(records.len());

    for (id, mut fields) in records {
        if let Some(neighbors) = fields.remove(NEIGHBORS_KEY) {
            links.push((id.clone(), neighbor_ids(&id, neighbors)?));
        }

        let attributes = convert_attributes(&id, fields);
        graph.add_node(Node { id, attributes });
    }

    for (id, neighbors) in links {
        for neighbor in neighbors {
            graph.add_edge(Edge::new(id.clone(), neighbor));
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        kind = %kind,
        "Built graph from records"
    );
    Ok(graph)
}

/// Decode records from any reader
pub fn load_records<R: Read>(reader: R) -> Result<CitationRecords, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Read a records file and build its graph
pub fn load_graph(path: impl AsRef<Path>, kind: GraphKind) -> Result<Graph, LoadError> {
    let file = File::open(path.as_ref())?;
    let records = load_records(BufReader::new(file))?;
    graph_from_records(records, kind)
}

fn neighbor_ids(id: &str, value: Value) -> Result<Vec<String>, LoadError> {
    let Value::Array(items) = value else {
        return Err(LoadError::InvalidNeighbors(id.to_string()));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            _ => Err(LoadError::InvalidNeighbors(id.to_string())),
        })
        .collect()
}

fn convert_attributes(id: &str, fields: Map<String, Value>) -> Attributes {
    let mut attributes = Attributes::new();
    for (key, value) in fields {
        match AttributeValue::try_from(value) {
            Ok(converted) => {
                attributes.insert(key, converted);
            }
            Err(error) => {
                warn!(record = %id, attribute = %key, error = %error, "Skipping attribute");
            }
        }
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_records(value: Value) -> CitationRecords {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_graph_from_records() {
        let records = make_records(json!({
            "W1": {"year": 2019, "keywords": ["graphs", "trees"], "neighbors": ["W2", "W3"]},
            "W2": {"score": 0.5, "embedding": [1, 2.5], "neighbors": ["W1"]}
        }));

        let graph = graph_from_records(records, GraphKind::Undirected).unwrap();

        assert_eq!(graph.node_count(), 3);
        // W1 -> W2 and W2 -> W1 are the same undirected edge
        assert_eq!(graph.edge_count(), 2);

        let w1 = graph.node("W1").unwrap();
        assert_eq!(w1.attribute("year"), Some(&AttributeValue::Int(2019)));
        assert_eq!(
            w1.attribute("keywords"),
            Some(&AttributeValue::StrList(vec!["graphs".into(), "trees".into()]))
        );
        assert!(w1.attribute(NEIGHBORS_KEY).is_none());

        let w2 = graph.node("W2").unwrap();
        assert_eq!(w2.attribute("score"), Some(&AttributeValue::Float64(0.5)));
        assert_eq!(
            w2.attribute("embedding"),
            Some(&AttributeValue::Float64List(vec![1.0, 2.5]))
        );

        // Unknown neighbor becomes a bare node
        assert!(graph.node("W3").unwrap().attributes.is_empty());
    }

    #[test]
    fn test_directed_records_keep_both_edges() {
        let records = make_records(json!({
            "W1": {"neighbors": ["W2"]},
            "W2": {"neighbors": ["W1"]}
        }));

        let graph = graph_from_records(records, GraphKind::Directed).unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_unsupported_values_are_skipped() {
        let records = make_records(json!({
            "W1": {
                "open_access": true,
                "venue": null,
                "meta": {"a": 1},
                "mixed": [1, "x"],
                "tags": [],
                "title": "Graphs"
            }
        }));

        let graph = graph_from_records(records, GraphKind::Undirected).unwrap();
        let w1 = graph.node("W1").unwrap();

        assert_eq!(
            w1.attributes.keys().collect::<Vec<_>>(),
            vec!["tags", "title"]
        );
        assert_eq!(w1.attribute("tags"), Some(&AttributeValue::StrList(vec![])));
    }

    #[test]
    fn test_invalid_neighbors() {
        let records = make_records(json!({"W1": {"neighbors": "W2"}}));
        let err = graph_from_records(records, GraphKind::Undirected).unwrap_err();
        assert!(matches!(err, LoadError::InvalidNeighbors(id) if id == "W1"));

        let records = make_records(json!({"W1": {"neighbors": ["W2", 3]}}));
        assert!(graph_from_records(records, GraphKind::Undirected).is_err());
    }

    #[test]
    fn test_load_records_from_reader() {
        let input = br#"{"W1": {"neighbors": ["W2"]}, "W2": {}}"#;
        let records = load_records(&input[..]).unwrap();
        assert_eq!(records.len(), 2);

        assert!(matches!(load_records(&b"[1, 2]"[..]), Err(LoadError::Json(_))));
    }

    #[test]
    fn test_load_graph_missing_file() {
        let err = load_graph("/nonexistent/records.json", GraphKind::Undirected).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
