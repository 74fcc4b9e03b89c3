//! In-memory graph state
//!
//! Nodes live in an arena of slots addressed by [`NodeHandle`], with a
//! separate ID → handle lookup. Each slot keeps the indices of its incident
//! edges so neighbor and degree queries don't scan the whole edge map.
//!
//! The graph exclusively owns its nodes and edges: mutations go through
//! `&mut self` and hand back only indices, IDs or errors.

use super::{merge_additive, AttributeValue, Edge, EdgeIndex, GraphKind, Node, NodeId};
use crate::error::GraphError;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Stable position of a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(usize);

#[derive(Debug, Clone)]
struct NodeSlot {
    node: Node,
    /// Edges with this node as either endpoint
    incident: BTreeSet<EdgeIndex>,
}

/// An attributed citation graph
#[derive(Debug, Clone, Default)]
pub struct Graph {
    kind: GraphKind,

    /// Node arena; `None` marks a freed slot
    slots: Vec<Option<NodeSlot>>,

    /// Freed slots available for reuse
    free: Vec<usize>,

    /// Node ID → arena handle
    index: HashMap<NodeId, NodeHandle>,

    /// Edges keyed by insertion index
    edges: BTreeMap<EdgeIndex, Edge>,

    /// Next edge index to hand out
    next_edge: EdgeIndex,
}

impl Graph {
    /// Create an empty graph of the given kind
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn undirected() -> Self {
        Self::new(GraphKind::Undirected)
    }

    pub fn directed() -> Self {
        Self::new(GraphKind::Directed)
    }

    pub fn multi() -> Self {
        Self::new(GraphKind::Multi)
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn node_count(&self) -> usize {
        self.index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Arena handle of a node
    pub fn handle(&self, id: &str) -> Option<NodeHandle> {
        self.index.get(id).copied()
    }

    /// Node stored at a handle, if the slot is still occupied
    pub fn node_at(&self, handle: NodeHandle) -> Option<&Node> {
        self.slot(handle).map(|slot| &slot.node)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.handle(id).and_then(|h| self.node_at(h))
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All nodes in arena order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.slots.iter().flatten().map(|slot| &slot.node)
    }

    /// All node IDs in arena order
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|n| n.id.clone()).collect()
    }

    /// All edges in index order
    pub fn edges(&self) -> impl Iterator<Item = (EdgeIndex, &Edge)> + '_ {
        self.edges.iter().map(|(idx, edge)| (*idx, edge))
    }

    pub fn edge_at(&self, index: EdgeIndex) -> Option<&Edge> {
        self.edges.get(&index)
    }

    /// Find the stored edge equal to `edge` under this graph's kind
    pub fn edge(&self, edge: &Edge) -> Option<(EdgeIndex, &Edge)> {
        self.find_edge(edge)
            .and_then(|idx| self.edges.get(&idx).map(|e| (idx, e)))
    }

    pub fn has_edge(&self, edge: &Edge) -> bool {
        self.find_edge(edge).is_some()
    }

    /// Canonical `"a-b"` key of an edge under this graph's kind
    pub fn edge_key(&self, edge: &Edge) -> String {
        edge.key(self.kind)
    }

    /// First edge connecting `a` and `b`, in index order.
    ///
    /// Endpoint order only matters on directed graphs. Returns `None` when the
    /// nodes are not adjacent; callers must handle absence explicitly.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<(EdgeIndex, &Edge)> {
        let slot = self.handle(a).and_then(|h| self.slot(h))?;
        slot.incident.iter().find_map(|idx| {
            let edge = self.edges.get(idx)?;
            edge.connects(a, b, self.kind).then_some((*idx, edge))
        })
    }

    /// Indices of the edges touching `id`, in index order
    pub fn incident_edges(&self, id: &str) -> Vec<EdgeIndex> {
        self.handle(id)
            .and_then(|h| self.slot(h))
            .map(|slot| slot.incident.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The opposite endpoint of every edge touching `id`, in edge index order.
    ///
    /// A node adjacent through several edges appears once per edge, and a
    /// self-loop yields the node itself. Unknown IDs have no neighbors.
    pub fn neighbors(&self, id: &str) -> Vec<&Node> {
        self.neighbor_ids(id)
            .into_iter()
            .filter_map(|n| self.node(&n))
            .collect()
    }

    /// IDs of the neighbors of `id`, with the same order and multiplicity as
    /// [`Graph::neighbors`]
    pub fn neighbor_ids(&self, id: &str) -> Vec<NodeId> {
        self.incident_edges(id)
            .into_iter()
            .filter_map(|idx| self.edges.get(&idx))
            .filter_map(|edge| edge.other(id).map(str::to_string))
            .collect()
    }

    /// Number of edges touching `id`
    pub fn degree(&self, id: &str) -> usize {
        self.handle(id)
            .and_then(|h| self.slot(h))
            .map(|slot| slot.incident.len())
            .unwrap_or(0)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Insert a node, or merge it into the existing node with the same ID.
    ///
    /// When merging, int attributes present on both sides are summed and any
    /// other incoming attribute overwrites the stored one. Re-inserting the
    /// same citation therefore accumulates counters.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        if let Some(handle) = self.handle(&node.id) {
            if let Some(slot) = self.slot_mut(handle) {
                merge_additive(&mut slot.node.attributes, node.attributes);
            }
            return handle;
        }

        let slot = NodeSlot {
            node,
            incident: BTreeSet::new(),
        };
        let id = slot.node.id.clone();

        let handle = match self.free.pop() {
            Some(pos) => {
                self.slots[pos] = Some(slot);
                NodeHandle(pos)
            }
            None => {
                self.slots.push(Some(slot));
                NodeHandle(self.slots.len() - 1)
            }
        };

        self.index.insert(id, handle);
        handle
    }

    pub fn add_nodes_from(&mut self, nodes: impl IntoIterator<Item = Node>) {
        for node in nodes {
            self.add_node(node);
        }
    }

    /// Insert an edge, or merge it into the equal edge already stored.
    ///
    /// Missing endpoints are inserted as attribute-less nodes. Returns the
    /// index of the stored edge.
    pub fn add_edge(&mut self, edge: Edge) -> EdgeIndex {
        if let Some(idx) = self.find_edge(&edge) {
            if let Some(existing) = self.edges.get_mut(&idx) {
                merge_additive(&mut existing.attributes, edge.attributes);
            }
            return idx;
        }

        let source = self.add_node(Node::new(edge.source.clone()));
        let target = self.add_node(Node::new(edge.target.clone()));

        let idx = self.next_edge;
        self.next_edge += 1;

        for handle in [source, target] {
            if let Some(slot) = self.slot_mut(handle) {
                slot.incident.insert(idx);
            }
        }
        self.edges.insert(idx, edge);
        idx
    }

    pub fn add_edges_from(&mut self, edges: impl IntoIterator<Item = Edge>) {
        for edge in edges {
            self.add_edge(edge);
        }
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, id: &str) -> Result<Node, GraphError> {
        self.detach_node(id)
            .map(|(node, _)| node)
            .ok_or_else(|| GraphError::node_not_found(id))
    }

    /// Remove a node and return it together with the edges that touched it
    pub(crate) fn detach_node(&mut self, id: &str) -> Option<(Node, Vec<Edge>)> {
        let handle = self.index.remove(id)?;
        let slot = self.slots.get_mut(handle.0)?.take()?;
        self.free.push(handle.0);

        let mut removed = Vec::with_capacity(slot.incident.len());
        for idx in &slot.incident {
            if let Some(edge) = self.edges.remove(idx) {
                if let Some(other) = edge.other(id) {
                    if let Some(other_slot) = self.handle(other).and_then(|h| self.slot_mut(h)) {
                        other_slot.incident.remove(idx);
                    }
                }
                removed.push(edge);
            }
        }

        Some((slot.node, removed))
    }

    /// Remove the stored edge equal to `edge`
    pub fn remove_edge(&mut self, edge: &Edge) -> Result<Edge, GraphError> {
        self.find_edge(edge)
            .and_then(|idx| self.remove_edge_at(idx))
            .ok_or_else(|| GraphError::edge_not_found(&edge.source, &edge.target))
    }

    /// Remove the edge stored at `index`
    pub fn remove_edge_at(&mut self, index: EdgeIndex) -> Option<Edge> {
        let edge = self.edges.remove(&index)?;
        for id in [&edge.source, &edge.target] {
            if let Some(slot) = self.handle(id).and_then(|h| self.slot_mut(h)) {
                slot.incident.remove(&index);
            }
        }
        Some(edge)
    }

    /// Set (or replace) a single attribute on a node
    pub fn set_node_attribute(
        &mut self,
        id: &str,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Result<(), GraphError> {
        let slot = self
            .handle(id)
            .and_then(|h| self.slot_mut(h))
            .ok_or_else(|| GraphError::node_not_found(id))?;
        slot.node.attributes.insert(key.into(), value.into());
        Ok(())
    }

    /// Set (or replace) a single attribute on the stored edge equal to `edge`
    pub fn set_edge_attribute(
        &mut self,
        edge: &Edge,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Result<(), GraphError> {
        let stored = self
            .find_edge(edge)
            .and_then(|idx| self.edges.get_mut(&idx))
            .ok_or_else(|| GraphError::edge_not_found(&edge.source, &edge.target))?;
        stored.attributes.insert(key.into(), value.into());
        Ok(())
    }

    // ========================================================================
    // Whole-graph operations
    // ========================================================================

    /// Combine two graphs of the same kind into a new graph.
    ///
    /// Nodes and edges of `other` are inserted with the usual merge rules, so
    /// shared nodes and edges accumulate int attributes.
    pub fn union(&self, other: &Graph) -> Result<Graph, GraphError> {
        if self.kind != other.kind {
            return Err(GraphError::KindMismatch {
                left: self.kind,
                right: other.kind,
            });
        }

        let mut combined = self.clone();
        combined.add_nodes_from(other.nodes().cloned());
        combined.add_edges_from(other.edges().map(|(_, e)| e.clone()));
        Ok(combined)
    }

    /// Check that both graphs have the same kind, the same node IDs and the
    /// same edges. Attributes of nodes are not compared; edge index
    /// positions are not compared either.
    pub fn same_structure(&self, other: &Graph) -> bool {
        if self.kind != other.kind
            || self.node_count() != other.node_count()
            || self.edge_count() != other.edge_count()
        {
            return false;
        }

        if !self.nodes().all(|n| other.has_node(&n.id)) {
            return false;
        }

        self.edges().all(|(_, e)| other.has_edge(e))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn slot(&self, handle: NodeHandle) -> Option<&NodeSlot> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, handle: NodeHandle) -> Option<&mut NodeSlot> {
        self.slots.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// Index of the stored edge equal to `edge`, scanning only the edges
    /// incident to its source
    fn find_edge(&self, edge: &Edge) -> Option<EdgeIndex> {
        let slot = self.handle(&edge.source).and_then(|h| self.slot(h))?;
        slot.incident.iter().copied().find(|idx| {
            self.edges
                .get(idx)
                .is_some_and(|stored| stored.same_as(edge, self.kind))
        })
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Kind: {}", self.kind)?;
        writeln!(f, "Nodes: {}", self.node_count())?;
        for node in self.nodes() {
            write!(f, "- ID: {}, attributes: {{", node.id)?;
            write_attributes(f, &node.attributes)?;
            writeln!(f, "}}")?;
        }
        writeln!(f, "Edges: {}", self.edge_count())?;
        for (_, edge) in self.edges() {
            write!(f, "- {} -- {}, attributes: {{", edge.source, edge.target)?;
            write_attributes(f, &edge.attributes)?;
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

fn write_attributes(f: &mut fmt::Formatter<'_>, attributes: &super::Attributes) -> fmt::Result {
    for (i, (key, value)) in attributes.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{key}: {value}")?;
    }
    Ok(())
}
