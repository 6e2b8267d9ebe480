//! In-memory graph backend.
//!
//! Vertices and edges live in ordered maps; each vertex keeps its outgoing
//! and incoming edge ids in insertion order, so scans replay the order in
//! which edges were added. A self-loop is listed on both sides.

use std::collections::{BTreeMap, HashMap};
use std::slice;

use propgraph_core::{
    Edge, EdgeId, IncidenceSource, Label, Properties, Value, Vertex, VertexId,
};
use tracing::debug;

use super::{validate_key, validate_properties};
use crate::error::{StorageError, StorageResult};

/// Per-vertex incidence lists.
#[derive(Debug, Clone, Default)]
struct Adjacency {
    outgoing: Vec<EdgeId>,
    incoming: Vec<EdgeId>,
}

/// A graph held entirely in memory.
///
/// # Example
///
/// ```
/// use propgraph_core::Properties;
/// use propgraph_storage::MemoryGraph;
///
/// let mut graph = MemoryGraph::new();
/// let a = graph.add_vertex();
/// let b = graph.add_vertex();
/// let e = graph
///     .add_edge_with(a, b, "friend", Properties::new().with("amount", 1.0))
///     .unwrap();
///
/// assert_eq!(graph.edge(e).unwrap().head, b);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    vertices: BTreeMap<VertexId, Vertex>,
    edges: BTreeMap<EdgeId, Edge>,
    adjacency: HashMap<VertexId, Adjacency>,
    next_vertex: u64,
    next_edge: u64,
}

impl MemoryGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex with no properties.
    pub fn add_vertex(&mut self) -> VertexId {
        let id = self.allocate_vertex();
        self.vertices.insert(id, Vertex::new(id));
        self.adjacency.insert(id, Adjacency::default());
        id
    }

    /// Add a vertex carrying `properties`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidProperty`] if a key is empty or reserved.
    pub fn add_vertex_with(&mut self, properties: Properties) -> StorageResult<VertexId> {
        validate_properties(&properties)?;
        let id = self.add_vertex();
        if let Some(vertex) = self.vertices.get_mut(&id) {
            vertex.properties = properties;
        }
        Ok(id)
    }

    /// Add an edge from `tail` to `head` with no properties.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VertexNotFound`] if either endpoint is missing.
    pub fn add_edge(
        &mut self,
        tail: VertexId,
        head: VertexId,
        label: impl Into<Label>,
    ) -> StorageResult<EdgeId> {
        self.add_edge_with(tail, head, label, Properties::new())
    }

    /// Add an edge from `tail` to `head` carrying `properties`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VertexNotFound`] if either endpoint is missing,
    /// or [`StorageError::InvalidProperty`] if a key is empty or reserved.
    pub fn add_edge_with(
        &mut self,
        tail: VertexId,
        head: VertexId,
        label: impl Into<Label>,
        properties: Properties,
    ) -> StorageResult<EdgeId> {
        for endpoint in [tail, head] {
            if !self.vertices.contains_key(&endpoint) {
                return Err(StorageError::VertexNotFound(endpoint));
            }
        }
        validate_properties(&properties)?;

        let id = self.allocate_edge();
        let mut edge = Edge::new(id, tail, head, label);
        edge.properties = properties;
        self.edges.insert(id, edge);
        self.adjacency.entry(tail).or_default().outgoing.push(id);
        self.adjacency.entry(head).or_default().incoming.push(id);
        Ok(id)
    }

    /// Set a property on an edge, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::EdgeNotFound`] or
    /// [`StorageError::InvalidProperty`].
    pub fn set_edge_property(
        &mut self,
        edge: EdgeId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> StorageResult<Option<Value>> {
        let key = key.into();
        validate_key(&key)?;
        let edge = self.edges.get_mut(&edge).ok_or(StorageError::EdgeNotFound(edge))?;
        Ok(edge.set_property(key, value))
    }

    /// Remove a property from an edge, returning the removed value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::EdgeNotFound`] if the edge is missing.
    pub fn remove_edge_property(
        &mut self,
        edge: EdgeId,
        key: &str,
    ) -> StorageResult<Option<Value>> {
        let edge = self.edges.get_mut(&edge).ok_or(StorageError::EdgeNotFound(edge))?;
        Ok(edge.remove_property(key))
    }

    /// Set a property on a vertex, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VertexNotFound`] or
    /// [`StorageError::InvalidProperty`].
    pub fn set_vertex_property(
        &mut self,
        vertex: VertexId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> StorageResult<Option<Value>> {
        let key = key.into();
        validate_key(&key)?;
        let vertex =
            self.vertices.get_mut(&vertex).ok_or(StorageError::VertexNotFound(vertex))?;
        Ok(vertex.set_property(key, value))
    }

    /// Remove an edge from the graph and both adjacency lists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::EdgeNotFound`] if the edge is missing.
    pub fn remove_edge(&mut self, id: EdgeId) -> StorageResult<Edge> {
        let edge = self.edges.remove(&id).ok_or(StorageError::EdgeNotFound(id))?;
        if let Some(adjacency) = self.adjacency.get_mut(&edge.tail) {
            adjacency.outgoing.retain(|&e| e != id);
        }
        if let Some(adjacency) = self.adjacency.get_mut(&edge.head) {
            adjacency.incoming.retain(|&e| e != id);
        }
        Ok(edge)
    }

    /// Remove a vertex and every edge incident to it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VertexNotFound`] if the vertex is missing.
    pub fn remove_vertex(&mut self, id: VertexId) -> StorageResult<Vertex> {
        let vertex = self.vertices.remove(&id).ok_or(StorageError::VertexNotFound(id))?;
        let adjacency = self.adjacency.remove(&id).unwrap_or_default();

        let mut incident = adjacency.outgoing;
        incident.extend(adjacency.incoming);
        incident.sort_unstable();
        incident.dedup();

        for edge_id in &incident {
            let Some(edge) = self.edges.remove(edge_id) else {
                continue;
            };
            let far = if edge.tail == id { edge.head } else { edge.tail };
            if let Some(adjacency) = self.adjacency.get_mut(&far) {
                adjacency.outgoing.retain(|e| e != edge_id);
                adjacency.incoming.retain(|e| e != edge_id);
            }
        }
        debug!(vertex = %id, edges = incident.len(), "removed vertex");
        Ok(vertex)
    }

    /// Get a vertex by id.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    /// Get an edge by id.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterate over every vertex in id order.
    pub fn vertices_iter(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Iterate over every edge in id order.
    pub fn edges_iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    fn allocate_vertex(&mut self) -> VertexId {
        self.next_vertex += 1;
        VertexId::new(self.next_vertex)
    }

    fn allocate_edge(&mut self) -> EdgeId {
        self.next_edge += 1;
        EdgeId::new(self.next_edge)
    }

    fn adjacency_of(&self, vertex: VertexId) -> StorageResult<&Adjacency> {
        self.adjacency.get(&vertex).ok_or(StorageError::VertexNotFound(vertex))
    }

    fn scan_ids<'a>(&'a self, ids: &'a [EdgeId]) -> MemoryScan<'a> {
        MemoryScan { edges: &self.edges, ids: ids.iter() }
    }
}

/// A scan over one side of a vertex's incidence in a [`MemoryGraph`].
pub struct MemoryScan<'a> {
    edges: &'a BTreeMap<EdgeId, Edge>,
    ids: slice::Iter<'a, EdgeId>,
}

impl Iterator for MemoryScan<'_> {
    type Item = StorageResult<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        let &id = self.ids.next()?;
        Some(self.edges.get(&id).cloned().ok_or(StorageError::EdgeNotFound(id)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl IncidenceSource for MemoryGraph {
    type Edge = Edge;
    type Error = StorageError;
    type Scan<'a> = MemoryScan<'a>;

    fn outgoing(&self, vertex: VertexId) -> StorageResult<Self::Scan<'_>> {
        Ok(self.scan_ids(&self.adjacency_of(vertex)?.outgoing))
    }

    fn incoming(&self, vertex: VertexId) -> StorageResult<Self::Scan<'_>> {
        Ok(self.scan_ids(&self.adjacency_of(vertex)?.incoming))
    }
}
