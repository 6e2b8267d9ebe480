//! Vertex types for the graph.

use serde::{Deserialize, Serialize};

use super::{Properties, Value, VertexId};

/// A vertex in the graph.
///
/// The vertex record only holds the identity and the property bag. Its
/// incidence sets are owned by the storage adapter and reached through
/// [`IncidenceSource`](crate::IncidenceSource).
///
/// # Example
///
/// ```
/// use propgraph_core::types::{Value, Vertex, VertexId};
///
/// let mut vertex = Vertex::new(VertexId::new(1)).with_property("name", "a");
/// vertex.set_property("rank", 3i64);
///
/// assert_eq!(vertex.get_property("name"), Some(&Value::from("a")));
/// assert_eq!(vertex.properties.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Unique identifier for this vertex.
    pub id: VertexId,
    /// Properties stored on this vertex.
    pub properties: Properties,
}

impl Vertex {
    /// Create a new vertex with no properties.
    #[must_use]
    pub fn new(id: VertexId) -> Self {
        Self { id, properties: Properties::new() }
    }

    /// Add a property to this vertex.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.set(key, value);
        self
    }

    /// Get a property value by key.
    #[inline]
    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Set a property value, returning the value it replaced.
    #[inline]
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.properties.set(key, value)
    }

    /// Remove a property value, returning it if it was present.
    #[inline]
    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }
}
