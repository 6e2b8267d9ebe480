//! Edge types for the graph.
//!
//! This module provides the [`Edge`] type, a directed, labeled connection
//! from a tail vertex to a head vertex.
//!
//! # Example
//!
//! ```
//! use propgraph_core::types::{Edge, EdgeId, VertexId};
//!
//! let a = VertexId::new(1);
//! let b = VertexId::new(2);
//!
//! let friend = Edge::new(EdgeId::new(1), a, b, "friend")
//!     .with_property("amount", 1.0);
//!
//! assert_eq!(friend.label.as_str(), "friend");
//! assert_eq!(friend.tail, a);
//! assert_eq!(friend.head, b);
//! ```

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EdgeId, Properties, Value, VertexId};

/// The label of an edge.
///
/// Every edge carries exactly one label, such as "friend" or "hate".
/// Labels borrow as `str`, so label sets can be queried with plain strings.
///
/// # Example
///
/// ```
/// use propgraph_core::Label;
///
/// let label = Label::new("friend");
/// assert_eq!(label.as_str(), "friend");
///
/// let label: Label = "hate".into();
/// assert_eq!(label, Label::new("hate"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label(String);

impl Label {
    /// Create a new label.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the label as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Label {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Label {
    #[inline]
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for Label {
    #[inline]
    fn from(s: &String) -> Self {
        Self::new(s.as_str())
    }
}

/// A directed edge between two vertices.
///
/// Edges have:
/// - A unique identifier ([`EdgeId`])
/// - A tail (the vertex it leaves) and a head (the vertex it enters)
/// - Exactly one [`Label`]
/// - A [`Properties`] bag
///
/// An edge whose tail and head are the same vertex is a self-loop: it is
/// both an outgoing and an incoming edge of that vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier for this edge.
    pub id: EdgeId,
    /// The vertex this edge leaves.
    pub tail: VertexId,
    /// The vertex this edge enters.
    pub head: VertexId,
    /// The label of this edge.
    pub label: Label,
    /// Properties stored on this edge.
    pub properties: Properties,
}

impl Edge {
    /// Create a new edge from `tail` to `head`.
    #[must_use]
    pub fn new(id: EdgeId, tail: VertexId, head: VertexId, label: impl Into<Label>) -> Self {
        Self { id, tail, head, label: label.into(), properties: Properties::new() }
    }

    /// Add a property to this edge.
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

    /// Returns `true` if this edge leaves and enters the same vertex.
    #[inline]
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.tail == self.head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_creation() {
        let edge = Edge::new(EdgeId::new(1), VertexId::new(10), VertexId::new(20), "friend")
            .with_property("since", "2024-01-01");

        assert_eq!(edge.id.as_u64(), 1);
        assert_eq!(edge.tail.as_u64(), 10);
        assert_eq!(edge.head.as_u64(), 20);
        assert_eq!(edge.label.as_str(), "friend");
        assert_eq!(edge.get_property("since"), Some(&Value::String("2024-01-01".to_owned())));
        assert!(!edge.is_self_loop());
    }

    #[test]
    fn self_loop_detection() {
        let (a, b) = (VertexId::new(1), VertexId::new(2));
        assert!(Edge::new(EdgeId::new(2), a, a, "self").is_self_loop());
        assert!(!Edge::new(EdgeId::new(3), a, b, "hate").is_self_loop());
    }

    #[test]
    fn label_borrows_as_str() {
        let labels: std::collections::HashSet<Label> =
            ["friend", "hate"].into_iter().map(Label::from).collect();
        assert!(labels.contains("friend"));
        assert!(!labels.contains("love"));
    }

    #[test]
    fn property_mutation() {
        let mut edge = Edge::new(EdgeId::new(1), VertexId::new(1), VertexId::new(2), "x");
        assert_eq!(edge.set_property("amount", 1.0), None);
        assert_eq!(edge.remove_property("amount"), Some(Value::Float(1.0)));
        assert!(edge.properties.is_empty());
    }
}
