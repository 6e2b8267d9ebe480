//! `propgraph` Core
//!
//! This crate provides the fundamental types of the propgraph property-graph
//! access layer, and the incidence-scan contract that every storage adapter
//! satisfies.
//!
//! # Overview
//!
//! - **Identifiers**: [`VertexId`] and [`EdgeId`] for referencing graph elements
//! - **Graph primitives**: [`Vertex`] and [`Edge`], each carrying a [`Properties`] bag
//! - **Values**: the closed [`Value`] sum type stored in property bags
//! - **Incidence**: [`Direction`], [`EdgeView`] and [`IncidenceSource`], the
//!   interface a storage engine exposes to the query engine
//!
//! # Example
//!
//! ```
//! use propgraph_core::{Direction, Edge, EdgeId, EdgeView, Value, VertexId};
//!
//! let a = VertexId::new(1);
//! let b = VertexId::new(2);
//!
//! let friend = Edge::new(EdgeId::new(1), a, b, "friend")
//!     .with_property("amount", 1.0)
//!     .with_property("date", 10i64);
//!
//! assert_eq!(friend.label(), "friend");
//! assert_eq!(friend.get_property("date"), Some(&Value::Int(10)));
//! assert_eq!(friend.opposite(a, Direction::Out), b);
//! assert_eq!(friend.opposite(b, Direction::Both), a);
//! ```
//!
//! # Modules
//!
//! - [`types`] - Core data types ([`Vertex`], [`Edge`], [`Value`], [`Properties`], IDs)
//! - [`incidence`] - The storage-facing incidence contract
//! - [`encoding`] - Record serialization and adjacency key encoding
//! - [`error`] - Error types ([`CoreError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod encoding;
pub mod error;
pub mod incidence;
pub mod types;

pub use error::CoreError;
pub use incidence::{Direction, EdgeView, IncidenceSource};
pub use types::{Edge, EdgeId, Label, Properties, Value, ValueKind, Vertex, VertexId};
