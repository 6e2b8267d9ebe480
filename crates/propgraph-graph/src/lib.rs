//! `propgraph` Graph
//!
//! This crate provides the incidence query engine: a fluent, vertex-centric
//! builder that filters a vertex's incident edges by direction, label and
//! property, and evaluates them lazily over any
//! [`IncidenceSource`](propgraph_core::IncidenceSource).
//!
//! # Example
//!
//! ```ignore
//! use propgraph_core::Direction;
//! use propgraph_graph::query::{Compare, QueryExt};
//!
//! let heavy = graph
//!     .query(a)
//!     .direction(Direction::Out)
//!     .labels(["friend", "hate"])
//!     .has_compare("amount", Compare::GreaterThan, 0.5)
//!     .edges()
//!     .collect_all()?;
//! ```
//!
//! # Modules
//!
//! - [`query`] - Query specification, builder and lazy execution
//! - [`error`] - Error types ([`GraphError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod query;

pub use error::{GraphError, GraphResult};
pub use query::{Compare, QueryExt, VertexQuery};
