//! Vertex-centric incidence queries.
//!
//! A query starts at one vertex, scans its incident edges in the chosen
//! [`Direction`](propgraph_core::Direction), keeps the edges whose label is
//! accepted and whose properties satisfy every filter, and stops after the
//! limit.
//!
//! # Overview
//!
//! - [`Compare`] - Comparison operators for predicates
//! - [`Predicate`] / [`Interval`] / [`Filter`] - Property filters
//! - [`QuerySpec`] - The accumulated constraints of a query
//! - [`VertexQuery`] - The fluent builder and its terminal operations
//! - [`QueryEdges`] / [`QueryVertices`] - Lazy result streams
//!
//! # Evaluation order
//!
//! For each scanned edge the label set is checked first, then the filters in
//! the order they were added. The first failing check rejects the edge.
//! Under `BOTH` the outgoing side is scanned to completion before the
//! incoming side is opened.
//!
//! # Example
//!
//! ```ignore
//! use propgraph_graph::query::QueryExt;
//!
//! let n = graph.query(a).label("friend").interval("date", 5i64, 11i64).count()?;
//! ```

mod builder;
mod compare;
mod executor;
mod filter;

pub use builder::{QueryExt, QuerySpec, VertexQuery};
pub use compare::Compare;
pub use executor::{QueryEdges, QueryVertices};
pub use filter::{Filter, Interval, Predicate};
