//! Redb storage backend.
//!
//! This module provides a graph stored in the [Redb](https://docs.rs/redb)
//! embedded database.
//!
//! # Components
//!
//! - [`RedbGraph`] - The graph handle and its mutation API
//! - [`RedbConfig`] - Configuration options
//! - [`RedbScan`] - A lazy, batched incidence scan over one read transaction
//!
//! # Tables
//!
//! Vertices and edges are stored as versioned bincode records in the
//! `vertices` and `edges` tables. Each edge is indexed twice, in
//! `edges_out` under its tail and in `edges_in` under its head. Id counters
//! live in `metadata`.

mod graph;
mod scan;
mod tables;

pub use graph::{RedbConfig, RedbGraph};
pub use scan::{RedbScan, DEFAULT_SCAN_BATCH_SIZE};
