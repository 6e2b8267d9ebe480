//! `propgraph` Storage
//!
//! This crate provides the storage adapters that satisfy the
//! [`IncidenceSource`](propgraph_core::IncidenceSource) contract, so the
//! query engine in `propgraph-graph` can run over them.
//!
//! # Backends
//!
//! - [`MemoryGraph`] - Maps and insertion-ordered adjacency lists in memory
//! - [`RedbGraph`] - A persistent graph in a redb database, with adjacency
//!   served by ordered range scans
//!
//! # Modules
//!
//! - [`backends`] - Concrete storage backend implementations
//! - [`error`] - Error types ([`StorageError`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod backends;
pub mod error;

pub use backends::{MemoryGraph, RedbConfig, RedbGraph, RESERVED_KEYS};
pub use error::{StorageError, StorageResult};
