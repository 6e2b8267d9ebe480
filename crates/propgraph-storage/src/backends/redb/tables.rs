//! Redb table definitions.
//!
//! Records are keyed by their big-endian id. The two adjacency indexes are
//! keyed by `[vertex_id][edge_id]` and carry no value, so every incidence
//! scan is a range scan over one vertex's prefix.

use redb::TableDefinition;

/// Vertex records: `vertex_id -> Vertex`.
pub const VERTICES: TableDefinition<'static, &[u8], &[u8]> = TableDefinition::new("vertices");

/// Edge records: `edge_id -> Edge`.
pub const EDGES: TableDefinition<'static, &[u8], &[u8]> = TableDefinition::new("edges");

/// Outgoing index: `tail_id ++ edge_id -> ()`.
pub const EDGES_OUT: TableDefinition<'static, &[u8], &[u8]> = TableDefinition::new("edges_out");

/// Incoming index: `head_id ++ edge_id -> ()`.
pub const EDGES_IN: TableDefinition<'static, &[u8], &[u8]> = TableDefinition::new("edges_in");

/// Id counters.
pub const METADATA: TableDefinition<'static, &str, u64> = TableDefinition::new("metadata");

/// Value stored in the adjacency indexes.
pub const EMPTY: &[u8] = &[];

/// Metadata key holding the last allocated vertex id.
pub const LAST_VERTEX_ID: &str = "last_vertex_id";

/// Metadata key holding the last allocated edge id.
pub const LAST_EDGE_ID: &str = "last_edge_id";
