//! Key encoding for ordered storage.
//!
//! Keys preserve numeric sort order so key-value backends can serve
//! incidence scans as range scans.
//!
//! # Key Layouts
//!
//! - Vertex key: `[vertex_id]`
//! - Edge key: `[edge_id]`
//! - Adjacency key: `[vertex_id][edge_id]`, stored once in the outgoing
//!   index under the tail and once in the incoming index under the head
//!
//! All numeric values are encoded big-endian. Every adjacency key of a
//! vertex falls inside [`adjacency_bounds`], ordered by edge id.

use crate::types::{EdgeId, VertexId};

/// Length of a vertex or edge key.
pub const ID_KEY_LEN: usize = 8;

/// Length of an adjacency key.
pub const ADJACENCY_KEY_LEN: usize = 16;

/// Encode a vertex ID as a storage key.
#[inline]
#[must_use]
pub const fn encode_vertex_key(id: VertexId) -> [u8; ID_KEY_LEN] {
    id.as_u64().to_be_bytes()
}

/// Encode an edge ID as a storage key.
#[inline]
#[must_use]
pub const fn encode_edge_key(id: EdgeId) -> [u8; ID_KEY_LEN] {
    id.as_u64().to_be_bytes()
}

/// Encode an adjacency entry for `vertex` and `edge`.
#[must_use]
pub fn encode_adjacency_key(vertex: VertexId, edge: EdgeId) -> [u8; ADJACENCY_KEY_LEN] {
    let mut key = [0u8; ADJACENCY_KEY_LEN];
    key[..ID_KEY_LEN].copy_from_slice(&vertex.as_u64().to_be_bytes());
    key[ID_KEY_LEN..].copy_from_slice(&edge.as_u64().to_be_bytes());
    key
}

/// Inclusive key bounds covering every adjacency entry of `vertex`.
#[must_use]
pub fn adjacency_bounds(vertex: VertexId) -> ([u8; ADJACENCY_KEY_LEN], [u8; ADJACENCY_KEY_LEN]) {
    (
        encode_adjacency_key(vertex, EdgeId::new(0)),
        encode_adjacency_key(vertex, EdgeId::new(u64::MAX)),
    )
}

/// Decode a vertex key.
///
/// Returns `None` if the key has the wrong length.
#[must_use]
pub fn decode_vertex_key(key: &[u8]) -> Option<VertexId> {
    let bytes: [u8; ID_KEY_LEN] = key.try_into().ok()?;
    Some(VertexId::new(u64::from_be_bytes(bytes)))
}

/// Decode an edge key.
///
/// Returns `None` if the key has the wrong length.
#[must_use]
pub fn decode_edge_key(key: &[u8]) -> Option<EdgeId> {
    let bytes: [u8; ID_KEY_LEN] = key.try_into().ok()?;
    Some(EdgeId::new(u64::from_be_bytes(bytes)))
}

/// Decode an adjacency key into its vertex and edge IDs.
///
/// Returns `None` if the key has the wrong length.
#[must_use]
pub fn decode_adjacency_key(key: &[u8]) -> Option<(VertexId, EdgeId)> {
    if key.len() != ADJACENCY_KEY_LEN {
        return None;
    }
    let vertex = decode_vertex_key(&key[..ID_KEY_LEN])?;
    let edge = decode_edge_key(&key[ID_KEY_LEN..])?;
    Some((vertex, edge))
}
