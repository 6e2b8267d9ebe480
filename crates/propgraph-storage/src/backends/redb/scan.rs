//! Incidence scans over a redb read transaction.

use std::ops::Bound;
use std::vec;

use propgraph_core::encoding::keys::{adjacency_bounds, decode_adjacency_key, encode_edge_key};
use propgraph_core::encoding::Decoder;
use propgraph_core::{Edge, EdgeId, VertexId};
use redb::{ReadOnlyTable, ReadTransaction, ReadableTable};
use tracing::{trace, warn};

use crate::error::{StorageError, StorageResult};

/// Default number of adjacency keys read per batch.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 256;

type ByteTable = ReadOnlyTable<&'static [u8], &'static [u8]>;

/// A lazy scan over one side of a vertex's incidence in a
/// [`RedbGraph`](super::RedbGraph).
///
/// Adjacency keys are read in batches of at most `batch_size`, each batch
/// resuming after the last key of the previous one, so at most one batch of
/// edge ids is held at a time and nothing is read until the first call to
/// `next`. Edge records are fetched and decoded one at a time.
///
/// A malformed adjacency key, a missing edge record, or an undecodable
/// record is yielded as an `Err` at its position.
pub struct RedbScan {
    index: ByteTable,
    edges: ByteTable,
    vertex: VertexId,
    batch: vec::IntoIter<StorageResult<EdgeId>>,
    /// Raw key of the last adjacency entry read.
    last_key: Option<Vec<u8>>,
    has_more: bool,
    batch_size: usize,
    keys_read: usize,
    // Declared last so the tables are released before the transaction.
    _tx: ReadTransaction,
}

impl RedbScan {
    pub(super) fn new(
        tx: ReadTransaction,
        index: ByteTable,
        edges: ByteTable,
        vertex: VertexId,
        batch_size: usize,
    ) -> Self {
        Self {
            index,
            edges,
            vertex,
            batch: Vec::new().into_iter(),
            last_key: None,
            has_more: true,
            batch_size: batch_size.max(1),
            keys_read: 0,
            _tx: tx,
        }
    }

    /// Number of adjacency keys read from the index so far.
    #[must_use]
    pub const fn keys_read(&self) -> usize {
        self.keys_read
    }

    fn load_next_batch(&mut self) {
        let batch =
            fetch_adjacent(&self.index, self.vertex, self.last_key.as_deref(), self.batch_size);
        trace!(vertex = %self.vertex, keys = batch.ids.len(), "loaded adjacency batch");

        self.keys_read += batch.ids.len();
        self.has_more = batch.has_more;
        if batch.last_key.is_some() {
            self.last_key = batch.last_key;
        }
        self.batch = batch.ids.into_iter();
    }

    fn resolve(&self, id: EdgeId) -> StorageResult<Edge> {
        read_edge(&self.edges, id)?.ok_or_else(|| {
            warn!(edge = %id, "adjacency entry points at a missing edge");
            StorageError::EdgeNotFound(id)
        })
    }
}

impl Iterator for RedbScan {
    type Item = StorageResult<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.batch.next() {
                return Some(entry.and_then(|id| self.resolve(id)));
            }
            if !self.has_more {
                return None;
            }
            self.load_next_batch();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = self.batch.len();
        (buffered, if self.has_more { None } else { Some(buffered) })
    }
}

/// Read and decode one edge record.
pub(super) fn read_edge(
    table: &impl ReadableTable<&'static [u8], &'static [u8]>,
    id: EdgeId,
) -> StorageResult<Option<Edge>> {
    let key = encode_edge_key(id);
    let Some(bytes) = table.get(key.as_slice())? else {
        return Ok(None);
    };
    Ok(Some(Edge::decode(bytes.value())?))
}

/// One batch of a vertex's adjacency entries.
pub(super) struct AdjacencyBatch {
    /// Edge ids in key order; malformed keys and read failures in place.
    pub(super) ids: Vec<StorageResult<EdgeId>>,
    /// Raw key of the last entry read, if any.
    pub(super) last_key: Option<Vec<u8>>,
    /// Whether entries may remain after this batch.
    pub(super) has_more: bool,
}

/// Read up to `limit` entries of `vertex`'s range of an adjacency index,
/// starting after `after` when given.
///
/// A read failure ends the range: it is the last entry of the batch and
/// `has_more` is false.
pub(super) fn fetch_adjacent(
    index: &impl ReadableTable<&'static [u8], &'static [u8]>,
    vertex: VertexId,
    after: Option<&[u8]>,
    limit: usize,
) -> AdjacencyBatch {
    let (lo, hi) = adjacency_bounds(vertex);
    let start = match after {
        Some(key) => Bound::Excluded(key),
        None => Bound::Included(lo.as_slice()),
    };
    let mut batch = AdjacencyBatch { ids: Vec::new(), last_key: None, has_more: false };

    let range = match index.range::<&[u8]>((start, Bound::Included(hi.as_slice()))) {
        Ok(range) => range,
        Err(e) => {
            batch.ids.push(Err(e.into()));
            return batch;
        }
    };

    for entry in range {
        let guard = match entry {
            Ok((key, _)) => key,
            Err(e) => {
                batch.ids.push(Err(e.into()));
                return batch;
            }
        };
        let key = guard.value();
        batch.ids.push(match decode_adjacency_key(key) {
            Some((owner, edge)) if owner == vertex => Ok(edge),
            _ => {
                warn!(vertex = %vertex, "corrupt adjacency key");
                Err(StorageError::Encoding(format!(
                    "corrupt adjacency key of {} bytes under {vertex}",
                    key.len()
                )))
            }
        });
        batch.last_key = Some(key.to_vec());

        if batch.ids.len() >= limit {
            batch.has_more = true;
            break;
        }
    }
    batch
}
