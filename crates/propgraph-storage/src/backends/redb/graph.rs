//! The redb-backed graph.

use std::path::Path;

use propgraph_core::encoding::keys::{encode_adjacency_key, encode_edge_key, encode_vertex_key};
use propgraph_core::encoding::{Decoder, Encoder};
use propgraph_core::{Edge, EdgeId, IncidenceSource, Label, Properties, Value, Vertex, VertexId};
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition, WriteTransaction};
use tracing::{debug, info};

use super::scan::{fetch_adjacent, read_edge, RedbScan, DEFAULT_SCAN_BATCH_SIZE};
use super::tables::{
    EDGES, EDGES_IN, EDGES_OUT, EMPTY, LAST_EDGE_ID, LAST_VERTEX_ID, METADATA, VERTICES,
};
use crate::backends::{validate_key, validate_properties};
use crate::error::{StorageError, StorageResult};

type RecordTable = TableDefinition<'static, &'static [u8], &'static [u8]>;

/// Configuration options for the redb graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbConfig {
    /// Cache size in bytes.
    /// If not set, uses Redb's default.
    pub cache_size: Option<usize>,
    /// Adjacency keys read per batch by incidence scans.
    /// If not set, uses [`DEFAULT_SCAN_BATCH_SIZE`].
    pub scan_batch_size: Option<usize>,
}

impl RedbConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }

    /// Set the scan batch size. Zero is treated as one.
    #[must_use]
    pub const fn scan_batch_size(mut self, size: usize) -> Self {
        self.scan_batch_size = Some(size);
        self
    }
}

/// A graph stored in a redb database.
///
/// Every mutation runs in its own write transaction. Every incidence scan
/// runs in its own read transaction, so it sees a consistent snapshot even
/// if the graph is mutated while the scan is alive.
///
/// # Example
///
/// ```
/// use propgraph_core::Properties;
/// use propgraph_storage::RedbGraph;
///
/// let graph = RedbGraph::in_memory().unwrap();
/// let a = graph.add_vertex().unwrap();
/// let b = graph.add_vertex().unwrap();
/// graph.add_edge_with(a, b, "friend", Properties::new().with("amount", 1.0)).unwrap();
///
/// assert_eq!(graph.edge_count().unwrap(), 1);
/// ```
pub struct RedbGraph {
    db: Database,
    scan_batch_size: usize,
}

impl RedbGraph {
    /// Open or create a graph at the given path with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or
    /// created.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::open_with_config(path, RedbConfig::default())
    }

    /// Open or create a graph at the given path with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or
    /// created.
    pub fn open_with_config(path: impl AsRef<Path>, config: RedbConfig) -> StorageResult<Self> {
        let mut builder = Database::builder();
        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder.create(path.as_ref())?;
        info!(path = %path.as_ref().display(), "opened redb graph");
        Self::init(db, config)
    }

    /// Create an in-memory graph for testing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory() -> StorageResult<Self> {
        Self::in_memory_with_config(RedbConfig::default())
    }

    /// Create an in-memory graph with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory_with_config(config: RedbConfig) -> StorageResult<Self> {
        let mut builder = Database::builder();
        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }
        let db = builder.create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db, config)
    }

    /// Create every table so read transactions never find one missing.
    fn init(db: Database, config: RedbConfig) -> StorageResult<Self> {
        let tx = db.begin_write()?;
        for table in [VERTICES, EDGES, EDGES_OUT, EDGES_IN] {
            let _ = tx.open_table(table)?;
        }
        let _ = tx.open_table(METADATA)?;
        tx.commit()?;
        let scan_batch_size = config.scan_batch_size.unwrap_or(DEFAULT_SCAN_BATCH_SIZE).max(1);
        Ok(Self { db, scan_batch_size })
    }

    /// Add a vertex with no properties.
    ///
    /// # Errors
    ///
    /// Returns an error if the write transaction fails.
    pub fn add_vertex(&self) -> StorageResult<VertexId> {
        self.add_vertex_with(Properties::new())
    }

    /// Add a vertex carrying `properties`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidProperty`] if a key is empty or
    /// reserved, or an error if the write transaction fails.
    pub fn add_vertex_with(&self, properties: Properties) -> StorageResult<VertexId> {
        validate_properties(&properties)?;
        self.write(|tx| {
            let id = VertexId::new(next_id(tx, LAST_VERTEX_ID)?);
            let mut vertex = Vertex::new(id);
            vertex.properties = properties;
            put(tx, VERTICES, &encode_vertex_key(id), &vertex.encode()?)?;
            Ok(id)
        })
    }

    /// Add an edge from `tail` to `head` with no properties.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VertexNotFound`] if either endpoint is
    /// missing, or an error if the write transaction fails.
    pub fn add_edge(
        &self,
        tail: VertexId,
        head: VertexId,
        label: impl Into<Label>,
    ) -> StorageResult<EdgeId> {
        self.add_edge_with(tail, head, label, Properties::new())
    }

    /// Add an edge from `tail` to `head` carrying `properties`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VertexNotFound`] if either endpoint is
    /// missing, [`StorageError::InvalidProperty`] if a key is empty or
    /// reserved, or an error if the write transaction fails.
    pub fn add_edge_with(
        &self,
        tail: VertexId,
        head: VertexId,
        label: impl Into<Label>,
        properties: Properties,
    ) -> StorageResult<EdgeId> {
        validate_properties(&properties)?;
        let label = label.into();
        self.write(|tx| {
            {
                let vertices = tx.open_table(VERTICES)?;
                for endpoint in [tail, head] {
                    if vertices.get(encode_vertex_key(endpoint).as_slice())?.is_none() {
                        return Err(StorageError::VertexNotFound(endpoint));
                    }
                }
            }

            let id = EdgeId::new(next_id(tx, LAST_EDGE_ID)?);
            let mut edge = Edge::new(id, tail, head, label);
            edge.properties = properties;
            put(tx, EDGES, &encode_edge_key(id), &edge.encode()?)?;
            put(tx, EDGES_OUT, &encode_adjacency_key(tail, id), EMPTY)?;
            put(tx, EDGES_IN, &encode_adjacency_key(head, id), EMPTY)?;
            Ok(id)
        })
    }

    /// Set a property on an edge, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::EdgeNotFound`],
    /// [`StorageError::InvalidProperty`], or an error if the write
    /// transaction fails.
    pub fn set_edge_property(
        &self,
        edge: EdgeId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> StorageResult<Option<Value>> {
        let key = key.into();
        validate_key(&key)?;
        let value = value.into();
        self.write(|tx| {
            let missing = StorageError::EdgeNotFound(edge);
            update::<Edge, _>(tx, EDGES, &encode_edge_key(edge), missing, |e| {
                e.set_property(key, value)
            })
        })
    }

    /// Remove a property from an edge, returning the removed value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::EdgeNotFound`] or an error if the write
    /// transaction fails.
    pub fn remove_edge_property(&self, edge: EdgeId, key: &str) -> StorageResult<Option<Value>> {
        self.write(|tx| {
            let missing = StorageError::EdgeNotFound(edge);
            update::<Edge, _>(tx, EDGES, &encode_edge_key(edge), missing, |e| {
                e.remove_property(key)
            })
        })
    }

    /// Set a property on a vertex, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VertexNotFound`],
    /// [`StorageError::InvalidProperty`], or an error if the write
    /// transaction fails.
    pub fn set_vertex_property(
        &self,
        vertex: VertexId,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> StorageResult<Option<Value>> {
        let key = key.into();
        validate_key(&key)?;
        let value = value.into();
        self.write(|tx| {
            update::<Vertex, _>(
                tx,
                VERTICES,
                &encode_vertex_key(vertex),
                StorageError::VertexNotFound(vertex),
                |v| v.set_property(key, value),
            )
        })
    }

    /// Remove an edge and its two adjacency entries.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::EdgeNotFound`] or an error if the write
    /// transaction fails.
    pub fn remove_edge(&self, id: EdgeId) -> StorageResult<Edge> {
        self.write(|tx| remove_edge_in(tx, id))
    }

    /// Remove a vertex and every edge incident to it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::VertexNotFound`] or an error if the write
    /// transaction fails.
    pub fn remove_vertex(&self, id: VertexId) -> StorageResult<Vertex> {
        self.write(|tx| {
            let vertex = {
                let mut vertices = tx.open_table(VERTICES)?;
                let removed = vertices.remove(encode_vertex_key(id).as_slice())?;
                match removed {
                    Some(bytes) => Vertex::decode(bytes.value())?,
                    None => return Err(StorageError::VertexNotFound(id)),
                }
            };

            let mut incident = Vec::new();
            for index in [EDGES_OUT, EDGES_IN] {
                let index = tx.open_table(index)?;
                for edge in fetch_adjacent(&index, id, None, usize::MAX).ids {
                    incident.push(edge?);
                }
            }
            incident.sort_unstable();
            incident.dedup();

            for &edge in &incident {
                remove_edge_in(tx, edge)?;
            }
            debug!(vertex = %id, edges = incident.len(), "removed vertex");
            Ok(vertex)
        })
    }

    /// Get a vertex by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the record cannot be decoded.
    pub fn vertex(&self, id: VertexId) -> StorageResult<Option<Vertex>> {
        let tx = self.db.begin_read()?;
        let vertices = tx.open_table(VERTICES)?;
        let Some(bytes) = vertices.get(encode_vertex_key(id).as_slice())? else {
            return Ok(None);
        };
        Ok(Some(Vertex::decode(bytes.value())?))
    }

    /// Get an edge by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the record cannot be decoded.
    pub fn edge(&self, id: EdgeId) -> StorageResult<Option<Edge>> {
        let tx = self.db.begin_read()?;
        let edges = tx.open_table(EDGES)?;
        read_edge(&edges, id)
    }

    /// Number of vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn vertex_count(&self) -> StorageResult<usize> {
        self.count(VERTICES)
    }

    /// Number of edges.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn edge_count(&self) -> StorageResult<usize> {
        self.count(EDGES)
    }

    /// Read every edge in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or a record cannot be decoded.
    pub fn all_edges(&self) -> StorageResult<Vec<Edge>> {
        let tx = self.db.begin_read()?;
        let edges = tx.open_table(EDGES)?;
        let mut all = Vec::new();
        for entry in edges.iter()? {
            let (_, bytes) = entry?;
            all.push(Edge::decode(bytes.value())?);
        }
        Ok(all)
    }

    /// Get the underlying redb database.
    pub const fn inner(&self) -> &Database {
        &self.db
    }

    fn count(&self, table: RecordTable) -> StorageResult<usize> {
        let tx = self.db.begin_read()?;
        let len = tx.open_table(table)?.len()?;
        Ok(usize::try_from(len).unwrap_or(usize::MAX))
    }

    /// Run `f` in a write transaction, committing only if it succeeds.
    fn write<T>(&self, f: impl FnOnce(&WriteTransaction) -> StorageResult<T>) -> StorageResult<T> {
        let tx = self.db.begin_write()?;
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                // Ignore abort result - the original error is what matters
                drop(tx.abort());
                Err(err)
            }
        }
    }

    fn scan(&self, vertex: VertexId, index: RecordTable) -> StorageResult<RedbScan> {
        let tx = self.db.begin_read()?;
        {
            let vertices = tx.open_table(VERTICES)?;
            if vertices.get(encode_vertex_key(vertex).as_slice())?.is_none() {
                return Err(StorageError::VertexNotFound(vertex));
            }
        }
        let index = tx.open_table(index)?;
        let edges = tx.open_table(EDGES)?;
        Ok(RedbScan::new(tx, index, edges, vertex, self.scan_batch_size))
    }
}

impl IncidenceSource for RedbGraph {
    type Edge = Edge;
    type Error = StorageError;
    type Scan<'a> = RedbScan;

    fn outgoing(&self, vertex: VertexId) -> StorageResult<Self::Scan<'_>> {
        self.scan(vertex, EDGES_OUT)
    }

    fn incoming(&self, vertex: VertexId) -> StorageResult<Self::Scan<'_>> {
        self.scan(vertex, EDGES_IN)
    }
}

/// Bump and return an id counter.
fn next_id(tx: &WriteTransaction, counter: &str) -> StorageResult<u64> {
    let mut metadata = tx.open_table(METADATA)?;
    let next = metadata.get(counter)?.map_or(0, |last| last.value()) + 1;
    metadata.insert(counter, next)?;
    Ok(next)
}

fn put(tx: &WriteTransaction, table: RecordTable, key: &[u8], value: &[u8]) -> StorageResult<()> {
    let mut table = tx.open_table(table)?;
    table.insert(key, value)?;
    Ok(())
}

/// Read-modify-write one record.
fn update<R, T>(
    tx: &WriteTransaction,
    table: RecordTable,
    key: &[u8],
    missing: StorageError,
    f: impl FnOnce(&mut R) -> T,
) -> StorageResult<T>
where
    R: Encoder + Decoder,
{
    let mut table = tx.open_table(table)?;
    let mut record = match table.get(key)? {
        Some(bytes) => R::decode(bytes.value())?,
        None => return Err(missing),
    };
    let out = f(&mut record);
    table.insert(key, record.encode()?.as_slice())?;
    Ok(out)
}

fn remove_edge_in(tx: &WriteTransaction, id: EdgeId) -> StorageResult<Edge> {
    let edge = {
        let mut edges = tx.open_table(EDGES)?;
        let removed = edges.remove(encode_edge_key(id).as_slice())?;
        match removed {
            Some(bytes) => Edge::decode(bytes.value())?,
            None => return Err(StorageError::EdgeNotFound(id)),
        }
    };
    {
        let mut out = tx.open_table(EDGES_OUT)?;
        out.remove(encode_adjacency_key(edge.tail, id).as_slice())?;
    }
    {
        let mut inc = tx.open_table(EDGES_IN)?;
        inc.remove(encode_adjacency_key(edge.head, id).as_slice())?;
    }
    Ok(edge)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(scan: RedbScan) -> Vec<EdgeId> {
        scan.map(|e| e.unwrap().id).collect()
    }

    #[test]
    fn config_builder() {
        let config = RedbConfig::new().cache_size(1024 * 1024 * 10).scan_batch_size(64);
        assert_eq!(config.cache_size, Some(10 * 1024 * 1024));
        assert_eq!(config.scan_batch_size, Some(64));
        assert_eq!(RedbConfig::default().scan_batch_size, None);
    }

    #[test]
    fn scans_follow_edge_id_order() {
        let graph = RedbGraph::in_memory().unwrap();
        let a = graph.add_vertex().unwrap();
        let b = graph.add_vertex().unwrap();
        let c = graph.add_vertex().unwrap();
        let e1 = graph.add_edge(a, b, "friend").unwrap();
        let e2 = graph.add_edge(a, c, "hate").unwrap();
        let e3 = graph.add_edge(c, a, "hate").unwrap();

        assert_eq!(ids(graph.outgoing(a).unwrap()), vec![e1, e2]);
        assert_eq!(ids(graph.incoming(a).unwrap()), vec![e3]);
        assert_eq!(ids(graph.incoming(b).unwrap()), vec![e1]);
        assert!(ids(graph.outgoing(b).unwrap()).is_empty());
    }

    #[test]
    fn unknown_vertex_fails_to_scan() {
        let graph = RedbGraph::in_memory().unwrap();
        let err = graph.outgoing(VertexId::new(5)).err().unwrap();
        assert!(matches!(err, StorageError::VertexNotFound(v) if v == VertexId::new(5)));
    }

    #[test]
    fn edge_requires_existing_endpoints() {
        let graph = RedbGraph::in_memory().unwrap();
        let a = graph.add_vertex().unwrap();
        assert!(matches!(
            graph.add_edge(a, VertexId::new(42), "friend"),
            Err(StorageError::VertexNotFound(_))
        ));
        assert_eq!(graph.edge_count().unwrap(), 0);
        assert_eq!(graph.add_edge(a, a, "self").unwrap(), EdgeId::new(1));
    }

    #[test]
    fn properties_round_trip_through_records() {
        let graph = RedbGraph::in_memory().unwrap();
        let a = graph.add_vertex_with(Properties::new().with("name", "a")).unwrap();
        let b = graph.add_vertex().unwrap();
        let e = graph
            .add_edge_with(
                a,
                b,
                "friend",
                Properties::new().with("amount", 1.0).with("date", 10i64),
            )
            .unwrap();

        assert_eq!(graph.set_edge_property(e, "amount", 0.5).unwrap(), Some(Value::Float(1.0)));
        assert_eq!(graph.remove_edge_property(e, "date").unwrap(), Some(Value::Int(10)));
        assert_eq!(graph.set_vertex_property(b, "name", "b").unwrap(), None);

        let edge = graph.edge(e).unwrap().unwrap();
        assert_eq!(edge.get_property("amount"), Some(&Value::Float(0.5)));
        assert_eq!(edge.get_property("date"), None);
        assert_eq!(graph.vertex(a).unwrap().unwrap().get_property("name"), Some(&Value::from("a")));
        assert_eq!(graph.vertex(b).unwrap().unwrap().get_property("name"), Some(&Value::from("b")));
        assert!(graph.set_edge_property(EdgeId::new(9), "amount", 1.0).is_err());
        assert!(graph.set_edge_property(e, "label", "x").is_err());
    }

    #[test]
    fn remove_vertex_cascades() {
        let graph = RedbGraph::in_memory().unwrap();
        let a = graph.add_vertex().unwrap();
        let b = graph.add_vertex().unwrap();
        let c = graph.add_vertex().unwrap();
        graph.add_edge(a, b, "friend").unwrap();
        graph.add_edge(c, a, "hate").unwrap();
        graph.add_edge(a, a, "self").unwrap();
        let kept = graph.add_edge(b, c, "friend").unwrap();

        graph.remove_vertex(a).unwrap();

        assert_eq!(graph.vertex_count().unwrap(), 2);
        let remaining: Vec<_> = graph.all_edges().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![kept]);
        assert!(ids(graph.incoming(b).unwrap()).is_empty());
        assert!(ids(graph.outgoing(c).unwrap()).is_empty());
        assert_eq!(ids(graph.outgoing(b).unwrap()), vec![kept]);
        assert!(graph.vertex(a).unwrap().is_none());
        assert!(matches!(graph.remove_vertex(a), Err(StorageError::VertexNotFound(_))));
    }

    #[test]
    fn dangling_adjacency_entry_is_yielded_as_error() {
        let graph = RedbGraph::in_memory().unwrap();
        let a = graph.add_vertex().unwrap();
        let b = graph.add_vertex().unwrap();
        let e1 = graph.add_edge(a, b, "friend").unwrap();
        let e2 = graph.add_edge(a, b, "hate").unwrap();

        // Delete the record behind e1 but leave its index entries.
        let tx = graph.inner().begin_write().unwrap();
        {
            let mut edges = tx.open_table(EDGES).unwrap();
            edges.remove(encode_edge_key(e1).as_slice()).unwrap();
        }
        tx.commit().unwrap();

        let mut scan = graph.outgoing(a).unwrap();
        assert!(matches!(scan.next(), Some(Err(StorageError::EdgeNotFound(id))) if id == e1));
        assert_eq!(scan.next().unwrap().unwrap().id, e2);
        assert!(scan.next().is_none());
    }

    #[test]
    fn scan_sees_snapshot() {
        let graph = RedbGraph::in_memory().unwrap();
        let a = graph.add_vertex().unwrap();
        let b = graph.add_vertex().unwrap();
        let e1 = graph.add_edge(a, b, "friend").unwrap();

        let scan = graph.outgoing(a).unwrap();
        graph.add_edge(a, b, "friend").unwrap();
        assert_eq!(ids(scan), vec![e1]);
        assert_eq!(graph.outgoing(a).unwrap().count(), 2);
    }
}
