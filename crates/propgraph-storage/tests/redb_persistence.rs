//! On-disk tests for the redb backend.

use propgraph_core::{EdgeId, IncidenceSource, Properties, Value, VertexId};
use propgraph_storage::{RedbConfig, RedbGraph, StorageError};
use tempfile::TempDir;

fn out_ids(graph: &RedbGraph, vertex: VertexId) -> Vec<EdgeId> {
    graph.outgoing(vertex).unwrap().map(|e| e.unwrap().id).collect()
}

// ============================================================================
// Reopen
// ============================================================================

#[test]
fn graph_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.redb");

    let (a, b, e) = {
        let graph = RedbGraph::open(&path).unwrap();
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
        (a, b, e)
    };

    let graph = RedbGraph::open(&path).unwrap();
    assert_eq!(graph.vertex_count().unwrap(), 2);
    assert_eq!(graph.edge_count().unwrap(), 1);
    assert_eq!(out_ids(&graph, a), vec![e]);

    let edge = graph.incoming(b).unwrap().next().unwrap().unwrap();
    assert_eq!(edge.tail, a);
    assert_eq!(edge.get_property("date"), Some(&Value::Int(10)));
    assert_eq!(
        graph.vertex(a).unwrap().unwrap().get_property("name"),
        Some(&Value::from("a"))
    );
}

#[test]
fn ids_are_not_reused_after_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.redb");

    let first = {
        let graph = RedbGraph::open(&path).unwrap();
        let a = graph.add_vertex().unwrap();
        let e = graph.add_edge(a, a, "self").unwrap();
        graph.remove_edge(e).unwrap();
        graph.remove_vertex(a).unwrap();
        (a, e)
    };

    let graph = RedbGraph::open(&path).unwrap();
    let a = graph.add_vertex().unwrap();
    let e = graph.add_edge(a, a, "self").unwrap();
    assert!(a > first.0);
    assert!(e > first.1);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn open_with_cache_size() {
    let dir = TempDir::new().unwrap();
    let config = RedbConfig::new().cache_size(4 * 1024 * 1024);
    let graph = RedbGraph::open_with_config(dir.path().join("cached.redb"), config).unwrap();
    let a = graph.add_vertex().unwrap();
    assert!(graph.vertex(a).unwrap().is_some());
}

#[test]
fn open_fails_on_directory() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(RedbGraph::open(dir.path()), Err(StorageError::Open(_))));
}
