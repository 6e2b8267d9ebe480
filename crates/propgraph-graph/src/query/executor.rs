//! Lazy execution of incidence queries.
//!
//! A query is driven by a [`Pipeline`] that walks the scan sides in order
//! (outgoing before incoming), applies the label set and the property
//! filters to each edge, and counts accepted edges against the limit. The
//! public iterators project the accepted edges.
//!
//! The pipeline fuses on exhaustion, on reaching the limit, and on the
//! first storage error. Once it has fused it never calls into storage
//! again, and neither does a limit of zero.

use std::iter::FusedIterator;
use std::slice;

use propgraph_core::{Direction, EdgeView, IncidenceSource, VertexId};
use tracing::{debug, trace};

use super::QuerySpec;
use crate::error::{GraphError, GraphResult};

/// The shared scan-filter-limit state machine behind every terminal
/// operation.
pub(crate) struct Pipeline<'g, S: IncidenceSource + 'g> {
    source: &'g S,
    vertex: VertexId,
    spec: QuerySpec,
    /// Sides not yet opened.
    sides: slice::Iter<'static, Direction>,
    /// The side being scanned and its open scan.
    current: Option<(Direction, S::Scan<'g>)>,
    /// Edges accepted so far.
    matched: usize,
    done: bool,
}

impl<'g, S: IncidenceSource + 'g> Pipeline<'g, S> {
    pub(crate) fn new(source: &'g S, vertex: VertexId, spec: QuerySpec) -> Self {
        debug!(
            vertex = %vertex,
            direction = %spec.direction,
            labels = spec.labels.len(),
            filters = spec.filters.len(),
            limit = ?spec.limit,
            "incidence query"
        );
        Self {
            source,
            vertex,
            sides: spec.direction.sides().iter(),
            spec,
            current: None,
            matched: 0,
            done: false,
        }
    }

    /// Produce the next accepted edge along with the side it was found on.
    pub(crate) fn advance(&mut self) -> Option<GraphResult<(Direction, S::Edge)>> {
        if self.done {
            return None;
        }
        if self.spec.is_at_limit(self.matched) {
            debug!(vertex = %self.vertex, matched = self.matched, "query limit reached");
            return self.finish(None);
        }

        loop {
            let Some((side, scan)) = self.current.as_mut() else {
                if let Err(err) = self.open_next_side()? {
                    return self.finish(Some(Err(err)));
                }
                continue;
            };
            let side = *side;

            match scan.next() {
                None => self.current = None,
                Some(Err(err)) => return self.finish(Some(Err(GraphError::storage(err)))),
                Some(Ok(edge)) => {
                    if self.spec.accepts(&edge) {
                        self.matched += 1;
                        return Some(Ok((side, edge)));
                    }
                    trace!(
                        vertex = %self.vertex,
                        direction = %side,
                        label = edge.label(),
                        "edge rejected"
                    );
                }
            }
        }
    }

    /// Open the scan for the next side. Returns `None` when every side has
    /// been scanned.
    fn open_next_side(&mut self) -> Option<GraphResult<()>> {
        let Some(&side) = self.sides.next() else {
            self.done = true;
            return None;
        };
        debug!(vertex = %self.vertex, direction = %side, "opening incidence scan");

        let source = self.source;
        let Some(opened) = source.scan(self.vertex, side) else {
            // `sides()` never yields `Both`; nothing to open for it.
            return Some(Ok(()));
        };
        Some(match opened {
            Ok(scan) => {
                self.current = Some((side, scan));
                Ok(())
            }
            Err(err) => Err(GraphError::storage(err)),
        })
    }

    fn finish<T>(&mut self, last: Option<T>) -> Option<T> {
        self.done = true;
        self.current = None;
        last
    }
}

/// Lazy stream of the edges matched by a query.
///
/// Yields `Err` at most once, for the first storage failure, and then ends.
pub struct QueryEdges<'g, S: IncidenceSource + 'g> {
    pipeline: Pipeline<'g, S>,
}

impl<'g, S: IncidenceSource + 'g> QueryEdges<'g, S> {
    pub(crate) const fn new(pipeline: Pipeline<'g, S>) -> Self {
        Self { pipeline }
    }

    /// Drain the stream into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn collect_all(self) -> GraphResult<Vec<S::Edge>> {
        self.collect()
    }
}

impl<'g, S: IncidenceSource + 'g> Iterator for QueryEdges<'g, S> {
    type Item = GraphResult<S::Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pipeline.advance().map(|matched| matched.map(|(_, edge)| edge))
    }
}

impl<'g, S: IncidenceSource + 'g> FusedIterator for QueryEdges<'g, S> {}

/// Lazy stream of the far endpoints of the edges matched by a query.
///
/// For an edge found on the outgoing side this is its head, for one found
/// on the incoming side its tail. A self-loop therefore yields the anchor
/// vertex itself.
pub struct QueryVertices<'g, S: IncidenceSource + 'g> {
    pipeline: Pipeline<'g, S>,
}

impl<'g, S: IncidenceSource + 'g> QueryVertices<'g, S> {
    pub(crate) const fn new(pipeline: Pipeline<'g, S>) -> Self {
        Self { pipeline }
    }

    /// Drain the stream into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn collect_all(self) -> GraphResult<Vec<VertexId>> {
        self.collect()
    }
}

impl<'g, S: IncidenceSource + 'g> Iterator for QueryVertices<'g, S> {
    type Item = GraphResult<VertexId>;

    fn next(&mut self) -> Option<Self::Item> {
        let vertex = self.pipeline.vertex;
        self.pipeline
            .advance()
            .map(|matched| matched.map(|(side, edge)| edge.opposite(vertex, side)))
    }
}

impl<'g, S: IncidenceSource + 'g> FusedIterator for QueryVertices<'g, S> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::fmt;

    use propgraph_core::{Edge, EdgeId};

    use super::*;
    use crate::query::{Compare, QueryExt};

    #[derive(Debug)]
    struct Broken;

    impl fmt::Display for Broken {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("broken scan")
        }
    }

    impl std::error::Error for Broken {}

    /// An incidence source over fixed edge lists that counts every call into
    /// it and can fail at a chosen position of the out-scan.
    #[derive(Default)]
    struct Recording {
        edges: Vec<Edge>,
        fail_out_at: Option<usize>,
        opened: Cell<usize>,
        pulled: Cell<usize>,
    }

    struct RecordingScan<'a> {
        owner: &'a Recording,
        items: Vec<Result<Edge, Broken>>,
        pos: usize,
    }

    impl Iterator for RecordingScan<'_> {
        type Item = Result<Edge, Broken>;

        fn next(&mut self) -> Option<Self::Item> {
            self.owner.pulled.set(self.owner.pulled.get() + 1);
            let item = match self.items.get(self.pos)? {
                Ok(edge) => Ok(edge.clone()),
                Err(_) => Err(Broken),
            };
            self.pos += 1;
            Some(item)
        }
    }

    impl Recording {
        fn with_edges(edges: Vec<Edge>) -> Self {
            Self { edges, ..Self::default() }
        }

        fn open_scan(
            &self,
            pick: impl Fn(&Edge) -> bool,
            fail_at: Option<usize>,
        ) -> RecordingScan<'_> {
            self.opened.set(self.opened.get() + 1);
            let mut items: Vec<_> =
                self.edges.iter().filter(|&e| pick(e)).cloned().map(Ok).collect();
            if let Some(at) = fail_at {
                items.insert(at.min(items.len()), Err(Broken));
            }
            RecordingScan { owner: self, items, pos: 0 }
        }

        fn calls(&self) -> usize {
            self.opened.get() + self.pulled.get()
        }
    }

    impl IncidenceSource for Recording {
        type Edge = Edge;
        type Error = Broken;
        type Scan<'a> = RecordingScan<'a>;

        fn outgoing(&self, vertex: VertexId) -> Result<Self::Scan<'_>, Self::Error> {
            Ok(self.open_scan(|e| e.tail == vertex, self.fail_out_at))
        }

        fn incoming(&self, vertex: VertexId) -> Result<Self::Scan<'_>, Self::Error> {
            Ok(self.open_scan(|e| e.head == vertex, None))
        }
    }

    fn v(id: u64) -> VertexId {
        VertexId::new(id)
    }

    fn star() -> Vec<Edge> {
        vec![
            Edge::new(EdgeId::new(1), v(1), v(2), "friend").with_property("amount", 1.0),
            Edge::new(EdgeId::new(2), v(1), v(3), "friend").with_property("amount", 0.5),
            Edge::new(EdgeId::new(3), v(4), v(1), "hate").with_property("amount", 1.0),
            Edge::new(EdgeId::new(4), v(1), v(1), "self"),
        ]
    }

    #[test]
    fn out_side_is_scanned_before_in_side() {
        let graph = Recording::with_edges(star());
        let ids: Vec<_> = graph.query(v(1)).edges().map(|e| e.unwrap().id.as_u64()).collect();
        assert_eq!(ids, vec![1, 2, 4, 3, 4]);
    }

    #[test]
    fn vertices_project_far_endpoint() {
        let graph = Recording::with_edges(star());
        let out = graph.query(v(1)).direction(Direction::Out).vertices().collect_all().unwrap();
        assert_eq!(out, vec![v(2), v(3), v(1)]);
        let inc = graph.query(v(1)).direction(Direction::In).vertices().collect_all().unwrap();
        assert_eq!(inc, vec![v(4), v(1)]);
    }

    #[test]
    fn both_projects_by_the_side_each_edge_was_found_on() {
        let graph = Recording::with_edges(star());
        let all = graph.query(v(1)).vertices().collect_all().unwrap();
        assert_eq!(all, vec![v(2), v(3), v(1), v(4), v(1)]);
        assert_eq!(graph.opened.get(), 2);
    }

    #[test]
    fn limit_zero_never_touches_storage() {
        let graph = Recording::with_edges(star());
        assert_eq!(graph.query(v(1)).limit(0).count().unwrap(), 0);
        assert!(graph.query(v(1)).limit(0).edges().next().is_none());
        assert_eq!(graph.calls(), 0);
    }

    #[test]
    fn limit_stops_storage_access() {
        let graph = Recording::with_edges(star());
        let mut edges = graph.query(v(1)).limit(1).edges();
        assert!(edges.next().is_some());
        let after_first = graph.calls();
        assert!(edges.next().is_none());
        assert!(edges.next().is_none());
        assert_eq!(graph.calls(), after_first);
        assert_eq!(graph.opened.get(), 1);
    }

    #[test]
    fn count_short_circuits_at_limit() {
        let graph = Recording::with_edges(star());
        assert_eq!(graph.query(v(1)).limit(2).count().unwrap(), 2);
        assert_eq!(graph.opened.get(), 1);
        assert_eq!(graph.pulled.get(), 2);
    }

    #[test]
    fn rejected_edges_do_not_count_toward_limit() {
        let graph = Recording::with_edges(star());
        let ids: Vec<_> = graph
            .query(v(1))
            .has_compare("amount", Compare::GreaterThanEqual, 1.0)
            .limit(2)
            .edges()
            .map(|e| e.unwrap().id.as_u64())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn error_is_yielded_in_position_then_fused() {
        let graph = Recording { fail_out_at: Some(1), ..Recording::with_edges(star()) };
        let mut edges = graph.query(v(1)).edges();
        assert_eq!(edges.next().unwrap().unwrap().id, EdgeId::new(1));
        let err = edges.next().unwrap().unwrap_err();
        assert!(err.downcast_storage::<Broken>().is_some());
        let calls = graph.calls();
        assert!(edges.next().is_none());
        assert_eq!(graph.calls(), calls);
        assert_eq!(graph.opened.get(), 1);
    }

    #[test]
    fn count_propagates_storage_error() {
        let graph = Recording { fail_out_at: Some(0), ..Recording::with_edges(star()) };
        assert!(graph.query(v(1)).count().is_err());
        assert!(graph.query(v(1)).direction(Direction::In).count().is_ok());
    }
}
