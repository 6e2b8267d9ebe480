//! Query specification and the fluent vertex-centric builder.

use std::collections::HashSet;

use propgraph_core::{Direction, EdgeView, IncidenceSource, Label, Value, VertexId};

use super::executor::{Pipeline, QueryEdges, QueryVertices};
use super::{Compare, Filter, Interval, Predicate};
use crate::error::GraphResult;

/// The accumulated constraints of an incidence query.
///
/// A freshly created spec scans both directions, accepts every label, has no
/// property filters and no limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    /// Which side(s) of the vertex to scan.
    pub direction: Direction,
    /// Accepted labels. Empty accepts every label.
    pub labels: HashSet<Label>,
    /// Property filters, evaluated in insertion order.
    pub filters: Vec<Filter>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl QuerySpec {
    /// Create a new unconstrained spec.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scan direction, replacing any previous direction.
    #[must_use]
    pub const fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Add an accepted label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<Label>) -> Self {
        self.labels.insert(label.into());
        self
    }

    /// Add several accepted labels.
    #[must_use]
    pub fn with_labels<L: Into<Label>>(mut self, labels: impl IntoIterator<Item = L>) -> Self {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Append a property filter.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Set the result limit, replacing any previous limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check if an edge label is accepted.
    #[inline]
    #[must_use]
    pub fn accepts_label(&self, label: &str) -> bool {
        self.labels.is_empty() || self.labels.contains(label)
    }

    /// Check an edge against the label set and then every filter in order.
    ///
    /// Stops at the first failing check.
    #[must_use]
    pub fn accepts(&self, edge: &impl EdgeView) -> bool {
        if !self.accepts_label(edge.label()) {
            return false;
        }
        let properties = edge.properties();
        self.filters.iter().all(|filter| filter.evaluate(properties))
    }

    /// Check if `count` results already satisfy the limit.
    #[inline]
    #[must_use]
    pub fn is_at_limit(&self, count: usize) -> bool {
        self.limit.is_some_and(|limit| count >= limit)
    }
}

/// A query over the edges incident to one vertex.
///
/// Built with chained calls and consumed by one of the terminal operations
/// [`edges`](Self::edges), [`vertices`](Self::vertices) or
/// [`count`](Self::count). Nothing touches storage until a terminal
/// operation is driven.
///
/// # Example
///
/// ```ignore
/// use propgraph_core::Direction;
/// use propgraph_graph::query::{Compare, QueryExt};
///
/// let friends = graph
///     .query(a)
///     .direction(Direction::Out)
///     .label("friend")
///     .has_compare("amount", Compare::GreaterThanEqual, 1.0)
///     .interval("date", 5i64, 11i64)
///     .limit(10)
///     .vertices()
///     .collect_all()?;
/// ```
pub struct VertexQuery<'g, S: IncidenceSource> {
    source: &'g S,
    vertex: VertexId,
    spec: QuerySpec,
}

impl<'g, S: IncidenceSource> VertexQuery<'g, S> {
    /// Create an unconstrained query anchored at `vertex`.
    #[must_use]
    pub fn new(source: &'g S, vertex: VertexId) -> Self {
        Self::with_spec(source, vertex, QuerySpec::new())
    }

    /// Create a query from a prepared spec.
    #[must_use]
    pub const fn with_spec(source: &'g S, vertex: VertexId, spec: QuerySpec) -> Self {
        Self { source, vertex, spec }
    }

    /// Set the scan direction. The last call wins.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.spec.direction = direction;
        self
    }

    /// Add accepted labels. Calls accumulate.
    #[must_use]
    pub fn labels<L: Into<Label>>(mut self, labels: impl IntoIterator<Item = L>) -> Self {
        self.spec = self.spec.with_labels(labels);
        self
    }

    /// Add one accepted label.
    #[must_use]
    pub fn label(mut self, label: impl Into<Label>) -> Self {
        self.spec = self.spec.with_label(label);
        self
    }

    /// Require `key` to equal `value`.
    #[must_use]
    pub fn has(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.has_compare(key, Compare::Equal, value)
    }

    /// Require `key` to satisfy `compare` against `value`.
    #[must_use]
    pub fn has_compare(
        mut self,
        key: impl Into<String>,
        compare: Compare,
        value: impl Into<Value>,
    ) -> Self {
        self.spec.filters.push(Filter::Has(Predicate::new(key, compare, value)));
        self
    }

    /// Require `lower <= key < upper`.
    #[must_use]
    pub fn interval(
        mut self,
        key: impl Into<String>,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Self {
        self.spec.filters.push(Filter::Interval(Interval::new(key, lower, upper)));
        self
    }

    /// Cap the number of results. The last call wins.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.spec.limit = Some(limit);
        self
    }

    /// The anchor vertex.
    #[must_use]
    pub const fn vertex(&self) -> VertexId {
        self.vertex
    }

    /// The constraints accumulated so far.
    #[must_use]
    pub const fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// Stream the matching edges.
    #[must_use]
    pub fn edges(self) -> QueryEdges<'g, S> {
        QueryEdges::new(self.into_pipeline())
    }

    /// Stream the far endpoint of each matching edge.
    ///
    /// Endpoints are not deduplicated.
    #[must_use]
    pub fn vertices(self) -> QueryVertices<'g, S> {
        QueryVertices::new(self.into_pipeline())
    }

    /// Count the matching edges, stopping at the limit.
    ///
    /// # Errors
    ///
    /// Returns the first storage error raised before the count completes.
    pub fn count(self) -> GraphResult<usize> {
        let mut pipeline = self.into_pipeline();
        let mut count = 0;
        while let Some(matched) = pipeline.advance() {
            matched?;
            count += 1;
        }
        Ok(count)
    }

    fn into_pipeline(self) -> Pipeline<'g, S> {
        Pipeline::new(self.source, self.vertex, self.spec)
    }
}

/// Adds [`query`](QueryExt::query) to every incidence source.
pub trait QueryExt: IncidenceSource + Sized {
    /// Start a query anchored at `vertex`.
    fn query(&self, vertex: VertexId) -> VertexQuery<'_, Self> {
        VertexQuery::new(self, vertex)
    }
}

impl<S: IncidenceSource> QueryExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use propgraph_core::{Edge, EdgeId};

    fn friend() -> Edge {
        Edge::new(EdgeId::new(1), VertexId::new(1), VertexId::new(2), "friend")
            .with_property("amount", 1.0)
            .with_property("date", 10i64)
    }

    #[test]
    fn empty_spec_accepts_everything() {
        let spec = QuerySpec::new();
        assert_eq!(spec.direction, Direction::Both);
        assert!(spec.accepts(&friend()));
        assert!(!spec.is_at_limit(usize::MAX));
    }

    #[test]
    fn labels_accumulate() {
        let spec = QuerySpec::new().with_label("hate").with_labels(["like", "hate"]);
        assert_eq!(spec.labels.len(), 2);
        assert!(!spec.accepts(&friend()));
        assert!(spec.clone().with_label("friend").accepts(&friend()));
    }

    #[test]
    fn filters_are_conjunctive() {
        let spec = QuerySpec::new()
            .with_filter(Predicate::new("amount", Compare::GreaterThanEqual, 1.0))
            .with_filter(Interval::new("date", 5i64, 11i64));
        assert!(spec.accepts(&friend()));

        let spec = spec.with_filter(Interval::new("date", 5i64, 10i64));
        assert!(!spec.accepts(&friend()));
    }

    #[test]
    fn limit_zero_is_immediately_reached() {
        let spec = QuerySpec::new().with_limit(3).with_limit(0);
        assert_eq!(spec.limit, Some(0));
        assert!(spec.is_at_limit(0));
    }
}
