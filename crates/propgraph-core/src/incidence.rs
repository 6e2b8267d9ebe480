//! The incidence-scan contract between storage adapters and the query engine.
//!
//! A storage adapter owns vertices and edges; the query engine only ever
//! reads a single vertex's incident edges, one direction at a time, through
//! [`IncidenceSource`]. Each scanned edge is read through [`EdgeView`].
//!
//! # Direction
//!
//! - [`Direction::Out`] - edges whose tail is the vertex
//! - [`Direction::In`] - edges whose head is the vertex
//! - [`Direction::Both`] - the out-scan followed by the in-scan; a self-loop
//!   is therefore seen twice, once per direction

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::types::{Edge, Properties, VertexId};
use crate::CoreError;

/// Direction of an incidence scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Follow outgoing edges (tail is the scanned vertex).
    Out,

    /// Follow incoming edges (head is the scanned vertex).
    In,

    /// Follow outgoing, then incoming edges.
    #[default]
    Both,
}

impl Direction {
    /// Returns true if this direction includes outgoing edges.
    #[inline]
    #[must_use]
    pub const fn includes_out(self) -> bool {
        matches!(self, Self::Out | Self::Both)
    }

    /// Returns true if this direction includes incoming edges.
    #[inline]
    #[must_use]
    pub const fn includes_in(self) -> bool {
        matches!(self, Self::In | Self::Both)
    }

    /// Returns the reverse direction. `Both` is its own opposite.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Out => Self::In,
            Self::In => Self::Out,
            Self::Both => Self::Both,
        }
    }

    /// The single-sided scans this direction expands to, in scan order.
    #[inline]
    #[must_use]
    pub const fn sides(self) -> &'static [Direction] {
        match self {
            Self::Out => &[Self::Out],
            Self::In => &[Self::In],
            Self::Both => &[Self::Out, Self::In],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Out => "OUT",
            Self::In => "IN",
            Self::Both => "BOTH",
        })
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OUT" | "OUTGOING" => Ok(Self::Out),
            "IN" | "INCOMING" => Ok(Self::In),
            "BOTH" => Ok(Self::Both),
            _ => Err(CoreError::Validation(format!("unknown direction: {s}"))),
        }
    }
}

/// Read access to an edge produced by an incidence scan.
pub trait EdgeView {
    /// The edge's label.
    fn label(&self) -> &str;

    /// The edge's property bag.
    fn properties(&self) -> &Properties;

    /// The vertex the edge leaves.
    fn tail(&self) -> VertexId;

    /// The vertex the edge enters.
    fn head(&self) -> VertexId;

    /// The endpoint across the edge from `vertex`, given the direction the
    /// edge was scanned in.
    ///
    /// An edge found on the outgoing side leads to its head and one found on
    /// the incoming side leads to its tail, so a self-loop yields `vertex`
    /// on either side. With [`Direction::Both`] the side is unknown and the
    /// endpoint is picked by comparing against `vertex`.
    #[inline]
    fn opposite(&self, vertex: VertexId, scanned: Direction) -> VertexId {
        match scanned {
            Direction::Out => self.head(),
            Direction::In => self.tail(),
            Direction::Both if self.tail() == vertex => self.head(),
            Direction::Both => self.tail(),
        }
    }
}

impl EdgeView for Edge {
    #[inline]
    fn label(&self) -> &str {
        self.label.as_str()
    }

    #[inline]
    fn properties(&self) -> &Properties {
        &self.properties
    }

    #[inline]
    fn tail(&self) -> VertexId {
        self.tail
    }

    #[inline]
    fn head(&self) -> VertexId {
        self.head
    }
}

impl<E: EdgeView + ?Sized> EdgeView for &E {
    fn label(&self) -> &str {
        (**self).label()
    }

    fn properties(&self) -> &Properties {
        (**self).properties()
    }

    fn tail(&self) -> VertexId {
        (**self).tail()
    }

    fn head(&self) -> VertexId {
        (**self).head()
    }
}

impl<E: EdgeView + ?Sized> EdgeView for Arc<E> {
    fn label(&self) -> &str {
        (**self).label()
    }

    fn properties(&self) -> &Properties {
        (**self).properties()
    }

    fn tail(&self) -> VertexId {
        (**self).tail()
    }

    fn head(&self) -> VertexId {
        (**self).head()
    }
}

/// A storage engine's per-vertex incidence scan.
///
/// Implementations expose one scan per direction. Obtaining a scan may fail
/// (unknown vertex, I/O), and so may every step of the scan. Scan order is
/// defined by the implementation; the query engine preserves it.
///
/// The engine assumes the incidence set of the scanned vertex is not
/// structurally mutated while a scan is alive.
///
/// # Example
///
/// ```ignore
/// fn out_degree<S: IncidenceSource>(source: &S, v: VertexId) -> Result<usize, S::Error> {
///     let mut n = 0;
///     for edge in source.outgoing(v)? {
///         edge?;
///         n += 1;
///     }
///     Ok(n)
/// }
/// ```
pub trait IncidenceSource {
    /// The edge handle yielded by scans.
    type Edge: EdgeView;

    /// The error raised by the storage engine.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The lazy scan over one direction of a vertex's incidence.
    type Scan<'a>: Iterator<Item = Result<Self::Edge, Self::Error>>
    where
        Self: 'a;

    /// Scan the edges whose tail is `vertex`.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the vertex does not exist or the scan
    /// cannot be opened.
    fn outgoing(&self, vertex: VertexId) -> Result<Self::Scan<'_>, Self::Error>;

    /// Scan the edges whose head is `vertex`.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if the vertex does not exist or the scan
    /// cannot be opened.
    fn incoming(&self, vertex: VertexId) -> Result<Self::Scan<'_>, Self::Error>;

    /// Scan one side of `vertex`'s incidence.
    ///
    /// Returns `None` for [`Direction::Both`], which spans two scans; expand
    /// it with [`Direction::sides`] first.
    ///
    /// # Errors
    ///
    /// The inner result carries the engine's error if the vertex does not
    /// exist or the scan cannot be opened.
    fn scan(
        &self,
        vertex: VertexId,
        direction: Direction,
    ) -> Option<Result<Self::Scan<'_>, Self::Error>> {
        match direction {
            Direction::Out => Some(self.outgoing(vertex)),
            Direction::In => Some(self.incoming(vertex)),
            Direction::Both => None,
        }
    }
}
