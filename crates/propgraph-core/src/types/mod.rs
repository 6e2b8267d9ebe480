//! Core data types for propgraph.
//!
//! This module defines the vertices, edges and typed property values that
//! storage adapters hold and the query engine reads.

mod edge;
mod id;
mod properties;
mod value;
mod vertex;

pub use edge::{Edge, Label};
pub use id::{EdgeId, VertexId};
pub use properties::Properties;
pub use value::{Value, ValueKind};
pub use vertex::Vertex;
