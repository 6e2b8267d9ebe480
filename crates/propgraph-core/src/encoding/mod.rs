//! Record serialization and key encoding for storage adapters.
//!
//! # Encoding Traits
//!
//! - [`Encoder`] - Serialize records to bytes
//! - [`Decoder`] - Deserialize records from bytes
//!
//! Implementations are provided for [`Vertex`](crate::types::Vertex) and
//! [`Edge`](crate::types::Edge). A record is a one-byte format version
//! followed by the bincode body.
//!
//! # Key Encoding
//!
//! The [`keys`] module encodes ordered keys for key-value backends. Keys are
//! big-endian so that byte order matches numeric order, which turns "all
//! edges incident to vertex X" into a single range scan.
//!
//! # Example
//!
//! ```
//! use propgraph_core::encoding::{Decoder, Encoder};
//! use propgraph_core::types::{Edge, EdgeId, VertexId};
//!
//! let edge = Edge::new(EdgeId::new(1), VertexId::new(1), VertexId::new(2), "friend")
//!     .with_property("amount", 1.0);
//!
//! let bytes = edge.encode().unwrap();
//! assert_eq!(Edge::decode(&bytes).unwrap(), edge);
//! ```

pub mod keys;
mod record;
mod traits;


pub use traits::{Decoder, Encoder, FORMAT_VERSION};
