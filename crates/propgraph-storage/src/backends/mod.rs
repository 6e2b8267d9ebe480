//! Storage backend implementations.
//!
//! Both backends implement [`IncidenceSource`](propgraph_core::IncidenceSource)
//! with [`StorageError`] as the scan error.
//!
//! # Available Backends
//!
//! - [`memory`] - Hash-map graph with insertion-ordered adjacency lists
//! - [`redb`] - Pure-Rust embedded database with ACID transactions

pub mod memory;
pub mod redb;

pub use self::memory::{MemoryGraph, MemoryScan};
pub use self::redb::{RedbConfig, RedbGraph, RedbScan, DEFAULT_SCAN_BATCH_SIZE};

use propgraph_core::Properties;

use crate::error::StorageError;

/// Property keys that name element identity and may not be stored in a bag.
pub const RESERVED_KEYS: [&str; 2] = ["id", "label"];

/// Reject empty and reserved property keys.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || RESERVED_KEYS.contains(&key) {
        return Err(StorageError::InvalidProperty(key.to_owned()));
    }
    Ok(())
}

/// Validate every key of a property bag.
pub(crate) fn validate_properties(properties: &Properties) -> Result<(), StorageError> {
    properties.keys().try_for_each(validate_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_and_empty_keys_are_rejected() {
        assert!(validate_key("amount").is_ok());
        assert!(matches!(validate_key(""), Err(StorageError::InvalidProperty(_))));
        assert!(matches!(validate_key("id"), Err(StorageError::InvalidProperty(_))));
        assert!(matches!(validate_key("label"), Err(StorageError::InvalidProperty(_))));
        assert!(validate_properties(&Properties::new().with("date", 10i64)).is_ok());
        let with_id = Properties::new().with("date", 10i64).with("id", 1i64);
        assert!(validate_properties(&with_id).is_err());
    }
}
