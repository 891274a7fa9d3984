//! Compiled-table persistence.
//!
//! # Data Flow
//! ```text
//! gateway.rs
//!     development env or artifact missing → compile → publish → table
//!     otherwise                           → load → decode → table
//!
//! CacheStore (contract)
//!     publish(key, bytes)  atomic: readers see old or new, never partial
//!     load(key)            Some(bytes) | None
//! ```
//!
//! # Design Decisions
//! - The router core only sees the `CacheStore` contract
//! - A failed publish never fails the caller; the in-memory table is used
//! - Corrupt artifacts are treated as absent and rebuilt

pub mod file;
pub mod gateway;
pub mod memory;

pub use file::FileStore;
pub use gateway::RouteCacheGateway;
pub use memory::{MemoryStore, NullStore};

use thiserror::Error;

/// Errors raised by cache stores and artifact encoding.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode route table: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode route table: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Key-value persistence for compiled tables.
pub trait CacheStore: Send + Sync {
    /// Fetch a value, `None` when absent.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store a value atomically.
    fn publish(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;
}

impl<S: CacheStore + ?Sized> CacheStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).load(key)
    }

    fn publish(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        (**self).publish(key, value)
    }
}

impl<S: CacheStore + ?Sized> CacheStore for std::sync::Arc<S> {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        (**self).load(key)
    }

    fn publish(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        (**self).publish(key, value)
    }
}
