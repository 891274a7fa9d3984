//! In-process cache stores.

use std::sync::Arc;

use dashmap::DashMap;

use crate::cache::{CacheError, CacheStore};

/// Keeps artifacts in memory. Clones share the same entries, so one store
/// can back several routers in a process or serve as a test double.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn publish(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Persists nothing; every startup compiles.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl CacheStore for NullStore {
    fn load(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn publish(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
        Ok(())
    }
}
