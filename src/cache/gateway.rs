//! Route cache gateway.
//!
//! # Responsibilities
//! - Decide between a fresh compile and the persisted artifact
//! - Publish freshly compiled tables through the store
//! - Fall back to an in-memory table when the store misbehaves
//!
//! # Rebuild triggers
//! ```text
//! environment == development  → compile + publish
//! artifact absent             → compile + publish
//! artifact unreadable/corrupt → compile + publish (warned)
//! otherwise                   → persisted table, verbatim
//! ```

use tracing::{info, warn};

use crate::cache::{CacheError, CacheStore};
use crate::config::{Environment, RouterConfig};
use crate::error::RouterResult;
use crate::observability::metrics;
use crate::routing::compiler::compile_config;
use crate::routing::table::CompiledTable;

/// Store key of the compiled table artifact.
pub const DEFAULT_ARTIFACT_KEY: &str = "routes";

/// Loads or compiles the routing table through a `CacheStore`.
#[derive(Debug)]
pub struct RouteCacheGateway<S> {
    store: S,
    key: String,
}

impl<S: CacheStore> RouteCacheGateway<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: DEFAULT_ARTIFACT_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Return the table to route with.
    ///
    /// Compilation errors are returned. Store failures are logged and never
    /// fail the call.
    pub fn load_or_compile(
        &self,
        config: &RouterConfig,
        environment: &Environment,
    ) -> RouterResult<CompiledTable> {
        if environment.is_development() {
            info!(environment = %environment.name(), "Development environment, rebuilding routes");
            metrics::record_cache("rebuild");
            return self.compile_and_publish(config);
        }

        match self.load() {
            Ok(Some(table)) => {
                info!(key = %self.key, routes = table.routes().len(), "Route cache hit");
                metrics::record_cache("hit");
                Ok(table)
            }
            Ok(None) => {
                info!(key = %self.key, "Route cache miss, compiling");
                metrics::record_cache("miss");
                self.compile_and_publish(config)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Route cache unreadable, compiling");
                metrics::record_cache("unreadable");
                self.compile_and_publish(config)
            }
        }
    }

    /// Compile and publish unconditionally. Publish errors are returned.
    pub fn rebuild(&self, config: &RouterConfig) -> RouterResult<CompiledTable> {
        let table = compile_config(config)?;
        self.publish(&table)?;
        metrics::record_cache("publish");
        Ok(table)
    }

    /// Read the persisted table, `None` when no artifact exists.
    pub fn load(&self) -> Result<Option<CompiledTable>, CacheError> {
        let Some(bytes) = self.store.load(&self.key)? else {
            return Ok(None);
        };
        let table = serde_json::from_slice(&bytes).map_err(CacheError::Decode)?;
        Ok(Some(table))
    }

    /// Persist a table under this gateway's key.
    pub fn publish(&self, table: &CompiledTable) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(table).map_err(CacheError::Encode)?;
        self.store.publish(&self.key, &bytes)
    }

    fn compile_and_publish(&self, config: &RouterConfig) -> RouterResult<CompiledTable> {
        let table = compile_config(config)?;
        match self.publish(&table) {
            Ok(()) => metrics::record_cache("publish"),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Route cache publish failed, using in-memory table");
                metrics::record_cache("publish_failed");
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStore, NullStore};
    use crate::routing::definition::RawRoute;

    fn config(handler: &str) -> RouterConfig {
        RouterConfig {
            routes: vec![RawRoute(vec!["home".into(), handler.into()])],
            ..RouterConfig::default()
        }
    }

    fn home_handler(table: &CompiledTable) -> String {
        table.routes().routes_for("get")[0]
            .target()
            .as_handler()
            .unwrap_or_default()
            .to_string()
    }

    struct BrokenStore;

    impl CacheStore for BrokenStore {
        fn load(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Io(std::io::Error::other("disk gone")))
        }

        fn publish(&self, _key: &str, _value: &[u8]) -> Result<(), CacheError> {
            Err(CacheError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[test]
    fn test_miss_compiles_and_publishes() {
        let gateway = RouteCacheGateway::new(MemoryStore::new());
        let table = gateway
            .load_or_compile(&config("Home::index"), &Environment::default())
            .unwrap();

        assert_eq!(home_handler(&table), "Home::index");
        assert_eq!(gateway.load().unwrap(), Some(table));
    }

    #[test]
    fn test_present_artifact_is_returned_verbatim() {
        let gateway = RouteCacheGateway::new(MemoryStore::new());
        let production = Environment::default();
        let first = gateway.load_or_compile(&config("Home::index"), &production).unwrap();
        let second = gateway.load_or_compile(&config("Start::index"), &production).unwrap();

        assert_eq!(first, second);
        assert_eq!(home_handler(&second), "Home::index");
    }

    #[test]
    fn test_development_always_rebuilds() {
        let gateway = RouteCacheGateway::new(MemoryStore::new());
        let dev = Environment::development();
        let first = gateway.load_or_compile(&config("Home::index"), &dev).unwrap();
        let second = gateway.load_or_compile(&config("Start::index"), &dev).unwrap();

        assert_ne!(first, second);
        assert_eq!(home_handler(&gateway.load().unwrap().unwrap()), "Start::index");
    }

    #[test]
    fn test_corrupt_artifact_is_rebuilt() {
        let store = MemoryStore::new();
        store.publish(DEFAULT_ARTIFACT_KEY, b"{not json").unwrap();
        let gateway = RouteCacheGateway::new(store);

        assert!(matches!(gateway.load(), Err(CacheError::Decode(_))));
        let table = gateway
            .load_or_compile(&config("Home::index"), &Environment::default())
            .unwrap();
        assert_eq!(home_handler(&table), "Home::index");
        assert!(gateway.load().unwrap().is_some());
    }

    #[test]
    fn test_store_failure_keeps_in_memory_table() {
        let gateway = RouteCacheGateway::new(BrokenStore);
        let table = gateway
            .load_or_compile(&config("Home::index"), &Environment::default())
            .unwrap();
        assert_eq!(home_handler(&table), "Home::index");

        assert!(gateway.rebuild(&config("Home::index")).is_err());
    }

    #[test]
    fn test_null_store_compiles_every_time() {
        let gateway = RouteCacheGateway::new(NullStore);
        let production = Environment::default();
        let first = gateway.load_or_compile(&config("Home::index"), &production).unwrap();
        let second = gateway.load_or_compile(&config("Start::index"), &production).unwrap();
        assert_ne!(first, second);
    }
}
