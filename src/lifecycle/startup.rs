//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Pick the cache store
//! - Load or compile the route table
//! - Build the router with its middleware registries
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - No cache directory means nothing is persisted

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cache::{CacheStore, FileStore, NullStore, RouteCacheGateway};
use crate::config::{load_config, ConfigError, Environment};
use crate::error::RouterError;
use crate::middleware::MiddlewareSet;
use crate::routing::Router;

/// Everything needed to bring a router up.
#[derive(Debug, Default)]
pub struct StartupOptions {
    pub config_path: PathBuf,
    pub environment: Environment,
    /// Directory for the compiled-table artifact.
    pub cache_dir: Option<PathBuf>,
    pub middleware: MiddlewareSet,
    /// Disable both middleware phases. For tools that only inspect tables
    /// and have no middleware to register.
    pub skip_middleware: bool,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Router(#[from] RouterError),
}

/// Store backing the route cache.
pub fn cache_store(cache_dir: Option<&Path>) -> Box<dyn CacheStore> {
    match cache_dir {
        Some(dir) => Box::new(FileStore::new(dir)),
        None => Box::new(NullStore),
    }
}

/// Load config, obtain a table through the cache gateway and build the router.
pub fn build_router(options: StartupOptions) -> Result<Router, StartupError> {
    let config = load_config(&options.config_path, &options.environment)?;

    tracing::info!(
        config = %options.config_path.display(),
        environment = %options.environment.name(),
        cache_dir = ?options.cache_dir,
        "Configuration loaded"
    );

    let gateway = RouteCacheGateway::new(cache_store(options.cache_dir.as_deref()));
    let table = gateway.load_or_compile(&config, &options.environment)?;

    let mut settings = config.settings;
    if options.skip_middleware {
        settings.request_middleware = false;
        settings.response_middleware = false;
    }

    Ok(Router::new(settings, table, options.middleware)?)
}
