//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config, overlay_path};
use crate::config::schema::Environment;
use crate::routing::compiler::compile_config;
use crate::routing::table::CompiledTable;

/// A watcher that recompiles the route table when its file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    environment: Environment,
    update_tx: mpsc::UnboundedSender<CompiledTable>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for freshly compiled tables.
    pub fn new(
        path: &Path,
        environment: Environment,
    ) -> (Self, mpsc::UnboundedReceiver<CompiledTable>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                environment,
                update_tx,
            },
            update_rx,
        )
    }

    /// Load and compile the current file contents.
    fn reload(path: &Path, environment: &Environment) -> Result<CompiledTable, String> {
        let config = load_config(path, environment).map_err(|e| e.to_string())?;
        compile_config(&config).map_err(|e| e.to_string())
    }

    /// Start watching the file (and its environment overlay, if present) in a
    /// background thread. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();
        let environment = self.environment.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Route file change detected, recompiling...");
                        match Self::reload(&path, &environment) {
                            Ok(table) => {
                                let _ = tx.send(table);
                            }
                            Err(e) => {
                                tracing::error!(
                                    "Failed to reload routes: {}. Keeping current table.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        let overlay = overlay_path(&self.path, &self.environment);
        if overlay.is_file() {
            watcher.watch(&overlay, RecursiveMode::NonRecursive)?;
        }

        tracing::info!(path = ?self.path, environment = %self.environment.name(), "Route watcher started");
        Ok(watcher)
    }
}
