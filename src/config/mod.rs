//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! routes.toml
//!     → loader.rs (parse, overlay <dir>/<environment>/routes.toml)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → routing::compiler (CompiledTable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → compiler builds a new table
//!     → table sent to the owner, which swaps it into the Router
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_config_str, ConfigError};
pub use schema::Environment;
pub use schema::RouterConfig;
pub use schema::RouterSettings;
