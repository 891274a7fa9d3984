//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.
//!
//! Route lists are kept in their raw tuple form here; arity and pattern
//! checks belong to validation and compilation.

use serde::{Deserialize, Serialize};

use crate::routing::definition::{RawRoute, TextOrList};

/// Root configuration for the router.
///
/// TOML note: the route arrays are top-level keys, so they must appear before
/// the `[settings]` table in a file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Primary routes: `[pattern, target]` or `[pattern, methods, target]`.
    pub routes: Vec<RawRoute>,

    /// Before-dispatch middleware routes.
    pub request: Vec<RawRoute>,

    /// After-dispatch middleware routes.
    pub response: Vec<RawRoute>,

    /// Compiler and pipeline settings.
    pub settings: RouterSettings,
}

/// Compiler and pipeline settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RouterSettings {
    /// Methods a `*` route expands to (comma-separated string or list).
    pub all_methods: TextOrList,

    /// Method appended to route targets that lack `::method`.
    pub default_method: String,

    /// Prefix for handler directories that start at the project root.
    pub back_up_levels: String,

    /// Run the before-dispatch middleware phase.
    pub request_middleware: bool,

    /// Run the after-dispatch middleware phase.
    pub response_middleware: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            all_methods: TextOrList::Text("get,post,cli,put,delete".to_string()),
            default_method: "index".to_string(),
            back_up_levels: "../..".to_string(),
            request_middleware: true,
            response_middleware: true,
        }
    }
}

impl RouterSettings {
    /// The `*` expansion set, lowercased, in configured order, without duplicates.
    pub fn all_methods(&self) -> Vec<String> {
        self.all_methods.tokens()
    }
}

/// Deployment environment name. `development` forces route rebuilds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment(String);

impl Environment {
    pub const DEVELOPMENT: &'static str = "development";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_ascii_lowercase())
    }

    pub fn development() -> Self {
        Self::new(Self::DEVELOPMENT)
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_development(&self) -> bool {
        self.0 == Self::DEVELOPMENT
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = RouterSettings::default();
        assert_eq!(settings.default_method, "index");
        assert_eq!(settings.back_up_levels, "../..");
        assert!(settings.request_middleware);
        assert!(settings.response_middleware);
        assert_eq!(
            settings.all_methods(),
            vec!["get", "post", "cli", "put", "delete"]
        );
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: RouterConfig = toml::from_str(
            r#"
            routes = [
                ["item/(:num)", "Item::show$1"],
                ["api/(:any)", "get,post", "Api"],
            ]
            request = [["admin/(:any)", "*", ["Auth::check", "Audit"]]]

            [settings]
            all_methods = ["get", "post"]
            "#,
        )
        .unwrap();

        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.request.len(), 1);
        assert!(config.response.is_empty());
        assert_eq!(config.settings.all_methods(), vec!["get", "post"]);
        assert_eq!(config.settings.default_method, "index");
    }

    #[test]
    fn test_environment() {
        assert!(Environment::new(" Development ").is_development());
        assert!(!Environment::default().is_development());
        assert_eq!(Environment::default().name(), "production");
    }
}
