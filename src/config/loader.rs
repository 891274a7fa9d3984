//! Configuration loading from disk.
//!
//! An environment may override the base file with `<dir>/<environment>/<file>`.
//! Top-level keys in the overlay replace the base ones, except `settings`,
//! which is merged key by key.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{Environment, RouterConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file, applying the
/// environment overlay when one exists.
pub fn load_config(path: &Path, environment: &Environment) -> Result<RouterConfig, ConfigError> {
    let mut document = read_table(path)?;

    let overlay = overlay_path(path, environment);
    if overlay.is_file() {
        tracing::debug!(overlay = %overlay.display(), "Applying environment overlay");
        merge_overlay(&mut document, read_table(&overlay)?);
    }

    parse_config(document)
}

/// Parse and validate configuration from TOML text.
pub fn load_config_str(content: &str) -> Result<RouterConfig, ConfigError> {
    let document: toml::Table = toml::from_str(content).map_err(ConfigError::Parse)?;
    parse_config(document)
}

/// Location of the overlay for `environment`.
pub fn overlay_path(path: &Path, environment: &Environment) -> PathBuf {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let file = path.file_name().unwrap_or_default();
    dir.join(environment.name()).join(file)
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

fn parse_config(document: toml::Table) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = toml::Value::Table(document)
        .try_into()
        .map_err(ConfigError::Parse)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn merge_overlay(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        let value = match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(current)), toml::Value::Table(changes)) if key == "settings" => {
                current.extend(changes);
                continue;
            }
            (_, value) => value,
        };
        base.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::definition::RawRoute;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("switchyard-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const BASE: &str = r#"
routes = [
    ["home", "Home::index"],
    ["item/(:num)", "get,post", "Item::show$1"],
]
request = [["(:any)", "*", "Auth"]]

[settings]
default_method = "main"
back_up_levels = "../../.."
"#;

    #[test]
    fn test_load_without_overlay() {
        let dir = scratch_dir("loader-base");
        let path = dir.join("routes.toml");
        fs::write(&path, BASE).unwrap();

        let config = load_config(&path, &Environment::default()).unwrap();
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.request.len(), 1);
        assert_eq!(config.settings.default_method, "main");
        assert!(config.settings.request_middleware);

        fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[test]
    fn test_environment_overlay() {
        let dir = scratch_dir("loader-overlay");
        let path = dir.join("routes.toml");
        fs::write(&path, BASE).unwrap();
        fs::create_dir_all(dir.join("testing")).unwrap();
        fs::write(
            dir.join("testing").join("routes.toml"),
            r#"
routes = [["home", "Test::home"]]

[settings]
response_middleware = false
"#,
        )
        .unwrap();

        let config = load_config(&path, &Environment::new("Testing")).unwrap();
        assert_eq!(config.routes, vec![RawRoute::pair("home", "Test::home")]);
        // untouched keys survive
        assert_eq!(config.request.len(), 1);
        assert_eq!(config.settings.default_method, "main");
        assert_eq!(config.settings.back_up_levels, "../../..");
        assert!(!config.settings.response_middleware);

        fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            load_config(Path::new("/nonexistent/routes.toml"), &Environment::default()),
            Err(ConfigError::Io(_))
        ));
        assert!(matches!(load_config_str("routes = ["), Err(ConfigError::Parse(_))));
        assert!(matches!(
            load_config_str(r#"routes = [["only"]]"#),
            Err(ConfigError::Validation(_))
        ));
    }
}
