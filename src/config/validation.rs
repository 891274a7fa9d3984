//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the `*` method set and the default method
//! - Check every route entry's shape, reporting list name and index
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::RouterConfig;
use crate::routing::definition::{MethodSpec, RawRoute, RouteDefinition, Target};

/// One problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `routes[3]`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let settings = &config.settings;

    let all_methods = settings.all_methods();
    if all_methods.is_empty() {
        errors.push(ValidationError::new("settings.all_methods", "must name at least one method"));
    }
    for method in &all_methods {
        if !is_identifier(method) {
            errors.push(ValidationError::new(
                "settings.all_methods",
                format!("`{}` is not a valid method name", method),
            ));
        }
    }

    if settings.default_method.trim().is_empty() {
        errors.push(ValidationError::new("settings.default_method", "must not be empty"));
    } else if !is_identifier(&settings.default_method) {
        errors.push(ValidationError::new(
            "settings.default_method",
            format!("`{}` is not a valid method name", settings.default_method),
        ));
    }

    check_routes("routes", &config.routes, &mut errors);
    check_routes("request", &config.request, &mut errors);
    check_routes("response", &config.response, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_routes(list: &str, routes: &[RawRoute], errors: &mut Vec<ValidationError>) {
    for (index, raw) in routes.iter().enumerate() {
        let field = format!("{}[{}]", list, index);
        match RouteDefinition::from_raw(list, index, raw) {
            Ok(def) => {
                if list == "routes" && matches!(def.target, Target::Chain(_)) {
                    errors.push(ValidationError::new(
                        field.clone(),
                        "a route must name a single handler, not a chain",
                    ));
                }
                if let MethodSpec::Only(methods) = &def.methods {
                    for method in methods.iter().filter(|m| !is_identifier(m)) {
                        errors.push(ValidationError::new(
                            field.clone(),
                            format!("`{}` is not a valid method name", method),
                        ));
                    }
                }
            }
            Err(e) => errors.push(ValidationError::new(field, e.to_string())),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::definition::TextOrList;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RouterConfig::default()), Ok(()));
    }

    #[test]
    fn test_reports_every_problem() {
        let mut config = RouterConfig::default();
        config.settings.all_methods = TextOrList::Text(" , ".into());
        config.settings.default_method = "".into();
        config.routes = vec![
            RawRoute::pair("ok", "Home::index"),
            RawRoute(vec!["only-pattern".into()]),
        ];
        config.request = vec![RawRoute::pair("(:any)", TextOrList::List(vec!["A".into(), "B".into()]))];
        config.response = vec![RawRoute::triple("x", "get,p st", "Log")];

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["settings.all_methods", "settings.default_method", "routes[1]", "response[0]"]
        );
    }

    #[test]
    fn test_chain_only_allowed_in_middleware() {
        let chain = TextOrList::List(vec!["A".into(), "B".into()]);
        let config = RouterConfig {
            routes: vec![RawRoute::pair("x", chain)],
            ..RouterConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "routes[0]");
    }
}
