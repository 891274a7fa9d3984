//! Router error taxonomy.
//!
//! # Severity
//! - `Configuration`, `MiddlewareResolution`: deployment defects, fatal at startup
//! - `RouteNotFound`: expected per-request miss, mapped to "no route" by callers
//! - `ReverseLookup`, `ParameterCount`: fatal to the calling code path
//!
//! Only the middleware pipeline absorbs `RouteNotFound`; every other error
//! propagates untouched.

use thiserror::Error;

use crate::cache::CacheError;

/// Errors raised while compiling, dispatching or reverse-routing.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A route definition could not be compiled.
    #[error("invalid {table} definition #{index}: {reason}")]
    Configuration {
        table: String,
        index: usize,
        reason: String,
    },

    /// No pattern matched the path for the given method.
    #[error("no route for {method} `{path}`")]
    RouteNotFound { method: String, path: String },

    /// A middleware target does not resolve to a registered implementation.
    #[error(transparent)]
    MiddlewareResolution(#[from] MiddlewareResolutionError),

    /// The reverse index has no entry for the requested target.
    #[error("no route targets `{0}`")]
    ReverseLookup(String),

    /// Too few parameters were supplied for reverse substitution.
    #[error("route `{target}` expects {expected} parameters, received {received}")]
    ParameterCount {
        target: String,
        expected: usize,
        received: usize,
    },

    /// A resolved handler is not of the form `[dir/]Class::method`.
    #[error("handler `{0}` is not of the form Class::method")]
    InvalidHandler(String),

    /// Persisting or loading the compiled table failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl RouterError {
    pub(crate) fn configuration(table: &str, index: usize, reason: impl Into<String>) -> Self {
        Self::Configuration {
            table: table.to_string(),
            index,
            reason: reason.into(),
        }
    }

    /// True for the recoverable "no route matched" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RouteNotFound { .. })
    }
}

/// Middleware lookup failures. Always a configuration defect.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MiddlewareResolutionError {
    #[error("middleware class `{0}` is not registered")]
    UnknownClass(String),

    #[error("middleware class `{class}` has no method `{method}`")]
    UnknownMethod { class: String, method: String },

    #[error("middleware target `{0}` is not of the form Class::method")]
    Malformed(String),
}

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouterError::ParameterCount {
            target: "item::show$1".into(),
            expected: 2,
            received: 1,
        };
        assert_eq!(
            err.to_string(),
            "route `item::show$1` expects 2 parameters, received 1"
        );

        let err = RouterError::configuration("routes", 3, "expected 2 or 3 fields, found 4");
        assert!(err.to_string().contains("#3"));
        assert!(err.to_string().contains("routes"));
    }

    #[test]
    fn test_not_found_classification() {
        let miss = RouterError::RouteNotFound {
            method: "delete".into(),
            path: "users/1".into(),
        };
        assert!(miss.is_not_found());

        let missing: RouterError = MiddlewareResolutionError::UnknownClass("Auth".into()).into();
        assert!(!missing.is_not_found());
        assert_eq!(missing.to_string(), "middleware class `Auth` is not registered");
    }
}
