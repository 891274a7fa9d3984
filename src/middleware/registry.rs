//! Name → middleware factory registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::MiddlewareResolutionError;
use crate::middleware::{Flow, Middleware};
use crate::routing::params::Params;
use crate::routing::table::RouteTable;
use crate::routing::template::has_tokens;

type Factory<C> = Arc<dyn Fn() -> Box<dyn Middleware<C>> + Send + Sync>;

/// Registered middleware for one context type, keyed case-insensitively by
/// class, then method.
pub struct MiddlewareRegistry<C> {
    classes: HashMap<String, HashMap<String, Factory<C>>>,
}

impl<C> Default for MiddlewareRegistry<C> {
    fn default() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }
}

impl<C> Clone for MiddlewareRegistry<C> {
    fn clone(&self) -> Self {
        Self {
            classes: self.classes.clone(),
        }
    }
}

impl<C> fmt::Debug for MiddlewareRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .classes
            .iter()
            .flat_map(|(class, methods)| methods.keys().map(move |m| format!("{}::{}", class, m)))
            .collect();
        names.sort();
        f.debug_struct("MiddlewareRegistry").field("targets", &names).finish()
    }
}

impl<C: 'static> MiddlewareRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `class::method`. Re-registering replaces.
    pub fn register<F, M>(&mut self, class: &str, method: &str, factory: F) -> &mut Self
    where
        F: Fn() -> M + Send + Sync + 'static,
        M: Middleware<C> + 'static,
    {
        let factory: Factory<C> = Arc::new(move || Box::new(factory()) as Box<dyn Middleware<C>>);
        self.classes
            .entry(class.to_lowercase())
            .or_default()
            .insert(method.to_lowercase(), factory);
        self
    }

    /// Register a stateless function as `class::method`.
    pub fn register_fn<F>(&mut self, class: &str, method: &str, handler: F) -> &mut Self
    where
        F: Fn(&mut C, &Params) -> Flow + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        self.register(class, method, move || {
            let handler = handler.clone();
            move |ctx: &mut C, params: &Params| handler(ctx, params)
        })
    }

    /// Build a fresh instance for `Class::method`.
    pub fn resolve(&self, target: &str) -> Result<Box<dyn Middleware<C>>, MiddlewareResolutionError> {
        let factory = self.factory(target)?;
        Ok(factory())
    }

    pub fn contains(&self, target: &str) -> bool {
        self.factory(target).is_ok()
    }

    fn factory(&self, target: &str) -> Result<&Factory<C>, MiddlewareResolutionError> {
        let (class, method) = target
            .split_once("::")
            .ok_or_else(|| MiddlewareResolutionError::Malformed(target.to_string()))?;

        let methods = self
            .classes
            .get(&class.to_lowercase())
            .ok_or_else(|| MiddlewareResolutionError::UnknownClass(class.to_string()))?;

        methods
            .get(&method.to_lowercase())
            .ok_or_else(|| MiddlewareResolutionError::UnknownMethod {
                class: class.to_string(),
                method: method.to_string(),
            })
    }

    /// Check every target in a middleware table that carries no `$` tokens.
    /// Tokenized targets can only be checked once substituted at dispatch.
    pub fn validate(&self, table: &RouteTable) -> Result<(), MiddlewareResolutionError> {
        table
            .iter()
            .flat_map(|(_, route)| route.target().handlers())
            .filter(|handler| !has_tokens(handler))
            .try_for_each(|handler| self.factory(handler).map(|_| ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::compiler::{compile, REQUEST_DEFAULT_METHOD};
    use crate::routing::definition::{RawRoute, TextOrList};

    struct Upper;

    impl Middleware<String> for Upper {
        fn handle(&self, context: &mut String, _params: &Params) -> Flow {
            *context = context.to_uppercase();
            Flow::Continue
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = MiddlewareRegistry::<String>::new();
        registry.register("Text", "upper", || Upper);

        let mw = registry.resolve("text::UPPER").unwrap();
        let mut body = "hello".to_string();
        assert_eq!(mw.handle(&mut body, &Params::new()), Flow::Continue);
        assert_eq!(body, "HELLO");
    }

    #[test]
    fn test_resolution_errors() {
        let mut registry = MiddlewareRegistry::<String>::new();
        registry.register_fn("Text", "upper", |_ctx, _params| Flow::Continue);

        assert_eq!(
            registry.resolve("Missing::run").err(),
            Some(MiddlewareResolutionError::UnknownClass("Missing".into()))
        );
        assert_eq!(
            registry.resolve("Text::lower").err(),
            Some(MiddlewareResolutionError::UnknownMethod {
                class: "Text".into(),
                method: "lower".into()
            })
        );
        assert!(matches!(
            registry.resolve("Text").err(),
            Some(MiddlewareResolutionError::Malformed(_))
        ));
    }

    #[test]
    fn test_validate_table() {
        let all = vec!["get".to_string()];
        let defs = vec![RawRoute(vec![
            "(:any)".into(),
            TextOrList::List(vec!["Auth".into(), "Dyn::$1".into()]),
        ])];
        let table = compile("request", &defs, REQUEST_DEFAULT_METHOD, &all).unwrap();

        let mut registry = MiddlewareRegistry::<String>::new();
        assert_eq!(
            registry.validate(&table),
            Err(MiddlewareResolutionError::UnknownClass("Auth".into()))
        );

        registry.register_fn("Auth", "request", |_ctx, _params| Flow::Continue);
        assert_eq!(registry.validate(&table), Ok(()));
    }
}
