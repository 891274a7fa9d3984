//! Route definitions as read from configuration.
//!
//! # Forms
//! - `[pattern, target]` (method `get`)
//! - `[pattern, methods, target]` where methods is a token, a comma-separated
//!   list, a list, or `*`
//!
//! A target is a single `Class::method` string or, in middleware tables, a
//! list of them.

use serde::{Deserialize, Serialize};

use crate::error::{RouterError, RouterResult};

/// A configuration field that may be written as a string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl TextOrList {
    /// Split into trimmed, lowercased, de-duplicated tokens. A text value is
    /// split on commas.
    pub fn tokens(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            TextOrList::Text(text) => text.split(',').collect(),
            TextOrList::List(items) => items.iter().map(String::as_str).collect(),
        };

        let mut tokens: Vec<String> = Vec::with_capacity(raw.len());
        for token in raw {
            let token = token.trim().to_ascii_lowercase();
            if !token.is_empty() && !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        tokens
    }
}

impl From<&str> for TextOrList {
    fn from(value: &str) -> Self {
        TextOrList::Text(value.to_string())
    }
}

/// One raw definition tuple, unchecked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RawRoute(pub Vec<TextOrList>);

impl RawRoute {
    /// `[pattern, target]`
    pub fn pair(pattern: &str, target: impl Into<TextOrList>) -> Self {
        Self(vec![TextOrList::from(pattern), target.into()])
    }

    /// `[pattern, methods, target]`
    pub fn triple(pattern: &str, methods: &str, target: impl Into<TextOrList>) -> Self {
        Self(vec![
            TextOrList::from(pattern),
            TextOrList::from(methods),
            target.into(),
        ])
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }
}

/// Which methods a definition applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSpec {
    /// `*`: every configured method.
    All,
    /// Explicit lowercase tokens.
    Only(Vec<String>),
}

impl MethodSpec {
    /// Expand against the configured all-methods set.
    pub fn expand(&self, all_methods: &[String]) -> Vec<String> {
        match self {
            MethodSpec::All => all_methods.to_vec(),
            MethodSpec::Only(methods) => methods.clone(),
        }
    }
}

/// What a route resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Handler(String),
    Chain(Vec<String>),
}

impl Target {
    /// Every handler string, in order.
    pub fn handlers(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            Target::Handler(handler) => std::slice::from_ref(handler),
            Target::Chain(chain) => chain,
        };
        items.iter().map(String::as_str)
    }

    pub fn as_handler(&self) -> Option<&str> {
        match self {
            Target::Handler(handler) => Some(handler),
            Target::Chain(_) => None,
        }
    }

    /// Apply `f` to every handler string.
    pub fn map(&self, mut f: impl FnMut(&str) -> String) -> Target {
        match self {
            Target::Handler(handler) => Target::Handler(f(handler)),
            Target::Chain(chain) => Target::Chain(chain.iter().map(|h| f(h)).collect()),
        }
    }

    /// Append `::default_method` to handlers that name no method.
    pub fn with_default_method(&self, default_method: &str) -> Target {
        self.map(|handler| {
            if handler.contains("::") {
                handler.to_string()
            } else {
                format!("{}::{}", handler, default_method)
            }
        })
    }
}

impl From<TextOrList> for Target {
    fn from(value: TextOrList) -> Self {
        match value {
            TextOrList::Text(handler) => Target::Handler(handler),
            TextOrList::List(chain) => Target::Chain(chain),
        }
    }
}

impl From<&str> for Target {
    fn from(value: &str) -> Self {
        Target::Handler(value.to_string())
    }
}

/// A checked definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    pub pattern: String,
    pub methods: MethodSpec,
    pub target: Target,
}

impl RouteDefinition {
    /// Check arity and field shapes of a raw tuple.
    ///
    /// `table` and `index` only label errors.
    pub fn from_raw(table: &str, index: usize, raw: &RawRoute) -> RouterResult<Self> {
        let (pattern, methods, target) = match raw.0.as_slice() {
            [pattern, target] => (pattern, None, target),
            [pattern, methods, target] => (pattern, Some(methods), target),
            fields => {
                return Err(RouterError::configuration(
                    table,
                    index,
                    format!("expected 2 or 3 fields, found {}", fields.len()),
                ))
            }
        };

        let pattern = match pattern {
            TextOrList::Text(pattern) => pattern.clone(),
            TextOrList::List(_) => {
                return Err(RouterError::configuration(table, index, "pattern must be a string"))
            }
        };

        let methods = match methods {
            None => MethodSpec::Only(vec!["get".to_string()]),
            Some(TextOrList::Text(text)) if text.trim() == "*" => MethodSpec::All,
            Some(methods) => {
                let tokens = methods.tokens();
                if tokens.is_empty() {
                    return Err(RouterError::configuration(table, index, "no methods given"));
                }
                MethodSpec::Only(tokens)
            }
        };

        let target = Target::from(target.clone());
        if target.handlers().any(|h| h.trim().is_empty()) {
            return Err(RouterError::configuration(table, index, "empty target"));
        }

        Ok(Self {
            pattern,
            methods,
            target,
        })
    }
}
