//! Compiled route tables.
//!
//! # Layout
//! ```text
//! CompiledTable
//!     routes   : RouteTable   (method → [CompiledRoute])
//!     request  : RouteTable   (before-dispatch middleware)
//!     response : RouteTable   (after-dispatch middleware)
//!     routeto  : ReverseIndex (lowercase target → pattern as written)
//! ```
//!
//! Tables serialize to exactly this four-key shape; each compiled route is a
//! `[regex, target]` pair whose regex is recompiled on load.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::routing::definition::Target;
use crate::routing::pattern::build_matcher;

/// A matcher paired with the handler template it resolves to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredRoute", into = "StoredRoute")]
pub struct CompiledRoute {
    matcher: Regex,
    target: Target,
}

impl CompiledRoute {
    pub(crate) fn new(matcher: Regex, target: Target) -> Self {
        Self { matcher, target }
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    pub fn target(&self) -> &Target {
        &self.target
    }
}

impl PartialEq for CompiledRoute {
    fn eq(&self, other: &Self) -> bool {
        self.matcher.as_str() == other.matcher.as_str() && self.target == other.target
    }
}

/// Persisted form of a compiled route.
#[derive(Serialize, Deserialize)]
struct StoredRoute(String, Target);

impl From<CompiledRoute> for StoredRoute {
    fn from(route: CompiledRoute) -> Self {
        StoredRoute(route.matcher.as_str().to_string(), route.target)
    }
}

impl TryFrom<StoredRoute> for CompiledRoute {
    type Error = regex::Error;

    fn try_from(stored: StoredRoute) -> Result<Self, Self::Error> {
        Ok(CompiledRoute::new(build_matcher(&stored.0)?, stored.1))
    }
}

/// Per-method ordered route lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    methods: BTreeMap<String, Vec<CompiledRoute>>,
}

impl RouteTable {
    pub(crate) fn push(&mut self, method: &str, route: CompiledRoute) {
        self.methods.entry(method.to_string()).or_default().push(route);
    }

    /// Routes for a lowercase method; empty when none are registered.
    pub fn routes_for(&self, method: &str) -> &[CompiledRoute] {
        self.methods.get(method).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Every route in every method list.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompiledRoute)> {
        self.methods
            .iter()
            .flat_map(|(method, routes)| routes.iter().map(move |r| (method.as_str(), r)))
    }

    pub fn len(&self) -> usize {
        self.methods.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lowercase handler target → pattern as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReverseIndex(BTreeMap<String, String>);

impl ReverseIndex {
    /// Later inserts for the same key overwrite earlier ones.
    pub(crate) fn insert(&mut self, target: &str, pattern: &str) {
        self.0.insert(target.to_lowercase(), pattern.to_string());
    }

    pub fn get(&self, target: &str) -> Option<&str> {
        self.0.get(&target.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The full compiled routing state. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledTable {
    pub(crate) routes: RouteTable,
    pub(crate) request: RouteTable,
    pub(crate) response: RouteTable,
    pub(crate) routeto: ReverseIndex,
}

impl CompiledTable {
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn request(&self) -> &RouteTable {
        &self.request
    }

    pub fn response(&self) -> &RouteTable {
        &self.response
    }

    pub fn reverse_index(&self) -> &ReverseIndex {
        &self.routeto
    }
}
