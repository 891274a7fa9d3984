//! Payloads handed to middleware.

use std::collections::BTreeMap;

use crate::request::RouteRequest;

/// Before-dispatch payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request: RouteRequest,
    pub headers: BTreeMap<String, String>,
    /// Values middleware attach for later stages.
    pub attributes: BTreeMap<String, String>,
}

impl RequestContext {
    pub fn new(request: RouteRequest) -> Self {
        Self {
            request,
            headers: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// After-dispatch payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseContext {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ResponseContext {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }
}

impl Default for ResponseContext {
    fn default() -> Self {
        Self::new(200, String::new())
    }
}
