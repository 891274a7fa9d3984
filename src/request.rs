//! The dispatch input triple.
//!
//! The request model itself lives outside this crate; the router only needs
//! the slash-joined path, the lowercase verb and the request type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the request reached the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    #[default]
    Http,
    Cli,
    Ajax,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Http => "http",
            RequestType::Cli => "cli",
            RequestType::Ajax => "ajax",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(RequestType::Http),
            "cli" => Ok(RequestType::Cli),
            "ajax" => Ok(RequestType::Ajax),
            other => Err(format!("unknown request type `{}`", other)),
        }
    }
}

/// An already-parsed request as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    path: String,
    method: String,
    request_type: RequestType,
}

impl RouteRequest {
    /// Build a request. The method is lowercased and the path loses any
    /// leading or trailing slashes.
    pub fn new(method: impl AsRef<str>, path: impl AsRef<str>, request_type: RequestType) -> Self {
        Self {
            path: path.as_ref().trim_matches('/').to_string(),
            method: method.as_ref().trim().to_ascii_lowercase(),
            request_type,
        }
    }

    pub fn http(method: impl AsRef<str>, path: impl AsRef<str>) -> Self {
        Self::new(method, path, RequestType::Http)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn request_type(&self) -> RequestType {
        self.request_type
    }
}

/// Uppercase the first character, leaving the rest untouched.
pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
