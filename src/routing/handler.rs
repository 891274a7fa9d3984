//! Handler identifiers as consumed by the controller collaborator.
//!
//! ```text
//! welcome::index                      → dir "",                 Welcome/index
//! folder1/admin/welcome::index        → dir "folder1/admin/",   welcome/index
//! /packages/mod/controller::method    → dir "../../packages/mod/" (root-relative)
//! ```

use serde::Serialize;

use crate::config::RouterSettings;
use crate::error::{RouterError, RouterResult};
use crate::routing::params::Params;

/// A resolved `[directory/]Class::method` handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerRef {
    /// Controller directory, empty or ending with `/`.
    pub directory: String,
    pub class: String,
    pub method: String,
}

impl HandlerRef {
    /// Split a fully substituted handler string.
    pub fn parse(handler: &str, settings: &RouterSettings) -> RouterResult<Self> {
        let (dir, class_method) = match handler.rsplit_once('/') {
            Some((dir, class_method)) => (dir, class_method),
            None => ("", handler),
        };

        let (class, method) = class_method
            .split_once("::")
            .ok_or_else(|| RouterError::InvalidHandler(handler.to_string()))?;

        let class = normalize_name(class);
        if class.is_empty() {
            return Err(RouterError::InvalidHandler(handler.to_string()));
        }

        let method = match normalize_name(method) {
            m if m.is_empty() => settings.default_method.clone(),
            m => m,
        };

        let directory = if handler.starts_with('/') {
            format!("{}{}", settings.back_up_levels, dir)
        } else {
            dir.to_string()
        };
        let directory = match directory.trim_matches('/') {
            "" => String::new(),
            trimmed => format!("{}/", trimmed),
        };

        Ok(Self {
            directory,
            class,
            method,
        })
    }

    /// `[class, method, param values...]`, the routed segment list.
    pub fn segments(&self, params: &Params) -> Vec<String> {
        [self.class.clone(), self.method.clone()]
            .into_iter()
            .chain(params.iter().map(|(_, value)| value.to_string()))
            .collect()
    }
}

fn normalize_name(name: &str) -> String {
    name.trim_matches('/').replace('-', "_")
}
