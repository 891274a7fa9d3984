//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use switchyard::config::load_config_str;
use switchyard::routing::compile_config;
use switchyard::{CompiledTable, Flow, MiddlewareSet, RequestContext, ResponseContext, Router, RouterConfig};

/// Route file used across the integration tests.
pub const SAMPLE_ROUTES: &str = r#"
routes = [
    ["", "Welcome"],
    ["item/(:num)", "Item::show$1"],
    ["blog/(?<slug>[a-z-]+)", "get,post", "Blog::view"],
    ["api/(:any)", "*", "api/$M::$1"],
    ["about", "Pages::about"],
    ["(:any)", "Pages::show"],
]
request = [
    ["admin/(:any)", "*", ["Guard::check", "Audit"]],
]
response = [
    ["(:any)", "*", "Headers::stamp"],
]

[settings]
all_methods = "get,post,put,delete"
"#;

static DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A unique scratch directory under the system temp dir, removed on drop.
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(label: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "switchyard-it-{}-{}-{}-{}",
            label,
            std::process::id(),
            DIR_COUNTER.fetch_add(1, Ordering::SeqCst),
            nanos
        ));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `content` to `name` inside the directory, returning its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

pub fn sample_config() -> RouterConfig {
    load_config_str(SAMPLE_ROUTES).unwrap()
}

pub fn sample_table() -> CompiledTable {
    compile_config(&sample_config()).unwrap()
}

/// Middleware for the sample routes. `Guard::check` stops the chain when
/// the request carries an `x-deny` header; every middleware appends its
/// name to the `trail` attribute.
pub fn sample_middleware() -> MiddlewareSet {
    let mut set = MiddlewareSet::default();
    set.request
        .register_fn("Guard", "check", |ctx: &mut RequestContext, _params| {
            trail(ctx, "guard");
            if ctx.header("x-deny").is_some() {
                Flow::Stop
            } else {
                Flow::Continue
            }
        })
        .register_fn("Audit", "request", |ctx: &mut RequestContext, params| {
            trail(ctx, &format!("audit:{}", params.get("1").unwrap_or("")));
            Flow::Continue
        });
    set.response
        .register_fn("Headers", "stamp", |ctx: &mut ResponseContext, params| {
            ctx.headers
                .insert("x-routed-by".into(), params.get("M").unwrap_or("").to_string());
            Flow::Continue
        });
    set
}

pub fn sample_router() -> Router {
    let config = sample_config();
    Router::new(config.settings.clone(), sample_table(), sample_middleware()).unwrap()
}

fn trail(ctx: &mut RequestContext, step: &str) {
    let entry = ctx.attributes.entry("trail".to_string()).or_default();
    if !entry.is_empty() {
        entry.push(',');
    }
    entry.push_str(step);
}
