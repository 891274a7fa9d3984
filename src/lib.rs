//! Switchyard: a request-routing engine.
//!
//! Compiles ordered route definitions into per-method regex tables, resolves
//! requests to `[dir/]Class::method` handlers with positional and named
//! parameters, runs before/after middleware chains and builds URIs back from
//! handler targets. Compiled tables can be persisted through a cache store.

pub mod cache;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod observability;
pub mod request;
pub mod routing;

pub use config::{Environment, RouterConfig, RouterSettings};
pub use error::{MiddlewareResolutionError, RouterError, RouterResult};
pub use lifecycle::Shutdown;
pub use middleware::{Flow, Middleware, MiddlewareRegistry, MiddlewareSet, RequestContext, ResponseContext};
pub use request::{RequestType, RouteRequest};
pub use routing::{CompiledTable, Router};
