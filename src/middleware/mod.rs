//! Middleware subsystem.
//!
//! # Data Flow
//! ```text
//! RouteRequest
//!     → dispatcher (request or response table)
//!         → RouteNotFound: no middleware for this path, return
//!     → Target::Chain [Class::method, ...]
//!     → registry.rs (Class::method → factory)
//!     → pipeline.rs (invoke in order, stop on Flow::Stop)
//! ```
//!
//! # Design Decisions
//! - Middleware are looked up by name in an explicit registry, not reflected
//! - Unknown classes or methods are configuration defects and propagate
//! - A fresh instance is built per invocation
//! - Contexts are borrowed mutably so middleware can rewrite them

pub mod context;
pub mod pipeline;
pub mod registry;

pub use context::{RequestContext, ResponseContext};
pub use pipeline::{run, Phase, PipelineOutcome};
pub use registry::MiddlewareRegistry;

use crate::routing::params::Params;

/// Whether the chain continues after a middleware returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// A single middleware operation over context `C`.
pub trait Middleware<C>: Send + Sync {
    fn handle(&self, context: &mut C, params: &Params) -> Flow;
}

/// Registries for both phases, handed to the router together.
#[derive(Debug, Clone, Default)]
pub struct MiddlewareSet {
    pub request: MiddlewareRegistry<RequestContext>,
    pub response: MiddlewareRegistry<ResponseContext>,
}

impl<C, F> Middleware<C> for F
where
    F: Fn(&mut C, &Params) -> Flow + Send + Sync,
{
    fn handle(&self, context: &mut C, params: &Params) -> Flow {
        self(context, params)
    }
}
