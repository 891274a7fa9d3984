//! Middleware pipeline runner.
//!
//! # Responsibilities
//! - Resolve the middleware chain for a request through the dispatcher
//! - Treat a missing middleware route as "nothing to run"
//! - Invoke each target in order, stopping on `Flow::Stop`
//!
//! # Design Decisions
//! - Only `RouteNotFound` from the pipeline's own dispatch is absorbed
//! - Resolution failures propagate; they indicate a deployment defect

use std::fmt;

use tracing::debug;

use crate::error::RouterResult;
use crate::middleware::{Flow, MiddlewareRegistry};
use crate::observability::metrics;
use crate::request::RouteRequest;
use crate::routing::dispatcher::dispatch;
use crate::routing::table::RouteTable;

/// Which side of the controller a pipeline runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Request,
    Response,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Request => "request",
            Phase::Response => "response",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a pipeline run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// No middleware route matched, or the phase is disabled.
    Skipped,
    /// Every middleware in the chain ran.
    Completed { ran: usize },
    /// A middleware returned `Flow::Stop`.
    Halted { by: String },
}

impl PipelineOutcome {
    fn label(&self) -> &'static str {
        match self {
            PipelineOutcome::Skipped => "skipped",
            PipelineOutcome::Completed { .. } => "completed",
            PipelineOutcome::Halted { .. } => "halted",
        }
    }
}

/// Run the middleware chain `table` resolves for `request` against `context`.
pub fn run<C: 'static>(
    phase: Phase,
    table: &RouteTable,
    request: &RouteRequest,
    registry: &MiddlewareRegistry<C>,
    context: &mut C,
) -> RouterResult<PipelineOutcome> {
    let resolution = match dispatch(table, request) {
        Ok(resolution) => resolution,
        Err(e) if e.is_not_found() => {
            debug!(phase = %phase, path = %request.path(), "No middleware route");
            metrics::record_middleware(phase.as_str(), "skipped");
            return Ok(PipelineOutcome::Skipped);
        }
        Err(e) => return Err(e),
    };

    let mut ran = 0;
    let mut outcome = None;
    for target in resolution.target.handlers() {
        let middleware = registry.resolve(target)?;
        ran += 1;
        if middleware.handle(context, &resolution.params) == Flow::Stop {
            debug!(phase = %phase, middleware = %target, "Middleware halted the chain");
            outcome = Some(PipelineOutcome::Halted {
                by: target.to_string(),
            });
            break;
        }
    }

    let outcome = outcome.unwrap_or(PipelineOutcome::Completed { ran });
    metrics::record_middleware(phase.as_str(), outcome.label());
    Ok(outcome)
}
