//! Router facade.
//!
//! # Responsibilities
//! - Hold the current compiled table and swap it on reload
//! - Resolve requests to handlers
//! - Run the request/response middleware phases
//! - Reverse-route handler targets to URIs
//!
//! # Design Decisions
//! - The table lives behind an `ArcSwap`; each call works on one snapshot
//! - Middleware registries are checked against the table on construction
//!   and on every reload, so unknown names fail before traffic arrives
//! - Disabled middleware phases are skipped without touching the table

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, RouteCacheGateway};
use crate::config::RouterSettings;
use crate::error::{RouterError, RouterResult};
use crate::middleware::{self, MiddlewareSet, Phase, PipelineOutcome, RequestContext, ResponseContext};
use crate::observability::metrics;
use crate::request::RouteRequest;
use crate::routing::dispatcher::dispatch;
use crate::routing::handler::HandlerRef;
use crate::routing::params::Params;
use crate::routing::reverse::route_to;
use crate::routing::table::CompiledTable;
use crate::routing::template::has_tokens;

/// Outcome of resolving a request against the primary routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub handler: HandlerRef,
    /// Fully substituted `[dir/]Class::method`.
    pub handler_id: String,
    pub params: Params,
}

/// The routing engine.
#[derive(Debug)]
pub struct Router {
    table: ArcSwap<CompiledTable>,
    settings: RouterSettings,
    middleware: MiddlewareSet,
}

impl Router {
    /// Build a router; fails if a middleware table names an unregistered target.
    pub fn new(
        settings: RouterSettings,
        table: CompiledTable,
        middleware: MiddlewareSet,
    ) -> RouterResult<Self> {
        check_middleware(&settings, &table, &middleware)?;

        info!(
            routes = table.routes().len(),
            request_middleware = table.request().len(),
            response_middleware = table.response().len(),
            "Router ready"
        );

        Ok(Self {
            table: ArcSwap::from_pointee(table),
            settings,
            middleware,
        })
    }

    /// Current table snapshot.
    pub fn table(&self) -> Arc<CompiledTable> {
        self.table.load_full()
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Replace the table. The old table stays in place if the new one
    /// references unknown middleware.
    pub fn reload(&self, table: CompiledTable) -> RouterResult<()> {
        check_middleware(&self.settings, &table, &self.middleware)?;
        let routes = table.routes().len();
        self.table.store(Arc::new(table));
        info!(routes, "Route table reloaded");
        Ok(())
    }

    /// `reload`, then persist the accepted table. A rejected table never
    /// reaches the store; a failed publish is logged and the reload stands.
    pub fn reload_and_publish<S: CacheStore>(
        &self,
        table: CompiledTable,
        gateway: &RouteCacheGateway<S>,
    ) -> RouterResult<()> {
        self.reload(table)?;
        if let Err(e) = gateway.publish(&self.table()) {
            warn!(error = %e, "Failed to publish reloaded table");
        }
        Ok(())
    }

    /// Resolve a request to its handler and parameters.
    ///
    /// A handler still carrying a `$` token after substitution is rejected
    /// with `InvalidHandler`.
    pub fn resolve(&self, request: &RouteRequest) -> RouterResult<Resolved> {
        let table = self.table.load();

        let resolution = match dispatch(table.routes(), request) {
            Ok(resolution) => resolution,
            Err(e) => {
                if e.is_not_found() {
                    debug!(method = %request.method(), path = %request.path(), "No route matched");
                    metrics::record_dispatch("routes", "not_found");
                }
                return Err(e);
            }
        };

        let handler_id = resolution
            .target
            .as_handler()
            .ok_or_else(|| {
                RouterError::InvalidHandler(resolution.target.handlers().collect::<Vec<_>>().join(","))
            })?
            .to_string();
        if has_tokens(&handler_id) {
            return Err(RouterError::InvalidHandler(handler_id));
        }
        let handler = HandlerRef::parse(&handler_id, &self.settings)?;

        metrics::record_dispatch("routes", "matched");
        Ok(Resolved {
            handler,
            handler_id,
            params: resolution.params,
        })
    }

    /// Run before-dispatch middleware for the request carried by `context`.
    pub fn on_request(&self, context: &mut RequestContext) -> RouterResult<PipelineOutcome> {
        if !self.settings.request_middleware {
            return Ok(PipelineOutcome::Skipped);
        }
        let table = self.table.load();
        let request = context.request.clone();
        middleware::run(
            Phase::Request,
            table.request(),
            &request,
            &self.middleware.request,
            context,
        )
    }

    /// Run after-dispatch middleware for `request`.
    pub fn on_response(
        &self,
        request: &RouteRequest,
        context: &mut ResponseContext,
    ) -> RouterResult<PipelineOutcome> {
        if !self.settings.response_middleware {
            return Ok(PipelineOutcome::Skipped);
        }
        let table = self.table.load();
        middleware::run(
            Phase::Response,
            table.response(),
            request,
            &self.middleware.response,
            context,
        )
    }

    /// URI for `target`, filling the pattern's groups with `params`.
    pub fn route_to<I>(&self, target: &str, params: I) -> RouterResult<String>
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        route_to(self.table.load().reverse_index(), target, params)
    }
}

fn check_middleware(
    settings: &RouterSettings,
    table: &CompiledTable,
    middleware: &MiddlewareSet,
) -> RouterResult<()> {
    if settings.request_middleware {
        middleware.request.validate(table.request())?;
    }
    if settings.response_middleware {
        middleware.response.validate(table.response())?;
    }
    Ok(())
}
