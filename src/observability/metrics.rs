//! Routing metrics.
//!
//! # Metrics
//! - `switchyard_dispatch_total` (counter): dispatches by table, outcome
//! - `switchyard_compile_total` (counter): table compilations
//! - `switchyard_compiled_routes` (gauge): primary routes in the last compile
//! - `switchyard_cache_events_total` (counter): cache hit/miss/publish/...
//! - `switchyard_middleware_runs_total` (counter): pipeline runs by phase, outcome

/// Count one dispatch against `table` (`routes`, `request`, `response`).
pub fn record_dispatch(table: &str, outcome: &str) {
    ::metrics::counter!(
        "switchyard_dispatch_total",
        &[("table", table.to_string()), ("outcome", outcome.to_string())]
    )
    .increment(1);
}

pub fn record_compile(routes: usize) {
    ::metrics::counter!("switchyard_compile_total").increment(1);
    ::metrics::gauge!("switchyard_compiled_routes").set(routes as f64);
}

pub fn record_cache(event: &str) {
    ::metrics::counter!(
        "switchyard_cache_events_total",
        &[("event", event.to_string())]
    )
    .increment(1);
}

pub fn record_middleware(phase: &str, outcome: &str) {
    ::metrics::counter!(
        "switchyard_middleware_runs_total",
        &[("phase", phase.to_string()), ("outcome", outcome.to_string())]
    )
    .increment(1);
}
