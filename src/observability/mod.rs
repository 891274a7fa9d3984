//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! compiler, cache gateway, router, pipeline, watcher produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → fmt subscriber installed by the binary (stderr)
//!     → whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library emits events and metrics but installs nothing itself
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
