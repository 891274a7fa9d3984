//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup or reload):
//!     RawRoute[] (routes, request, response)
//!     → definition.rs (arity, method lists, targets)
//!     → pattern.rs (:any / :num, anchored case-insensitive regex)
//!     → compiler.rs (per-method ordered lists + reverse index)
//!     → table.rs (CompiledTable, serializable)
//!
//! Incoming Request (method, path, type):
//!     → router.rs (snapshot of the current table)
//!     → dispatcher.rs (first match wins, T/M + captures)
//!     → template.rs ($name substitution in the target)
//!     → handler.rs ([dir/]Class::method)
//!
//! Reverse lookup:
//!     target → reverse.rs → "/" + pattern with groups filled
//! ```
//!
//! # Design Decisions
//! - Tables are immutable; reload builds a new one and swaps it in
//! - Deterministic: same input always matches same route
//! - First match wins (definition order, per method)

pub mod compiler;
pub mod definition;
pub mod dispatcher;
pub mod handler;
pub mod params;
pub mod pattern;
pub mod reverse;
pub mod router;
pub mod table;
pub mod template;

pub use compiler::compile_config;
pub use definition::{RawRoute, Target, TextOrList};
pub use dispatcher::{dispatch, Resolution};
pub use handler::HandlerRef;
pub use params::Params;
pub use router::{Resolved, Router};
pub use table::{CompiledTable, ReverseIndex, RouteTable};
