//! Route table compilation.
//!
//! # Responsibilities
//! - Check raw definitions (arity, field shapes)
//! - Expand `*` and comma-separated method lists
//! - Append the default method to bare targets
//! - Translate placeholders and compile anchored, case-insensitive matchers
//! - Build the reverse index from primary routes
//!
//! # Design Decisions
//! - Definition order is preserved per method; first match wins at dispatch
//! - Middleware tables use the same algorithm with their own default method
//! - Any bad definition aborts the whole compile

use tracing::debug;

use crate::config::RouterConfig;
use crate::error::{RouterError, RouterResult};
use crate::observability::metrics;
use crate::routing::definition::{RawRoute, RouteDefinition, Target};
use crate::routing::pattern::{anchored_source, build_matcher};
use crate::routing::table::{CompiledRoute, CompiledTable, ReverseIndex, RouteTable};

/// Default method label for before-dispatch middleware targets.
pub const REQUEST_DEFAULT_METHOD: &str = "request";
/// Default method label for after-dispatch middleware targets.
pub const RESPONSE_DEFAULT_METHOD: &str = "response";

/// Compile one definition list into per-method route lists.
///
/// `table` labels errors (`routes`, `request`, `response`).
pub fn compile(
    table: &str,
    definitions: &[RawRoute],
    default_method: &str,
    all_methods: &[String],
) -> RouterResult<RouteTable> {
    let mut compiled = RouteTable::default();

    for (index, raw) in definitions.iter().enumerate() {
        let def = RouteDefinition::from_raw(table, index, raw)?;
        let target = def.target.with_default_method(default_method);
        let source = anchored_source(&def.pattern);
        let matcher = build_matcher(&source).map_err(|e| {
            RouterError::configuration(table, index, format!("pattern `{}`: {}", def.pattern, e))
        })?;

        for method in def.methods.expand(all_methods) {
            compiled.push(&method, CompiledRoute::new(matcher.clone(), target.clone()));
        }
    }

    Ok(compiled)
}

/// Build the reverse index from primary route definitions.
///
/// Keys are the target as written and, when different, its normalized form.
/// Primary routes must name a single handler; a chain is rejected here.
pub fn reverse_index(definitions: &[RawRoute], default_method: &str) -> RouterResult<ReverseIndex> {
    let mut index = ReverseIndex::default();

    for (i, raw) in definitions.iter().enumerate() {
        let def = RouteDefinition::from_raw("routes", i, raw)?;
        let Target::Handler(written) = &def.target else {
            return Err(RouterError::configuration(
                "routes",
                i,
                "a route must name a single handler, not a chain",
            ));
        };
        index.insert(written, &def.pattern);

        if let Target::Handler(normalized) = def.target.with_default_method(default_method) {
            if !normalized.eq_ignore_ascii_case(written) {
                index.insert(&normalized, &def.pattern);
            }
        }
    }

    Ok(index)
}

/// Compile the complete table from configuration.
pub fn compile_config(config: &RouterConfig) -> RouterResult<CompiledTable> {
    let settings = &config.settings;
    let all_methods = settings.all_methods();

    let table = CompiledTable {
        routes: compile("routes", &config.routes, &settings.default_method, &all_methods)?,
        request: compile("request", &config.request, REQUEST_DEFAULT_METHOD, &all_methods)?,
        response: compile("response", &config.response, RESPONSE_DEFAULT_METHOD, &all_methods)?,
        routeto: reverse_index(&config.routes, &settings.default_method)?,
    };

    debug!(
        routes = table.routes.len(),
        request = table.request.len(),
        response = table.response.len(),
        reverse = table.routeto.len(),
        "Route table compiled"
    );
    metrics::record_compile(table.routes.len());

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::definition::TextOrList;

    fn all() -> Vec<String> {
        ["get", "post", "cli", "put", "delete"].iter().map(|m| m.to_string()).collect()
    }

    fn handlers(table: &RouteTable, method: &str) -> Vec<String> {
        table
            .routes_for(method)
            .iter()
            .map(|r| r.target().handlers().collect::<Vec<_>>().join("|"))
            .collect()
    }

    #[test]
    fn test_compile_methods_and_order() {
        let defs = vec![
            RawRoute::pair("home", "Home"),
            RawRoute::triple("api/(:any)", "get,post", "Api::handle"),
            RawRoute::triple("(:any)", "*", "Fallback::show"),
        ];
        let table = compile("routes", &defs, "index", &all()).unwrap();

        assert_eq!(
            handlers(&table, "get"),
            vec!["Home::index", "Api::handle", "Fallback::show"]
        );
        assert_eq!(handlers(&table, "post"), vec!["Api::handle", "Fallback::show"]);
        assert_eq!(handlers(&table, "delete"), vec!["Fallback::show"]);
        assert!(table.routes_for("patch").is_empty());
    }

    #[test]
    fn test_wildcard_uses_configured_set() {
        let defs = vec![RawRoute::triple("x", "*", "X")];
        let only = vec!["get".to_string(), "cli".to_string()];
        let table = compile("routes", &defs, "index", &only).unwrap();
        assert_eq!(table.methods().collect::<Vec<_>>(), vec!["cli", "get"]);
    }

    #[test]
    fn test_chain_targets() {
        let defs = vec![RawRoute(vec![
            "admin/(:any)".into(),
            "*".into(),
            TextOrList::List(vec!["Auth".into(), "Audit::log".into()]),
        ])];
        let table = compile("request", &defs, REQUEST_DEFAULT_METHOD, &all()).unwrap();
        assert_eq!(handlers(&table, "put"), vec!["Auth::request|Audit::log"]);
    }

    #[test]
    fn test_bad_pattern_is_configuration_error() {
        let defs = vec![RawRoute::pair("ok", "A"), RawRoute::pair("broken/(", "B")];
        let err = compile("routes", &defs, "index", &all()).unwrap_err();
        assert!(matches!(err, RouterError::Configuration { index: 1, .. }));
    }

    #[test]
    fn test_reverse_index_keys() {
        let defs = vec![
            RawRoute::pair("item/(:num)", "Item::show$1"),
            RawRoute::pair("home", "Home"),
            RawRoute::triple("welcome", "post", "Home"),
        ];
        let index = reverse_index(&defs, "index").unwrap();
        assert_eq!(index.get("item::show$1"), Some("item/(:num)"));
        assert_eq!(index.get("home"), Some("welcome"));
        assert_eq!(index.get("Home::index"), Some("welcome"));
    }

    #[test]
    fn test_chain_rejected_in_routes() {
        let config: RouterConfig = toml::from_str(
            r#"routes = [["home", "get", ["A", "B"]]]"#,
        )
        .unwrap();
        assert!(matches!(
            compile_config(&config),
            Err(RouterError::Configuration { .. })
        ));
    }
}
