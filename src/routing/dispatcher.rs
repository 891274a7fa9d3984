//! Request dispatch against a compiled route table.
//!
//! # Algorithm
//! ```text
//! table[method] (empty if absent)
//!     → linear scan, first full-path match wins
//!     → params: T, M, 0 (whole match), captures...
//!     → substitute $name tokens in the target
//!     → drop 0 from the returned params
//! ```
//!
//! No scoring and no partial matches.

use tracing::trace;

use crate::error::{RouterError, RouterResult};
use crate::request::{capitalize, RouteRequest};
use crate::routing::definition::Target;
use crate::routing::params::Params;
use crate::routing::table::RouteTable;
use crate::routing::template::substitute;

/// A successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Target with every known token substituted.
    pub target: Target,
    /// `T`, `M`, then captures in appearance order.
    pub params: Params,
}

/// Resolve `request` against one table.
pub fn dispatch(table: &RouteTable, request: &RouteRequest) -> RouterResult<Resolution> {
    let path = request.path();

    for route in table.routes_for(request.method()) {
        let Some(captures) = route.matcher().captures(path) else {
            continue;
        };

        let mut params = Params::new();
        params.push("T", capitalize(request.request_type().as_str()));
        params.push("M", capitalize(request.method()));

        for (i, name) in route.matcher().capture_names().enumerate() {
            let value = captures.get(i).map(|m| m.as_str()).unwrap_or("");
            if let Some(name) = name {
                params.push(name, value);
            }
            params.push(i.to_string(), value);
        }

        let target = route.target().map(|handler| substitute(handler, &params));

        trace!(
            method = %request.method(),
            path = %path,
            pattern = %route.matcher().as_str(),
            "Route matched"
        );

        return Ok(Resolution {
            target,
            params: params.without("0"),
        });
    }

    Err(RouterError::RouteNotFound {
        method: request.method().to_string(),
        path: path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestType;
    use crate::routing::compiler::compile;
    use crate::routing::definition::RawRoute;

    fn table(defs: Vec<RawRoute>) -> RouteTable {
        let all: Vec<String> = ["get", "post", "cli", "put", "delete"]
            .iter()
            .map(|m| m.to_string())
            .collect();
        compile("routes", &defs, "index", &all).unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let t = table(vec![
            RawRoute::pair("blog/(:any)", "Blog::show"),
            RawRoute::pair("blog/(:num)", "Blog::byId"),
        ]);
        let res = dispatch(&t, &RouteRequest::http("get", "blog/12")).unwrap();
        assert_eq!(res.target, Target::from("Blog::show"));
    }

    #[test]
    fn test_synthetic_params_come_first() {
        let t = table(vec![RawRoute::triple("form/(:num)/(:any)", "post", "Form::save$1")]);
        let req = RouteRequest::new("post", "form/9/draft", RequestType::Ajax);
        let res = dispatch(&t, &req).unwrap();

        let params: Vec<_> = res.params.iter().collect();
        assert_eq!(
            params,
            vec![("T", "Ajax"), ("M", "Post"), ("1", "9"), ("2", "draft")]
        );
        assert_eq!(res.target, Target::from("Form::save9"));
    }

    #[test]
    fn test_synthetic_tokens_in_target() {
        let t = table(vec![RawRoute::triple("(:any)", "*", "$1::$T$M")]);
        let req = RouteRequest::new("cli", "jobs", RequestType::Cli);
        let res = dispatch(&t, &req).unwrap();
        assert_eq!(res.target, Target::from("jobs::CliCli"));
    }

    #[test]
    fn test_named_groups() {
        let t = table(vec![RawRoute::pair("user/(?P<id>[0-9]+)", "User::show$id")]);
        let res = dispatch(&t, &RouteRequest::http("get", "user/5")).unwrap();
        assert_eq!(res.params.get("id"), Some("5"));
        assert_eq!(res.params.get("1"), Some("5"));
        assert_eq!(res.target, Target::from("User::show5"));
    }

    #[test]
    fn test_optional_group_is_empty() {
        let t = table(vec![RawRoute::pair("list(/[0-9]+)?", "List::page$1")]);
        let res = dispatch(&t, &RouteRequest::http("get", "list")).unwrap();
        assert_eq!(res.params.get("1"), Some(""));
        assert_eq!(res.target, Target::from("List::page"));
    }

    #[test]
    fn test_not_found() {
        let t = table(vec![RawRoute::pair("path/(:num)", "P")]);
        let err = dispatch(&t, &RouteRequest::http("get", "path/abc")).unwrap_err();
        assert!(err.is_not_found());

        let err = dispatch(&t, &RouteRequest::http("delete", "path/1")).unwrap_err();
        assert!(matches!(err, RouterError::RouteNotFound { ref method, .. } if method == "delete"));
    }

    #[test]
    fn test_deterministic() {
        let t = table(vec![
            RawRoute::pair("a/(:any)", "A::$1"),
            RawRoute::pair("(:any)/(:any)", "B::$2"),
        ]);
        let req = RouteRequest::http("get", "a/b");
        let first = dispatch(&t, &req).unwrap();
        for _ in 0..10 {
            assert_eq!(dispatch(&t, &req).unwrap(), first);
        }
    }
}
