//! Reverse routing: handler target → URI.

use crate::error::{RouterError, RouterResult};
use crate::routing::pattern::{fill_groups, group_count};
use crate::routing::table::ReverseIndex;

/// Build `/<pattern>` for `target`, replacing each parenthesized group of the
/// pattern as written with the next parameter. Extra parameters are ignored.
pub fn route_to<I>(index: &ReverseIndex, target: &str, params: I) -> RouterResult<String>
where
    I: IntoIterator,
    I::Item: ToString,
{
    let pattern = index
        .get(target)
        .ok_or_else(|| RouterError::ReverseLookup(target.to_lowercase()))?;

    let values: Vec<String> = params.into_iter().map(|p| p.to_string()).collect();
    let expected = group_count(pattern);
    if values.len() < expected {
        return Err(RouterError::ParameterCount {
            target: target.to_lowercase(),
            expected,
            received: values.len(),
        });
    }

    Ok(format!("/{}", fill_groups(pattern, &values)))
}
