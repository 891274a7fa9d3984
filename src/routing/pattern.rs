//! Pattern translation.
//!
//! Route patterns are regular expressions with two shorthands:
//! `:any` (one non-empty path segment) and `:num` (digits). Compiled
//! patterns are anchored at both ends and case-insensitive.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

const ANY: &str = "[^/]+";
const NUM: &str = "[0-9]+";

/// Parenthesized groups as written in a pattern as written.
static GROUP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]+)\)").unwrap());

/// Expand placeholders and anchor: `item/(:num)` → `^(?:item/([0-9]+))$`.
///
/// The non-capturing group keeps a top-level `|` inside both anchors and
/// adds no capture index.
pub fn anchored_source(pattern: &str) -> String {
    let expanded = pattern.replace(":any", ANY).replace(":num", NUM);
    format!("^(?:{})$", expanded)
}

/// Compile an anchored source. Used both at compile time and when a
/// persisted table is loaded back.
pub fn build_matcher(source: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source).case_insensitive(true).build()
}

/// Number of parenthesized groups in a pattern as written.
pub fn group_count(pattern: &str) -> usize {
    GROUP_REGEX.find_iter(pattern).count()
}

/// Replace each parenthesized group, left to right, with the matching value.
///
/// Callers guarantee `values.len() >= group_count(pattern)`.
pub fn fill_groups(pattern: &str, values: &[String]) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut last = 0;

    for (group, value) in GROUP_REGEX.find_iter(pattern).zip(values) {
        out.push_str(&pattern[last..group.start()]);
        out.push_str(value);
        last = group.end();
    }
    out.push_str(&pattern[last..]);
    out
}
