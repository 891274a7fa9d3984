//! `$name` token substitution in handler templates.
//!
//! A single left-to-right scan. After each `$`, the longest run of name
//! characters that names a known parameter is replaced; `$12` is capture 12
//! when it exists, else capture 1 followed by a literal `2`. Unknown tokens
//! are copied through untouched.

use crate::routing::params::Params;

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Substitute every known `$name` token in `template`.
pub fn substitute(template: &str, params: &Params) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let run = after
            .char_indices()
            .find(|(_, c)| !is_name_char(*c))
            .map(|(i, _)| i)
            .unwrap_or(after.len());

        // name chars are ASCII, so every index up to `run` is a char boundary
        let hit = (1..=run)
            .rev()
            .find_map(|len| params.get(&after[..len]).map(|value| (len, value)));

        match hit {
            Some((len, value)) => {
                out.push_str(value);
                rest = &after[len..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// True when `template` still carries a `$` token.
pub fn has_tokens(template: &str) -> bool {
    template.contains('$')
}
