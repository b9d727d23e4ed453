//! Percent-encoding tuned to the PostgREST query-parameter language.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters that survive encoding beyond the URL-unreserved set: the
/// PostgREST filter syntax (comma, parentheses, dot), value quoting,
/// aliases (colon), wildcards, and array literals (braces).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b',')
    .remove(b'(')
    .remove(b')')
    .remove(b':')
    .remove(b'"')
    .remove(b'*')
    .remove(b'{')
    .remove(b'}');

/// Percent-encode one query-parameter key or value.
pub fn encode_component(component: &str) -> String {
    utf8_percent_encode(component, QUERY_COMPONENT).to_string()
}

/// Wrap a string literal in double quotes when it contains filter syntax
/// characters, escaping embedded quotes and backslashes. Brace-wrapped
/// array and range literals pass through untouched.
pub fn quote_literal(literal: &str) -> String {
    if needs_quoting(literal) {
        let escaped = literal.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escaped)
    } else {
        literal.to_string()
    }
}

fn needs_quoting(literal: &str) -> bool {
    if literal.starts_with('{') && literal.ends_with('}') {
        return false;
    }
    literal.is_empty()
        || literal
            .chars()
            .any(|c| matches!(c, ',' | '(' | ')' | '.' | ':' | '"' | '\\'))
}
