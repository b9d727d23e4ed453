//! Cursor and hint extraction from parser error messages.

use sqlparser::parser::ParserError;

use crate::error::Error;

/// Turn a parser error into [`Error::Parsing`] with a byte-offset cursor and
/// a classified human hint.
pub fn parsing_error(error: &ParserError, sql: &str) -> Error {
    let message = match error {
        ParserError::TokenizerError(message) | ParserError::ParserError(message) => {
            message.clone()
        }
        other => other.to_string(),
    };
    let cursor = cursor_position(&message, sql);
    let hint = classify(&message);
    Error::parsing(message, cursor, hint)
}

/// The parser reports locations as an `at Line: N, Column: M` suffix.
/// Convert that back into a byte offset into the source.
fn cursor_position(message: &str, sql: &str) -> Option<usize> {
    let tail = &message[message.rfind(" at Line: ")? + " at Line: ".len()..];
    let (line, column) = tail.split_once(", Column: ")?;
    let line: usize = line.trim().parse().ok()?;
    let column: usize = column.trim().split_whitespace().next()?.parse().ok()?;
    byte_offset(sql, line, column)
}

/// 1-based line and column to a byte offset.
fn byte_offset(sql: &str, line: usize, column: usize) -> Option<usize> {
    let mut offset = 0usize;
    for (index, text) in sql.split('\n').enumerate() {
        if index + 1 == line {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(byte, _)| byte)
                .unwrap_or(text.len());
            return Some(offset + within);
        }
        offset += text.len() + 1;
    }
    None
}

/// Best-effort classification of the parser message into a hint.
fn classify(message: &str) -> &'static str {
    if message.contains("found: EOF") {
        "the statement looks incomplete"
    } else if message.contains("Unterminated") {
        "did you forget a closing quote?"
    } else if message.contains("Expected: )") {
        "did you forget a comma or a closing parenthesis?"
    } else if message.contains("Expected: an expression") {
        "a value or column is missing near the reported position"
    } else if message.contains("Expected: ,") {
        "did you forget a comma?"
    } else {
        "check the statement near the reported position"
    }
}
