//! Error types for sqlrest.

use std::fmt;

use thiserror::Error;

/// Everything that can go wrong between SQL text and a rendered request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The SQL text was syntactically invalid.
    #[error("{0}")]
    Parsing(ParsingError),

    /// The SQL was valid but uses a construct outside the supported subset.
    #[error("{0}")]
    Unsupported(String),

    /// The SQL uses a construct in the intended subset that is not built yet.
    #[error("{0}")]
    Unimplemented(String),

    /// The statement is well-formed but the chosen renderer cannot express it.
    #[error("{0}")]
    Render(String),
}

/// Syntax error carrying the parser's cursor offset and a classified hint.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsingError {
    /// The parser's own message.
    pub message: String,
    /// Byte offset into the source, when the parser reported a location.
    pub cursor: Option<usize>,
    /// Human hint derived from the message.
    pub hint: String,
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cursor {
            Some(cursor) => write!(
                f,
                "syntax error at position {}: {} ({})",
                cursor, self.message, self.hint
            ),
            None => write!(f, "syntax error: {} ({})", self.message, self.hint),
        }
    }
}

impl Error {
    /// Create a parsing error from the parser's message.
    pub fn parsing(
        message: impl Into<String>,
        cursor: Option<usize>,
        hint: impl Into<String>,
    ) -> Self {
        Self::Parsing(ParsingError {
            message: message.into(),
            cursor,
            hint: hint.into(),
        })
    }

    /// Create an unsupported-construct error. The message names the construct.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Create a not-yet-implemented error.
    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self::Unimplemented(message.into())
    }

    /// Create a renderer-limitation error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }
}

/// Result type alias for sqlrest operations.
pub type Result<T> = std::result::Result<T, Error>;
