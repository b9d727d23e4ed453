//! Renderers lowering the statement IR to transport-facing artifacts.
//!
//! No renderer ever sees a raw parse tree; the IR is the only input.

mod encode;
mod filter;
mod format;
mod http;

#[cfg(test)]
mod tests;

pub use format::{format_curl, format_http};
pub use http::{HttpRequest, Method, Params, render_http};
