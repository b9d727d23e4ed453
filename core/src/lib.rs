//! Translate a single SQL statement into an equivalent PostgREST request.
//!
//! One SQL text goes in; [`process`] lowers it to a typed [`ast::Statement`];
//! the renderers turn that statement into an [`render::HttpRequest`] or into
//! request text.
//!
//! ```ignore
//! use sqlrest_core::prelude::*;
//!
//! let statement = process("select title, author from books where id = 1")?;
//! let request = render_http(&statement)?;
//! assert_eq!(request.full_path(), "/books?select=title,author&id=eq.1");
//! ```

pub mod ast;
pub mod error;
pub mod processor;
pub mod render;

pub use error::{Error, Result};
pub use processor::process;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::error::{Error, Result};
    pub use crate::processor::process;
    pub use crate::render::{HttpRequest, Method, Params, format_curl, format_http, render_http};
}
