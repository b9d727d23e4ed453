//! The renderer-agnostic statement IR.
//!
//! Every value here is built by a processor and consumed, unchanged, by a
//! renderer. Filters form a strict tree; negation is a flag on each node,
//! never a wrapper node.

mod filters;
mod statement;
mod targets;
mod values;

pub use filters::*;
pub use statement::*;
pub use targets::*;
pub use values::*;
