//! Request-scoped context module.
//!
//! A middleware builds the core [`Context`](tablerest_core::Context) from
//! request metadata; handlers receive it through the [`RequestContext`]
//! extractor.

mod extractor;
mod types;

pub use extractor::attach_context;
pub use types::{ContextSettings, RequestContext};
