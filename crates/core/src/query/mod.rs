//! Query options codec.
//!
//! Turns the flat, string-encoded list parameters of a request (`filter=field:value`,
//! `sort=field:direction`, `limit`, `offset`) into a structured [`QueryOptions`].

mod error;
mod options;

pub use error::ParseError;
pub use options::{Pagination, QueryOptions, SortDirection};
