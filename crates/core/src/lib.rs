//! Transport-free core of tablerest.
//!
//! - [`query`]: parsing of flat filter/sort/pagination parameters into [`query::QueryOptions`]
//! - [`storage`]: capability traits, resource key derivation and storage errors
//! - [`context`]: request-scoped [`context::Context`] threaded through every capability call
//! - [`error`]: the error kinds the REST layer maps to status codes

pub mod context;
pub mod error;
pub mod query;
pub mod storage;

pub use context::{Context, RequestId};
pub use error::Error;
