//! Top-level error kinds seen by the REST layer.

use thiserror::Error;

use crate::query::ParseError;
use crate::storage::StoreError;

/// Every failure a REST handle can observe, before it is mapped to a status code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed filter/sort/pagination parameters.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Malformed request body or path parameter.
    #[error("Decode error: {0}")]
    Decode(String),
    /// A point lookup found nothing.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// True for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Parse(_) | Error::Decode(_))
    }
}

/// Result type for REST-facing operations.
pub type Result<T> = std::result::Result<T, Error>;
