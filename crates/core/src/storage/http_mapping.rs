//! Pure functions for mapping errors to HTTP status codes.

use crate::Error;

/// Maps an [`Error`] to an HTTP status code.
///
/// - `Parse` -> 400 (Bad Request)
/// - `Decode` -> 400 (Bad Request)
/// - `NotFound` -> 404 (Not Found)
/// - `Store` -> 500 (Internal Server Error)
///
/// No other status codes are produced. Store failures are not split by cause;
/// a timeout and a malformed stored record both surface as 500.
///
/// # Examples
///
/// ```
/// use tablerest_core::storage::error_to_status_code;
/// use tablerest_core::Error;
///
/// let error = Error::Decode("expected value at line 1".to_string());
/// assert_eq!(error_to_status_code(&error), 400);
/// ```
pub fn error_to_status_code(error: &Error) -> u16 {
    match error {
        Error::Parse(_) => 400,
        Error::Decode(_) => 400,
        Error::NotFound { .. } => 404,
        Error::Store(_) => 500,
    }
}
