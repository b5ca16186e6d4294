//! Pure types for request-scoped context.

use std::time::Duration;

use axum::http::HeaderName;
use tablerest_core::Context;

/// Request-scoped context available to all handles.
#[derive(Debug, Clone, Default)]
pub struct RequestContext(pub Context);

/// How the context middleware derives a [`Context`] from a request.
#[derive(Debug, Clone)]
pub struct ContextSettings {
    /// Header carrying the caller identity.
    pub identity_header: HeaderName,
    /// Identity used for every request when set, whatever the header says.
    pub dev_identity: Option<String>,
    /// Budget given to each request's store calls.
    pub request_timeout: Duration,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            identity_header: HeaderName::from_static("x-user-id"),
            dev_identity: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}
