//! Response types shared by every handle.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tablerest_core::storage::error_to_status_code;
use tablerest_core::Error;

/// Content type of every successful response body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A failed handle call.
///
/// The client only sees `message`, a fixed plain-text string per operation.
/// The underlying error picks the status code and is logged.
#[derive(Debug)]
pub struct ApiError {
    error: Error,
    message: &'static str,
}

impl ApiError {
    pub fn new(error: impl Into<Error>, message: &'static str) -> Self {
        Self {
            error: error.into(),
            message,
        }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(error_to_status_code(&self.error))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.error, "API error");
        } else if self.error.is_client_error() {
            tracing::debug!(status = %status, error = %self.error, "Rejected request");
        } else {
            tracing::warn!(status = %status, error = %self.error, "API error");
        }

        (status, self.message).into_response()
    }
}

/// JSON body with an explicit status code.
///
/// Serialized with `serde_json`, which never escapes HTML characters.
#[derive(Debug, Clone)]
pub struct JsonResponse<T> {
    status: StatusCode,
    body: T,
}

impl<T> JsonResponse<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn created(body: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.body) {
            Ok(bytes) => (
                self.status,
                [(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(JSON_CONTENT_TYPE),
                )],
                bytes,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(error = %err, "Unable to encode response");
                (StatusCode::INTERNAL_SERVER_ERROR, "unable to encode response").into_response()
            }
        }
    }
}
