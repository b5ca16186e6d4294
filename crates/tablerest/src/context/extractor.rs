//! Context middleware and axum extractor for RequestContext.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tablerest_core::{Context, RequestId};
use uuid::Uuid;

use super::types::{ContextSettings, RequestContext};

fn extract_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(RequestId::from_uuid)
        .unwrap_or_else(RequestId::new)
}

fn extract_identity(settings: &ContextSettings, headers: &HeaderMap) -> Option<String> {
    if let Some(dev) = &settings.dev_identity {
        return Some(dev.clone());
    }
    headers
        .get(&settings.identity_header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Builds the context for one request.
pub(crate) fn build_context(settings: &ContextSettings, headers: &HeaderMap) -> Context {
    let ctx = Context::new()
        .with_request_id(extract_request_id(headers))
        .with_timeout(settings.request_timeout);

    match extract_identity(settings, headers) {
        Some(identity) => ctx.with_identity(identity),
        None => ctx,
    }
}

/// Middleware attaching a [`Context`] to every request.
pub async fn attach_context(
    State(settings): State<ContextSettings>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = build_context(&settings, request.headers());
    tracing::trace!(
        request_id = %ctx.request_id(),
        identity = ctx.identity().unwrap_or("-"),
        "Attached request context"
    );
    request.extensions_mut().insert(ctx);
    next.run(request).await
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<Context>()
            .cloned()
            .unwrap_or_else(|| Context::new().with_request_id(extract_request_id(&parts.headers)));
        Ok(RequestContext(ctx))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderName;

    use super::*;

    fn settings() -> ContextSettings {
        ContextSettings {
            identity_header: HeaderName::from_static("x-user-id"),
            dev_identity: None,
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_extract_request_id_from_header() {
        let mut headers = HeaderMap::new();
        let id = "550e8400-e29b-41d4-a716-446655440000";
        headers.insert("x-request-id", id.parse().unwrap());

        let request_id = extract_request_id(&headers);
        assert_eq!(request_id.to_string(), id);
    }

    #[test]
    fn test_extract_request_id_generates_when_invalid() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", "not-a-uuid".parse().unwrap());

        let request_id = extract_request_id(&headers);

        Uuid::parse_str(&request_id.to_string()).expect("Should be valid UUID");
    }

    #[test]
    fn test_identity_from_configured_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", "user-42".parse().unwrap());

        let ctx = build_context(&settings(), &headers);

        assert_eq!(ctx.identity(), Some("user-42"));
        assert!(ctx.deadline().is_some());
    }

    #[test]
    fn test_blank_identity_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", "  ".parse().unwrap());

        assert_eq!(build_context(&settings(), &headers).identity(), None);
    }

    #[test]
    fn test_dev_identity_overrides_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", "user-42".parse().unwrap());
        let settings = ContextSettings {
            dev_identity: Some("dev".to_string()),
            ..settings()
        };

        assert_eq!(build_context(&settings, &headers).identity(), Some("dev"));
    }

    #[tokio::test]
    async fn test_extractor_falls_back_without_middleware() {
        let request = axum::http::Request::builder()
            .header("x-request-id", "550e8400-e29b-41d4-a716-446655440000")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let RequestContext(ctx) = RequestContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(
            ctx.request_id().to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(ctx.identity(), None);
    }
}
