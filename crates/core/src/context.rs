//! Request-scoped context threaded through every capability call.

use std::time::{Duration, Instant};

use uuid::Uuid;

/// Unique identifier for a request, used for tracing and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request values every capability call receives.
///
/// The caller identity is an opaque string extracted upstream; nothing in the
/// core validates or interprets it. The deadline, when set, bounds every store
/// operation performed on behalf of the request.
#[derive(Debug, Clone, Default)]
pub struct Context {
    request_id: RequestId,
    identity: Option<String>,
    deadline: Option<Instant>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the deadline to `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, saturating at zero. `None` without a deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|r| r.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context_is_anonymous_without_deadline() {
        let ctx = Context::new();

        assert_eq!(ctx.identity(), None);
        assert_eq!(ctx.deadline(), None);
        assert_eq!(ctx.remaining(), None);
        assert!(!ctx.is_expired());
    }

    #[test]
    fn test_identity_is_carried_verbatim() {
        let ctx = Context::new().with_identity("  user|123  ");
        assert_eq!(ctx.identity(), Some("  user|123  "));
    }

    #[test]
    fn test_expired_deadline() {
        let past = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);
        let ctx = Context::new().with_deadline(past);

        assert!(ctx.is_expired());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_future_deadline() {
        let ctx = Context::new().with_timeout(Duration::from_secs(60));

        assert!(!ctx.is_expired());
        assert!(ctx.remaining().unwrap() > Duration::from_secs(50));
    }

    #[test]
    fn test_request_id_round_trips_uuid() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let ctx = Context::new().with_request_id(RequestId::from_uuid(uuid));

        assert_eq!(
            ctx.request_id().to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
    }
}
