use thiserror::Error;

/// Errors returned by capability implementations.
///
/// Each variant names the operation that failed and the resource kind it ran
/// against. `reason` holds the underlying detail for logs; it is never shown
/// to HTTP clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("unable to fetch {kind}: {reason}")]
    Fetch { kind: &'static str, reason: String },
    #[error("unable to fetch all {kind}: {reason}")]
    FetchAll { kind: &'static str, reason: String },
    #[error("failed to insert {kind}: {reason}")]
    Insert { kind: &'static str, reason: String },
    #[error("failed to update {kind}: {reason}")]
    Update { kind: &'static str, reason: String },
    #[error("failed to delete {kind}: {reason}")]
    Delete { kind: &'static str, reason: String },
}

impl StoreError {
    /// The resource kind the failed operation targeted.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Fetch { kind, .. }
            | StoreError::FetchAll { kind, .. }
            | StoreError::Insert { kind, .. }
            | StoreError::Update { kind, .. }
            | StoreError::Delete { kind, .. } => kind,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            StoreError::Fetch { reason, .. }
            | StoreError::FetchAll { reason, .. }
            | StoreError::Insert { reason, .. }
            | StoreError::Update { reason, .. }
            | StoreError::Delete { reason, .. } => reason,
        }
    }
}

/// Result type for capability operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_display() {
        let error = StoreError::Fetch {
            kind: "item",
            reason: "connection reset".to_string(),
        };
        assert_eq!(error.to_string(), "unable to fetch item: connection reset");
    }

    #[test]
    fn test_fetch_all_display() {
        let error = StoreError::FetchAll {
            kind: "note",
            reason: "throughput exceeded".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "unable to fetch all note: throughput exceeded"
        );
    }

    #[test]
    fn test_insert_display() {
        let error = StoreError::Insert {
            kind: "item",
            reason: "missing field".to_string(),
        };
        assert_eq!(error.to_string(), "failed to insert item: missing field");
    }

    #[test]
    fn test_accessors() {
        let error = StoreError::Delete {
            kind: "note",
            reason: "deadline exceeded".to_string(),
        };
        assert_eq!(error.kind(), "note");
        assert_eq!(error.reason(), "deadline exceeded");
    }
}
