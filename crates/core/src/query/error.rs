use thiserror::Error;

/// Errors produced while parsing list query parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid filter: {token}")]
    InvalidFilter { token: String },
    #[error("invalid sort: {token}")]
    InvalidSort { token: String },
}

impl ParseError {
    /// Short, stable description of what was wrong.
    pub fn reason(&self) -> &'static str {
        match self {
            ParseError::InvalidFilter { .. } => "invalid filter",
            ParseError::InvalidSort { .. } => "invalid sort",
        }
    }

    /// The offending token, exactly as received.
    pub fn token(&self) -> &str {
        match self {
            ParseError::InvalidFilter { token } | ParseError::InvalidSort { token } => token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_display() {
        let error = ParseError::InvalidFilter {
            token: "a:b:c".to_string(),
        };
        assert_eq!(error.to_string(), "invalid filter: a:b:c");
        assert_eq!(error.reason(), "invalid filter");
        assert_eq!(error.token(), "a:b:c");
    }

    #[test]
    fn test_invalid_sort_display() {
        let error = ParseError::InvalidSort {
            token: "name".to_string(),
        };
        assert_eq!(error.to_string(), "invalid sort: name");
        assert_eq!(error.reason(), "invalid sort");
    }
}
