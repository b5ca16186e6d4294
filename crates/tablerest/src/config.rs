use std::{env, time::Duration};

use axum::http::HeaderName;

use crate::context::ContextSettings;
use crate::rest::CorsConfig;
use crate::storage::DEFAULT_PAGE_SIZE;

/// Extra time the outer timeout layer allows past the request deadline.
pub const TIMEOUT_GRACE: Duration = Duration::from_secs(1);

/// DynamoDB connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoDbConfig {
    /// Table shared by every resource kind (default: "tablerest")
    pub table_name: String,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Endpoint override for DynamoDB Local or LocalStack
    pub endpoint_url: Option<String>,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub dynamodb: DynamoDbConfig,
    /// Allowed CORS origins; empty allows any origin
    pub cors_allowed_origins: Vec<String>,
    /// Header carrying the caller identity (default: "x-user-id")
    pub identity_header: String,
    /// Identity forced on every request, for local development
    pub dev_id: Option<String>,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
    /// Page size for list requests without a limit (default: 10)
    pub default_page_size: i32,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNAMODB_TABLE_NAME` - Table name (default: "tablerest")
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `AWS_ENDPOINT_URL` - Optional endpoint override
    /// - `CORS_ALLOWED_ORIGINS` - Comma-separated origins (default: any)
    /// - `IDENTITY_HEADER` - Identity header name (default: "x-user-id")
    /// - `DEV_ID` - Optional identity override
    /// - `REQUEST_TIMEOUT_SECONDS` - Request timeout (default: 10)
    /// - `DEFAULT_PAGE_SIZE` - List page size (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value if set.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            dynamodb: DynamoDbConfig {
                table_name: non_empty("DYNAMODB_TABLE_NAME")
                    .unwrap_or_else(|| "tablerest".to_string()),
                region: non_empty("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                endpoint_url: non_empty("AWS_ENDPOINT_URL"),
            },
            cors_allowed_origins: non_empty("CORS_ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            identity_header: non_empty("IDENTITY_HEADER")
                .unwrap_or_else(|| "x-user-id".to_string()),
            dev_id: non_empty("DEV_ID"),
            request_timeout_seconds: non_empty("REQUEST_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(10),
            default_page_size: non_empty("DEFAULT_PAGE_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Get the request timeout as a Duration.
    ///
    /// This is the deadline every store call runs under.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Budget of the outer timeout layer.
    ///
    /// Always longer than [`Config::request_timeout`], so a stalled store call
    /// fails through its own deadline first.
    pub fn server_timeout(&self) -> Duration {
        self.request_timeout() + TIMEOUT_GRACE
    }

    pub fn cors(&self) -> CorsConfig {
        CorsConfig::with_origins(self.cors_allowed_origins.iter().cloned())
    }

    /// Settings for the context middleware.
    ///
    /// An invalid identity header name falls back to `x-user-id`.
    pub fn context_settings(&self) -> ContextSettings {
        let identity_header = HeaderName::try_from(self.identity_header.to_ascii_lowercase())
            .unwrap_or_else(|_| {
                tracing::warn!(
                    header = %self.identity_header,
                    "Invalid identity header name, using x-user-id"
                );
                HeaderName::from_static("x-user-id")
            });

        ContextSettings {
            identity_header,
            dev_identity: self.dev_id.clone(),
            request_timeout: self.request_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
