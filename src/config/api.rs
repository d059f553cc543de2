//! API client configuration.
//!
//! Loaded from environment variables with defaults suitable for a local
//! development server.

use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Configuration for talking to the pipeline API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Origin every endpoint path is appended to
    pub base_url: String,

    /// Connection timeout (in seconds)
    pub connect_timeout_seconds: u64,

    /// Whole-request timeout (in seconds)
    pub request_timeout_seconds: u64,

    /// Log every request and response line
    pub enable_detailed_logging: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            connect_timeout_seconds: 3,
            request_timeout_seconds: 10,
            enable_detailed_logging: true,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let base_url = env::var("PIPELINE_API_URL")
            .ok()
            .map(|v| v.trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let connect_timeout_seconds = env::var("PIPELINE_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let request_timeout_seconds = env::var("PIPELINE_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let enable_detailed_logging = env::var("PIPELINE_DETAILED_LOGGING")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        Self {
            base_url,
            connect_timeout_seconds,
            request_timeout_seconds,
            enable_detailed_logging,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}
