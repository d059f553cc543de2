//! Error types shared across the client.
//!
//! The umbrella [`PipelineError`] mirrors the four outcomes a screen action can
//! end in: no session, wrong role, local validation failure, or a failed request.

use crate::models::{Role, Screen};

/// Errors raised while talking to the pipeline API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Server returned status {status}")]
    Status {
        status: u16,
        /// `message` field of the server's error payload, if it carried one
        message: Option<String>,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// Get a user-facing message, preferring the server's own explanation
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NetworkError(_) => "Service temporarily unavailable due to network issues".to_string(),
            ApiError::Status { message: Some(message), .. } => message.clone(),
            ApiError::Status { status, message: None } => format!("Request failed with status {}", status),
            ApiError::Decode(_) => "Unexpected response from server".to_string(),
            ApiError::InvalidUrl(_) => "Invalid API address".to_string(),
            ApiError::SerializationError(_) => "Invalid request data".to_string(),
        }
    }

    /// HTTP status carried by the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Durable storage failures
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt storage file: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Local form invariants that block a submission before any request is made
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("Deal value must not be negative")]
    NegativeValue,

    #[error("Unknown {field}: '{value}'")]
    UnknownValue { field: &'static str, value: String },
}

/// Outcome of a failed gate check, with the screen the user was sent to
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("Not logged in")]
    AuthenticationAbsent,

    #[error("Role {actual:?} cannot open a screen that requires {required}")]
    AuthorizationDenied { required: Role, actual: Option<Role> },
}

impl AccessDenied {
    /// Screen the user is redirected to after this denial
    pub fn redirect_target(&self) -> Screen {
        match self {
            AccessDenied::AuthenticationAbsent => Screen::Login,
            AccessDenied::AuthorizationDenied { .. } => Screen::default_authenticated(),
        }
    }
}

/// Any failure a screen action can end in
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Authentication required")]
    AuthenticationAbsent,

    #[error("Requires role {required}")]
    AuthorizationDenied { required: Role, actual: Option<Role> },

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] ApiError),

    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl From<AccessDenied> for PipelineError {
    fn from(denied: AccessDenied) -> Self {
        match denied {
            AccessDenied::AuthenticationAbsent => PipelineError::AuthenticationAbsent,
            AccessDenied::AuthorizationDenied { required, actual } => {
                PipelineError::AuthorizationDenied { required, actual }
            }
        }
    }
}
