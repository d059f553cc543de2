//! Configuration structures and loading utilities.
//!
//! Each concern has its own struct with a `Default` and a `from_env()`
//! constructor reading `PIPELINE_*` variables.

pub mod api;
pub mod pagination;
pub mod session;

pub use api::*;
pub use pagination::*;
pub use session::*;

/// Combined client configuration
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub pagination: PaginationConfig,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            session: SessionConfig::from_env(),
            pagination: PaginationConfig::from_env(),
        }
    }
}

// Serialises tests that modify environment variables
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
