//! Session storage location.

use std::{env, path::PathBuf};

/// Where the durable session file lives
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub storage_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let storage_path = env::var("PIPELINE_SESSION_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_storage_path);

        Self { storage_path }
    }
}

fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join("deal-pipeline")
        .join("session.json")
}
