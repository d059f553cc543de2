//! Session store: the single owner of the stored credential.
//!
//! All reads and writes of the three session keys go through [`SessionStore`].
//! "Logged in" is derived from the presence of an access token; nothing here
//! checks token integrity or expiry.

use crate::{
    errors::StorageError,
    models::{Credential, Role},
    services::storage::{KeyValueStore, MemoryStore},
};
use std::sync::Arc;
use tracing::{debug, warn};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const ROLE_KEY: &str = "role";

const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, ROLE_KEY];

/// Shared handle to the current session. Clones see the same storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Session held only in process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Replace any existing session with `credential`
    pub fn set_session(&self, credential: &Credential) -> Result<(), StorageError> {
        self.storage.set_many(&[
            (ACCESS_TOKEN_KEY, credential.access_token.as_str()),
            (REFRESH_TOKEN_KEY, credential.refresh_token.as_str()),
            (ROLE_KEY, credential.role.as_str()),
        ])?;
        debug!(role = %credential.role, "session stored");
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY).filter(|token| !token.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Stored role, or `None` if absent or unrecognised
    pub fn role(&self) -> Option<Role> {
        let raw = self.read(ROLE_KEY)?;
        match raw.parse() {
            Ok(role) => Some(role),
            Err(e) => {
                warn!(error = %e, "ignoring unrecognised stored role");
                None
            }
        }
    }

    /// Full credential when all three fields are present
    pub fn credential(&self) -> Option<Credential> {
        Some(Credential {
            access_token: self.access_token()?,
            refresh_token: self.refresh_token()?,
            role: self.role()?,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.access_token().is_some()
    }

    /// Remove every session field. Clearing an empty session is a no-op.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove_many(&SESSION_KEYS)?;
        debug!("session cleared");
        Ok(())
    }

    // Reads never fail outward; a broken store looks like no session.
    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "session storage read failed");
                None
            }
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.is_logged_in())
            .field("role", &self.role())
            .finish()
    }
}
