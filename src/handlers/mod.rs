//! Screen controllers.
//!
//! Each controller enters its screen through the [`AccessGate`] before doing
//! anything else, then drives the endpoint services. Reloads triggered by a
//! mutation are issued only after that mutation's round-trip has completed.

pub mod deals;
pub mod login;
pub mod users;

pub use deals::*;
pub use login::*;
pub use users::*;

use crate::{
    config::ClientConfig,
    errors::PipelineError,
    models::{Role, Screen},
    services::{
        AccessGate, ApiClient, ApiMetrics, AuthService, DealService, FileStore, Navigator,
        SessionStore, UserService,
    },
};
use std::sync::Arc;

/// Everything a screen needs, passed explicitly instead of read from globals
#[derive(Clone)]
pub struct AppContext {
    pub config: ClientConfig,
    pub session: SessionStore,
    pub gate: AccessGate,
    pub navigator: Arc<dyn Navigator>,
    pub api: ApiClient,
}

impl AppContext {
    pub fn new(
        config: ClientConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
        api: ApiClient,
    ) -> Self {
        Self {
            config,
            gate: AccessGate::new(session.clone()),
            session,
            navigator,
            api,
        }
    }

    /// Wire up a file-backed session and a network client from `config`
    pub fn from_config(
        config: ClientConfig,
        navigator: Arc<dyn Navigator>,
        metrics: Option<ApiMetrics>,
    ) -> Result<Self, PipelineError> {
        let store = FileStore::open(&config.session.storage_path)?;
        let session = SessionStore::new(Arc::new(store));
        let mut api = ApiClient::new(&config.api, session.clone())?;
        if let Some(metrics) = metrics {
            api = api.with_metrics(metrics);
        }
        Ok(Self::new(config, session, navigator, api))
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone())
    }

    pub fn deals(&self) -> DealService {
        DealService::new(self.api.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.api.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.session.role()
    }

    /// Run `screen`'s guards and navigate to it
    pub fn enter(&self, screen: Screen) -> Result<(), PipelineError> {
        self.gate.enter(screen, self.navigator.as_ref())?;
        Ok(())
    }

    pub fn navigate(&self, screen: Screen) {
        self.navigator.navigate(screen);
    }

    /// Role of the session, treating a missing one as unauthenticated
    pub(crate) fn require_role(&self) -> Result<Role, PipelineError> {
        self.role().ok_or(PipelineError::AuthenticationAbsent)
    }

    /// Fail without a request unless the session is ADMIN
    pub(crate) fn require_admin(&self) -> Result<(), PipelineError> {
        match self.role() {
            Some(Role::Admin) => Ok(()),
            actual => Err(PipelineError::AuthorizationDenied {
                required: Role::Admin,
                actual,
            }),
        }
    }
}
