//! Screen access checks and navigation.
//!
//! Two composable predicates run before a screen renders: "is there a session"
//! and "does the session's role match". Each returns a boolean and redirects
//! through the [`Navigator`] only when it denies.

use crate::{
    errors::AccessDenied,
    models::{Guard, Role, Screen, SessionAuditEvent, SessionEventOutcome, SessionEventType},
    services::session::SessionStore,
};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Receives redirects issued by the gate and by screen controllers
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: Screen);
}

/// In-process navigator that remembers where the user is
#[derive(Debug, Clone)]
pub struct Router {
    history: Arc<Mutex<Vec<Screen>>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            history: Arc::new(Mutex::new(vec![Screen::Login])),
        }
    }

    /// Screen most recently navigated to
    pub fn current(&self) -> Screen {
        self.history
            .lock()
            .ok()
            .and_then(|history| history.last().cloned())
            .unwrap_or(Screen::Login)
    }

    pub fn history(&self) -> Vec<Screen> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

impl Navigator for Router {
    fn navigate(&self, target: Screen) {
        debug!(target = %target, "navigate");
        if let Ok(mut history) = self.history.lock() {
            history.push(target);
        }
    }
}

/// Runs the per-screen guards against the current session
#[derive(Debug, Clone)]
pub struct AccessGate {
    session: SessionStore,
}

impl AccessGate {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// Deny and redirect to login when there is no session
    pub fn check_authenticated(&self, navigator: &dyn Navigator) -> bool {
        if self.session.is_logged_in() {
            return true;
        }
        self.deny(AccessDenied::AuthenticationAbsent, None, navigator);
        false
    }

    /// Deny and redirect to the default authenticated screen when the
    /// session's role differs from `required`
    pub fn check_role(&self, required: Role, navigator: &dyn Navigator) -> bool {
        let actual = self.session.role();
        if actual == Some(required) {
            return true;
        }
        self.deny(AccessDenied::AuthorizationDenied { required, actual }, None, navigator);
        false
    }

    /// Run every guard `screen` declares, in order, stopping at the first denial.
    /// On success the navigator is moved to `screen`.
    pub fn enter(&self, screen: Screen, navigator: &dyn Navigator) -> Result<(), AccessDenied> {
        self.admit(&screen, navigator)?;
        navigator.navigate(screen);
        Ok(())
    }

    /// Same checks as [`AccessGate::enter`] without navigating on success
    pub fn admit(&self, screen: &Screen, navigator: &dyn Navigator) -> Result<(), AccessDenied> {
        for guard in screen.guards() {
            let denied = match guard {
                Guard::Authenticated if !self.session.is_logged_in() => {
                    Some(AccessDenied::AuthenticationAbsent)
                }
                Guard::RequireRole(required) => {
                    let actual = self.session.role();
                    (actual != Some(*required)).then_some(AccessDenied::AuthorizationDenied {
                        required: *required,
                        actual,
                    })
                }
                Guard::Authenticated => None,
            };

            if let Some(denied) = denied {
                self.deny(denied.clone(), Some(screen), navigator);
                return Err(denied);
            }
        }
        Ok(())
    }

    fn deny(&self, denied: AccessDenied, screen: Option<&Screen>, navigator: &dyn Navigator) {
        let target = denied.redirect_target();
        let mut event = SessionAuditEvent::new(SessionEventType::AccessDenied, SessionEventOutcome::Failure)
            .with_role(self.session.role())
            .with_redirect(&target)
            .with_details(Some(denied.to_string()));
        if let Some(screen) = screen {
            event = event.with_screen(screen);
        }
        event.log();
        navigator.navigate(target);
    }
}
