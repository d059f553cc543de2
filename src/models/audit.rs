//! Session audit events.

use crate::models::{Role, Screen};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Kinds of session events worth an audit line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEventType {
    LoginSuccess,
    LoginFailure,
    Logout,
    AccessDenied,
    UnauthorizedResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEventOutcome {
    Success,
    Failure,
}

/// Structured audit log entry for a session event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAuditEvent {
    pub event_type: SessionEventType,
    pub outcome: SessionEventOutcome,
    pub timestamp: DateTime<Utc>,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub screen: Option<String>,
    pub redirect: Option<String>,
    pub details: Option<String>,
}

impl SessionAuditEvent {
    pub fn new(event_type: SessionEventType, outcome: SessionEventOutcome) -> Self {
        Self {
            event_type,
            outcome,
            timestamp: Utc::now(),
            username: None,
            role: None,
            screen: None,
            redirect: None,
            details: None,
        }
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    pub fn with_role(mut self, role: Option<Role>) -> Self {
        self.role = role;
        self
    }

    pub fn with_screen(mut self, screen: &Screen) -> Self {
        self.screen = Some(screen.path());
        self
    }

    pub fn with_redirect(mut self, target: &Screen) -> Self {
        self.redirect = Some(target.path());
        self
    }

    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    /// Emit the event on the `session_audit` target
    pub fn log(&self) {
        info!(
            target: "session_audit",
            event_type = ?self.event_type,
            outcome = ?self.outcome,
            timestamp = %self.timestamp,
            username = ?self.username,
            role = ?self.role,
            screen = ?self.screen,
            redirect = ?self.redirect,
            details = ?self.details,
            "Session audit event"
        );
    }
}
