//! Login, logout and the current-user lookup.

use crate::{
    errors::{ApiError, PipelineError},
    models::{
        Credential, LoginRequest, LoginResponse, Role, SessionAuditEvent, SessionEventOutcome,
        SessionEventType, User,
    },
    services::{api_client::ApiClient, session::SessionStore},
    utils::validation,
};
use reqwest::Method;

/// Shown when a failed login carries no message of its own
pub const DEFAULT_LOGIN_FAILURE: &str = "Login failed";

#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }

    /// Authenticate and store the returned credential. Returns the session role.
    pub async fn login(&self, request: &LoginRequest) -> Result<Role, PipelineError> {
        validation::require("username", &request.username)?;
        validation::require("password", &request.password)?;

        let response: LoginResponse = match self
            .api
            .send_json("login", Method::POST, &["auth", "login"], request)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                SessionAuditEvent::new(SessionEventType::LoginFailure, SessionEventOutcome::Failure)
                    .with_username(Some(request.username.clone()))
                    .with_details(Some(e.to_string()))
                    .log();
                return Err(e.into());
            }
        };

        let credential = Credential::from(response);
        let role = credential.role;
        self.session().set_session(&credential)?;

        SessionAuditEvent::new(SessionEventType::LoginSuccess, SessionEventOutcome::Success)
            .with_username(Some(request.username.clone()))
            .with_role(Some(role))
            .log();

        Ok(role)
    }

    /// Drop the stored session
    pub fn logout(&self) -> Result<(), PipelineError> {
        let role = self.session().role();
        self.session().clear()?;
        SessionAuditEvent::new(SessionEventType::Logout, SessionEventOutcome::Success)
            .with_role(role)
            .log();
        Ok(())
    }

    /// `GET /users/me`
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.api.get_json("current_user", &["users", "me"]).await
    }
}

/// Message to show for a failed login
pub fn login_failure_message(error: &PipelineError) -> String {
    match error {
        PipelineError::RequestFailed(ApiError::Status { message: Some(message), .. }) => {
            message.clone()
        }
        _ => DEFAULT_LOGIN_FAILURE.to_string(),
    }
}
