//! Login screen and logout.

use crate::{
    errors::PipelineError,
    handlers::AppContext,
    models::{LoginRequest, Role, Screen},
    services::login_failure_message,
};
use tracing::info;

pub struct LoginScreen {
    ctx: AppContext,
    loading: bool,
    error: Option<String>,
}

impl LoginScreen {
    pub fn open(ctx: AppContext) -> Result<Self, PipelineError> {
        ctx.enter(Screen::Login)?;
        Ok(Self {
            ctx,
            loading: false,
            error: None,
        })
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message from the last failed attempt
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Log in and land on the role's home screen.
    ///
    /// Blank fields fail validation without a request and without setting an
    /// error message.
    pub async fn submit(&mut self, username: &str, password: &str) -> Result<Role, PipelineError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        self.loading = true;
        self.error = None;
        let result = self.ctx.auth().login(&request).await;
        self.loading = false;

        match result {
            Ok(role) => {
                info!(role = %role, "logged in");
                self.ctx.navigate(Screen::landing_for(role));
                Ok(role)
            }
            Err(e @ PipelineError::ValidationFailed(_)) => Err(e),
            Err(e) => {
                self.error = Some(login_failure_message(&e));
                Err(e)
            }
        }
    }
}

/// Clear the session and return to the login screen
pub fn logout(ctx: &AppContext) -> Result<(), PipelineError> {
    ctx.auth().logout()?;
    ctx.navigate(Screen::Login);
    Ok(())
}
