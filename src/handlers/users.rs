//! Admin user management screens.

use crate::{
    errors::PipelineError,
    handlers::AppContext,
    models::{NewUser, Screen, User},
    services::{ListView, RefreshOutcome},
};
use tracing::{error, info};

pub const USER_COLUMNS: &[&str] = &["username", "email", "role", "status", "actions"];

pub struct UserManagementScreen {
    ctx: AppContext,
    view: ListView<User>,
}

impl UserManagementScreen {
    pub fn open(ctx: AppContext) -> Result<Self, PipelineError> {
        ctx.enter(Screen::UserManagement)?;
        let view = ListView::new(ctx.config.pagination.users_page_size);
        Ok(Self { ctx, view })
    }

    pub fn view(&self) -> &ListView<User> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView<User> {
        &mut self.view
    }

    pub async fn reload(&mut self) -> RefreshOutcome {
        let ticket = self.view.begin_refresh();
        let result = self.ctx.users().list().await;
        self.view.apply_refresh(ticket, result)
    }

    /// Flip a user's active flag, then reload after the update has completed.
    ///
    /// Returns `Ok(None)` when `id` is not in the loaded list.
    pub async fn toggle(&mut self, id: &str) -> Result<Option<RefreshOutcome>, PipelineError> {
        self.ctx.require_admin()?;
        let Some(user) = self.view.items().iter().find(|u| u.id == id) else {
            return Ok(None);
        };
        let active = !user.active;

        if let Err(e) = self.ctx.users().update_status(id, active).await {
            error!(user_id = id, error = %e, "status update failed");
            return Err(e.into());
        }
        info!(user_id = id, active, "user status updated");
        Ok(Some(self.reload().await))
    }

    pub fn new_user(&self) -> Result<(), PipelineError> {
        self.ctx.enter(Screen::UserNew)
    }
}

pub struct UserFormScreen {
    ctx: AppContext,
}

impl UserFormScreen {
    pub fn open(ctx: AppContext) -> Result<Self, PipelineError> {
        ctx.enter(Screen::UserNew)?;
        Ok(Self { ctx })
    }

    /// Create the user and return to user management
    pub async fn submit(&self, user: &NewUser) -> Result<(), PipelineError> {
        user.validate()?;
        self.ctx
            .users()
            .create(user)
            .await
            .inspect_err(|e| error!(username = %user.username, error = %e, "user creation failed"))?;
        info!(username = %user.username, role = %user.role, "user created");
        self.ctx.navigate(Screen::UserManagement);
        Ok(())
    }
}
