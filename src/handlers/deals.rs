//! Deal list, detail and form screens.

use crate::{
    errors::PipelineError,
    handlers::AppContext,
    models::{Deal, DealDraft, DealStage, Role, Screen},
    services::{ListView, RefreshOutcome},
};
use tracing::{error, info};

/// Table columns shown on the deal list
pub fn deal_columns(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => &["clientName", "sector", "dealType", "dealValue", "stage", "actions"],
        Role::User => &["clientName", "sector", "dealType", "stage"],
    }
}

pub struct DealListScreen {
    ctx: AppContext,
    role: Role,
    view: ListView<Deal>,
}

impl DealListScreen {
    pub fn open(ctx: AppContext) -> Result<Self, PipelineError> {
        ctx.enter(Screen::DealList)?;
        let role = ctx.require_role()?;
        let view = ListView::new(ctx.config.pagination.deals_page_size);
        Ok(Self { ctx, role, view })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn columns(&self) -> &'static [&'static str] {
        deal_columns(self.role)
    }

    pub fn view(&self) -> &ListView<Deal> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView<Deal> {
        &mut self.view
    }

    /// Fetch the full list. A failure leaves the list empty.
    pub async fn reload(&mut self) -> RefreshOutcome {
        let ticket = self.view.begin_refresh();
        let result = self.ctx.deals().list().await;
        self.view.apply_refresh(ticket, result)
    }

    /// Delete a deal (ADMIN only), then reload once the delete has completed
    pub async fn delete(&mut self, id: &str) -> Result<RefreshOutcome, PipelineError> {
        self.ctx.require_admin()?;
        if let Err(e) = self.ctx.deals().delete(id).await {
            error!(deal_id = id, error = %e, "delete failed");
            return Err(e.into());
        }
        info!(deal_id = id, "deal deleted");
        Ok(self.reload().await)
    }

    /// Change a deal's stage and swap in the server's copy
    pub async fn update_stage(&mut self, id: &str, stage: DealStage) -> Result<(), PipelineError> {
        let updated = match self.ctx.deals().update_stage(id, stage).await {
            Ok(deal) => deal,
            Err(e) => {
                error!(deal_id = id, stage = %stage, error = %e, "stage update failed");
                return Err(e.into());
            }
        };
        if let Some(slot) = self.view.items_mut().iter_mut().find(|d| d.id == updated.id) {
            *slot = updated;
        }
        Ok(())
    }

    pub fn open_detail(&self, id: &str) -> Result<(), PipelineError> {
        self.ctx.enter(Screen::DealDetail(id.to_string()))
    }
}

pub struct DealDetailScreen {
    ctx: AppContext,
    role: Role,
    id: String,
    deal: Option<Deal>,
}

impl DealDetailScreen {
    pub fn open(ctx: AppContext, id: impl Into<String>) -> Result<Self, PipelineError> {
        let id = id.into();
        ctx.enter(Screen::DealDetail(id.clone()))?;
        let role = ctx.require_role()?;
        Ok(Self {
            ctx,
            role,
            id,
            deal: None,
        })
    }

    pub fn deal(&self) -> Option<&Deal> {
        self.deal.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Stages offered by the stage picker, in display order
    pub fn stages(&self) -> &'static [DealStage] {
        &DealStage::ALL
    }

    pub async fn load(&mut self) -> Result<&Deal, PipelineError> {
        let deal = self.ctx.deals().get(&self.id).await?;
        Ok(self.deal.insert(deal))
    }

    /// Move to any stage. There is no invalid transition.
    pub async fn change_stage(&mut self, stage: DealStage) -> Result<&Deal, PipelineError> {
        let updated = self
            .ctx
            .deals()
            .update_stage(&self.id, stage)
            .await
            .inspect_err(|e| error!(deal_id = %self.id, stage = %stage, error = %e, "stage update failed"))?;
        Ok(self.deal.insert(updated))
    }

    /// Append a note. Blank text is ignored without a request (`Ok(false)`).
    pub async fn add_note(&mut self, text: &str) -> Result<bool, PipelineError> {
        if self.deal.is_none() || text.trim().is_empty() {
            return Ok(false);
        }
        let updated = self
            .ctx
            .deals()
            .add_note(&self.id, text)
            .await
            .inspect_err(|e| error!(deal_id = %self.id, error = %e, "adding note failed"))?;
        self.deal = Some(updated);
        Ok(true)
    }

    /// Set the deal value (ADMIN only)
    pub async fn update_value(&mut self, value: i64) -> Result<&Deal, PipelineError> {
        self.ctx.require_admin()?;
        if value < 0 {
            return Err(crate::errors::ValidationError::NegativeValue.into());
        }
        let updated = self
            .ctx
            .deals()
            .update_value(&self.id, value)
            .await
            .inspect_err(|e| error!(deal_id = %self.id, error = %e, "value update failed"))?;
        Ok(self.deal.insert(updated))
    }

    pub fn edit(&self) -> Result<(), PipelineError> {
        self.ctx.enter(Screen::DealEdit(self.id.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

pub struct DealFormScreen {
    ctx: AppContext,
    role: Role,
    mode: FormMode,
    pub draft: DealDraft,
}

impl DealFormScreen {
    pub fn open_new(ctx: AppContext) -> Result<Self, PipelineError> {
        ctx.enter(Screen::DealNew)?;
        let role = ctx.require_role()?;
        Ok(Self {
            ctx,
            role,
            mode: FormMode::Create,
            draft: DealDraft::default(),
        })
    }

    /// Open the edit form pre-filled from the server's copy
    pub async fn open_edit(ctx: AppContext, id: impl Into<String>) -> Result<Self, PipelineError> {
        let id = id.into();
        ctx.enter(Screen::DealEdit(id.clone()))?;
        let role = ctx.require_role()?;
        let deal = ctx.deals().get(&id).await?;
        let draft = DealDraft {
            client_name: deal.client_name,
            sector: deal.sector,
            deal_type: deal.deal_type,
            summary: deal.summary.unwrap_or_default(),
            deal_value: if role.is_admin() { deal.deal_value } else { None },
        };
        Ok(Self {
            ctx,
            role,
            mode: FormMode::Edit(id),
            draft,
        })
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Whether the form shows a deal value input at all
    pub fn has_value_field(&self) -> bool {
        self.role.is_admin()
    }

    /// Validate, send the role-shaped payload, and go back to the list
    pub async fn submit(&self) -> Result<Deal, PipelineError> {
        let payload = self.draft.clone().into_payload(self.role)?;
        let deals = self.ctx.deals();
        let result = match &self.mode {
            FormMode::Create => deals.create(&payload).await,
            FormMode::Edit(id) => deals.update_basic(id, &payload).await,
        };
        let deal = result.inspect_err(|e| error!(mode = ?self.mode, error = %e, "deal submit failed"))?;
        self.ctx.navigate(Screen::DealList);
        Ok(deal)
    }
}
