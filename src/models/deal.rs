//! Deal records as returned by the API.

use crate::{
    errors::ValidationError,
    models::{DealStage, Role},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note attached to a deal. Notes are never edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealNote {
    pub user_id: String,
    pub note: String,
    pub timestamp: DateTime<Utc>,
}

/// A deal moving through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub deal_type: String,
    #[serde(default)]
    pub summary: Option<String>,
    /// Only ever populated for ADMIN sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_value: Option<i64>,
    pub current_stage: DealStage,
    #[serde(default)]
    notes: Vec<DealNote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    /// Create a fresh deal in the `Prospect` stage
    pub fn new(
        id: impl Into<String>,
        client_name: impl Into<String>,
        sector: impl Into<String>,
        deal_type: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            client_name: client_name.into(),
            sector: sector.into(),
            deal_type: deal_type.into(),
            summary: None,
            deal_value: None,
            current_stage: DealStage::Prospect,
            notes: Vec::new(),
            created_by: None,
            assigned_to: None,
            created_at: at,
            updated_at: at,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.deal_value = Some(value);
        self
    }

    /// Notes in insertion order
    pub fn notes(&self) -> &[DealNote] {
        &self.notes
    }

    /// Set the current stage. Only `current_stage` and `updated_at` change.
    pub fn move_to_stage(&mut self, stage: DealStage, at: DateTime<Utc>) -> DealStage {
        let previous = self.current_stage;
        self.current_stage = previous.transition_to(stage);
        self.updated_at = at;
        previous
    }

    /// Append a note authored by `author`
    pub fn append_note(
        &mut self,
        author: impl Into<String>,
        text: &str,
        at: DateTime<Utc>,
    ) -> Result<&DealNote, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::Required("note"));
        }
        self.notes.push(DealNote {
            user_id: author.into(),
            note: text.to_string(),
            timestamp: at,
        });
        self.updated_at = at;
        Ok(&self.notes[self.notes.len() - 1])
    }

    /// Deal value as the given role may see it
    pub fn visible_value(&self, role: Role) -> Option<i64> {
        if role.is_admin() { self.deal_value } else { None }
    }
}
