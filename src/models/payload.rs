//! Request bodies for deal mutations.
//!
//! The deal create/update body has two shapes: one carrying `dealValue` for
//! ADMIN sessions and one that has no such key at all for everyone else. A USER
//! update therefore can never overwrite a value an admin has set.

use crate::{
    errors::ValidationError,
    models::{DealStage, Role},
    utils::validation,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fields every role may submit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealFields {
    pub client_name: String,
    pub sector: String,
    pub deal_type: String,
    pub summary: String,
}

/// Fields an ADMIN submits: the common set plus the deal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealFieldsWithValue {
    #[serde(flatten)]
    pub fields: DealFields,
    pub deal_value: Option<i64>,
}

/// Body of `POST /deals` and `PUT /deals/{id}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DealPayload {
    WithValue(DealFieldsWithValue),
    WithoutValue(DealFields),
}

impl DealPayload {
    pub fn fields(&self) -> &DealFields {
        match self {
            DealPayload::WithValue(with_value) => &with_value.fields,
            DealPayload::WithoutValue(fields) => fields,
        }
    }

    pub fn deal_value(&self) -> Option<i64> {
        match self {
            DealPayload::WithValue(with_value) => with_value.deal_value,
            DealPayload::WithoutValue(_) => None,
        }
    }
}

/// Form input for creating or editing a deal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealDraft {
    pub client_name: String,
    pub sector: String,
    pub deal_type: String,
    pub summary: String,
    pub deal_value: Option<i64>,
}

impl DealDraft {
    pub fn new(
        client_name: impl Into<String>,
        sector: impl Into<String>,
        deal_type: impl Into<String>,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            sector: sector.into(),
            deal_type: deal_type.into(),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.deal_value = Some(value);
        self
    }

    /// Validate the draft and shape it for `role`
    pub fn into_payload(self, role: Role) -> Result<DealPayload, ValidationError> {
        validation::require("client name", &self.client_name)?;
        validation::require("sector", &self.sector)?;
        validation::require("deal type", &self.deal_type)?;
        if matches!(self.deal_value, Some(v) if v < 0) && role.is_admin() {
            return Err(ValidationError::NegativeValue);
        }

        let fields = DealFields {
            client_name: self.client_name,
            sector: self.sector,
            deal_type: self.deal_type,
            summary: self.summary,
        };

        Ok(match role {
            Role::Admin => DealPayload::WithValue(DealFieldsWithValue {
                fields,
                deal_value: self.deal_value,
            }),
            Role::User => {
                if self.deal_value.is_some() {
                    debug!("dropping deal value from non-admin payload");
                }
                DealPayload::WithoutValue(fields)
            }
        })
    }
}

/// Body of `PATCH /deals/{id}/stage`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StageUpdate {
    pub stage: DealStage,
}

/// Body of `POST /deals/{id}/notes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

/// Body of `PATCH /deals/{id}/value`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValueUpdate {
    pub value: i64,
}
