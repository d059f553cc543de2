//! Deal endpoints.

use crate::{
    errors::ApiError,
    models::{Deal, DealPayload, DealStage, NoteRequest, StageUpdate, ValueUpdate},
    services::api_client::ApiClient,
};
use reqwest::Method;

#[derive(Clone)]
pub struct DealService {
    api: ApiClient,
}

impl DealService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Deal>, ApiError> {
        self.api.get_json("list_deals", &["deals"]).await
    }

    pub async fn get(&self, id: &str) -> Result<Deal, ApiError> {
        self.api.get_json("get_deal", &["deals", id]).await
    }

    pub async fn create(&self, payload: &DealPayload) -> Result<Deal, ApiError> {
        self.api
            .send_json("create_deal", Method::POST, &["deals"], payload)
            .await
    }

    /// Update the descriptive fields (and the value, for admin payloads)
    pub async fn update_basic(&self, id: &str, payload: &DealPayload) -> Result<Deal, ApiError> {
        self.api
            .send_json("update_deal", Method::PUT, &["deals", id], payload)
            .await
    }

    pub async fn update_stage(&self, id: &str, stage: DealStage) -> Result<Deal, ApiError> {
        self.api
            .send_json("update_stage", Method::PATCH, &["deals", id, "stage"], &StageUpdate { stage })
            .await
    }

    pub async fn add_note(&self, id: &str, note: &str) -> Result<Deal, ApiError> {
        let body = NoteRequest { note: note.to_string() };
        self.api
            .send_json("add_note", Method::POST, &["deals", id, "notes"], &body)
            .await
    }

    pub async fn update_value(&self, id: &str, value: i64) -> Result<Deal, ApiError> {
        self.api
            .send_json("update_value", Method::PATCH, &["deals", id, "value"], &ValueUpdate { value })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.api
            .send_empty("delete_deal", Method::DELETE, &["deals", id], None::<&()>)
            .await
    }
}
