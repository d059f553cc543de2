//! Admin user-management endpoints.

use crate::{
    errors::ApiError,
    models::{NewUser, StatusUpdate, User},
    services::api_client::ApiClient,
};
use reqwest::Method;

#[derive(Clone)]
pub struct UserService {
    api: ApiClient,
}

impl UserService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.api.get_json("list_users", &["admin", "users"]).await
    }

    pub async fn create(&self, user: &NewUser) -> Result<(), ApiError> {
        self.api
            .send_empty("create_user", Method::POST, &["admin", "users"], Some(user))
            .await
    }

    pub async fn update_status(&self, id: &str, active: bool) -> Result<(), ApiError> {
        self.api
            .send_empty(
                "update_user_status",
                Method::PUT,
                &["admin", "users", id, "status"],
                Some(&StatusUpdate { active }),
            )
            .await
    }
}
