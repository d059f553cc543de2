//! Admin-managed user accounts.

use crate::{errors::ValidationError, models::Role, utils::validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A user account as listed on the user management screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn status(&self) -> UserStatus {
        if self.active {
            UserStatus::Active
        } else {
            UserStatus::Inactive
        }
    }
}

/// Filter code for the `active` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
        }
    }
}

impl FromStr for UserStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(UserStatus::Active),
            "INACTIVE" => Ok(UserStatus::Inactive),
            other => Err(ValidationError::UnknownValue {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Request body for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role: Role::User,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Check the form invariants before anything is sent
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::require("username", &self.username)?;
        validation::require("email", &self.email)?;
        validation::require_email(&self.email)?;
        validation::require("password", &self.password)?;
        Ok(())
    }
}

/// Request body for toggling a user's `active` flag
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub active: bool,
}
