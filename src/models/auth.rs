//! Authentication-related data models.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Coarse permission tag attached to a session and to guarded screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::User, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Request model for user login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response model for a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub role: Role,
}

/// The three session fields, always stored and cleared together.
///
/// The refresh token is kept but nothing in this crate ever renews with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
    pub role: Role,
}

impl From<LoginResponse> for Credential {
    fn from(res: LoginResponse) -> Self {
        Self {
            access_token: res.access_token,
            refresh_token: res.refresh_token,
            role: res.role,
        }
    }
}

/// Error body returned by the API on failures
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_login_response_camel_case() {
        let res: LoginResponse = serde_json::from_str(
            r#"{"accessToken":"a1","refreshToken":"r1","role":"ADMIN"}"#,
        )
        .unwrap();
        let credential = Credential::from(res);
        assert_eq!(credential.access_token, "a1");
        assert_eq!(credential.refresh_token, "r1");
        assert_eq!(credential.role, Role::Admin);
    }
}
