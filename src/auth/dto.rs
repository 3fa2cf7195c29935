use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::claims::TokenPayload;

pub const REGISTER_SUCCESS: &str = "Register Success";
pub const LOGOUT_SUCCESS: &str = "Logout Success";
pub const DEFAULT_ROLE: &str = "user";

/// Tokens issued by a successful login.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for logout and token refresh.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: &str) -> Self {
        Self { msg: msg.to_owned() }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

/// Identity of the bearer of an access token.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<TokenPayload> for MeResponse {
    fn from(p: TokenPayload) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            role: p.role,
        }
    }
}
