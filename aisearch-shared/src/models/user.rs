//! Authentication request and response bodies.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Longest username the signup form accepts.
pub const MAX_USERNAME_LEN: usize = 100;

/// Body of `POST api/auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignupRequest {
    /// Email address used as the account name.
    pub username: String,
    /// Plain-text password; hashing is the backend's concern.
    pub password: String,
}

/// OAuth2 password form posted to `api/auth/login`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    /// Backend acknowledgement.
    pub message: String,
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Always `bearer`.
    pub token_type: String,
}

/// Response of `GET api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeResponse {
    /// Optional backend acknowledgement.
    #[serde(default)]
    pub message: Option<String>,
    /// Account id.
    pub id: i64,
    /// Account email.
    pub username: String,
    /// Whether the account may sign in.
    pub is_active: bool,
    /// Registration time.
    pub created_at: Timestamp,
}

/// Generic `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}
