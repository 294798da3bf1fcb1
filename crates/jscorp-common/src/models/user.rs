//! Login accounts and the auth exchange bodies.

use serde::{Deserialize, Serialize};

/// Username of the built-in administrator; only it may manage other accounts.
pub const ADMIN_USERNAME: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub is_active: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub role: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.username == ADMIN_USERNAME
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login body. `access_token` is optional so that a 2xx response
/// without one can be reported rather than failing deserialization.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SetPasswordRequest {
    pub new_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PasswordResetRequest {
    pub username: String,
}

/// The backend only returns a token when it cannot deliver it by email.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PasswordResetResponse {
    #[serde(default)]
    pub token: Option<String>,
}
