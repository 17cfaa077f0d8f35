//! Authentication request/response models

use crate::db::models::User;
use serde::{Deserialize, Serialize};

/// Signup request
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account info returned to clients; never carries the password hash
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Response for signup and login: the account plus its session token
///
/// The token is also attached to the cookie carrier; it is repeated in the
/// body for non-browser clients that use the bearer-header fallback.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub account: AccountResponse,
    pub token: String,
}

/// Update account request; each field is independently optional
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response for account deletion
#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub workouts_removed: usize,
}
