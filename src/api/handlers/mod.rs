pub mod workouts;

pub use workouts::*;

use crate::auth::service::AccountService;
use crate::auth::token::TokenIssuer;
use crate::db::repository::WorkoutRepository;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub workout_repo: Arc<WorkoutRepository>,
    pub accounts: Arc<AccountService>,
    pub tokens: Arc<TokenIssuer>,
    /// Session lifetime in seconds, used for the cookie Max-Age
    pub token_ttl: u64,
}
