//! Database models
//!
//! Data structures representing database tables. These are internal records;
//! API-facing shapes live in the request/response models and never carry the
//! password hash.

/// User record in the database
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: String,
}

/// Workout record in the database
#[derive(Debug, Clone)]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub notes: Option<String>,
    pub duration_min: Option<i64>,
    pub performed_at: Option<String>,
    pub created_at: String,
}
