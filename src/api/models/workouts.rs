//! Workout request/response models

use crate::db::models::Workout;
use serde::{Deserialize, Serialize};

/// Create workout request
#[derive(Debug, Deserialize)]
pub struct CreateWorkoutRequest {
    pub title: String,
    pub notes: Option<String>,
    pub duration_min: Option<i64>,
    pub performed_at: Option<String>,
}

/// Update workout request; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateWorkoutRequest {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub duration_min: Option<i64>,
    pub performed_at: Option<String>,
}

/// Workout returned to clients
#[derive(Debug, Serialize)]
pub struct WorkoutResponse {
    pub id: String,
    pub title: String,
    pub notes: Option<String>,
    pub duration_min: Option<i64>,
    pub performed_at: Option<String>,
    pub created_at: String,
}

impl From<Workout> for WorkoutResponse {
    fn from(workout: Workout) -> Self {
        Self {
            id: workout.id,
            title: workout.title,
            notes: workout.notes,
            duration_min: workout.duration_min,
            performed_at: workout.performed_at,
            created_at: workout.created_at,
        }
    }
}
