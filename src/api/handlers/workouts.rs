//! Workout API handlers
//!
//! CRUD over the authenticated account's workouts. Every operation is
//! scoped to the owner; a workout belonging to someone else is
//! indistinguishable from one that does not exist.

use crate::api::handlers::AppState;
use crate::api::models::{CreateWorkoutRequest, UpdateWorkoutRequest, WorkoutResponse};
use crate::auth::middleware::CurrentAccount;
use crate::core::error::{LiftlogError, Result};
use crate::db::models::Workout;
use crate::db::repository::Repository;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// Load a workout and check it belongs to the given account
async fn find_owned(state: &AppState, account_id: &str, id: &str) -> Result<Workout> {
    state
        .workout_repo
        .find_by_id(id)
        .await?
        .filter(|workout| workout.user_id == account_id)
        .ok_or_else(|| LiftlogError::NotFound(format!("Workout with id {} not found", id)))
}

/// Handler for GET /api/workouts - List the account's workouts
pub async fn list_workouts(
    State(state): State<AppState>,
    CurrentAccount(account_id): CurrentAccount,
) -> Result<Json<Vec<WorkoutResponse>>> {
    let workouts = state.workout_repo.find_by_owner(&account_id).await?;
    Ok(Json(workouts.into_iter().map(WorkoutResponse::from).collect()))
}

/// Handler for POST /api/workouts - Create a workout
pub async fn create_workout(
    State(state): State<AppState>,
    CurrentAccount(account_id): CurrentAccount,
    Json(req): Json<CreateWorkoutRequest>,
) -> Result<impl IntoResponse> {
    if req.title.trim().is_empty() {
        return Err(LiftlogError::ValidationError(
            "title cannot be empty".to_string(),
        ));
    }

    let workout = Workout {
        id: Uuid::new_v4().to_string(),
        user_id: account_id,
        title: req.title,
        notes: req.notes,
        duration_min: req.duration_min,
        performed_at: req.performed_at,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.workout_repo.create(&workout).await?;
    tracing::info!(workout_id = %workout.id, "Workout created");

    Ok((StatusCode::CREATED, Json(WorkoutResponse::from(workout))))
}

/// Handler for GET /api/workouts/:id - Get one workout
pub async fn get_workout(
    State(state): State<AppState>,
    CurrentAccount(account_id): CurrentAccount,
    Path(id): Path<String>,
) -> Result<Json<WorkoutResponse>> {
    let workout = find_owned(&state, &account_id, &id).await?;
    Ok(Json(WorkoutResponse::from(workout)))
}

/// Handler for PATCH /api/workouts/:id - Update one workout
pub async fn update_workout(
    State(state): State<AppState>,
    CurrentAccount(account_id): CurrentAccount,
    Path(id): Path<String>,
    Json(req): Json<UpdateWorkoutRequest>,
) -> Result<Json<WorkoutResponse>> {
    let mut workout = find_owned(&state, &account_id, &id).await?;

    if let Some(title) = req.title {
        if title.trim().is_empty() {
            return Err(LiftlogError::ValidationError(
                "title cannot be empty".to_string(),
            ));
        }
        workout.title = title;
    }
    if let Some(notes) = req.notes {
        workout.notes = Some(notes);
    }
    if let Some(duration_min) = req.duration_min {
        workout.duration_min = Some(duration_min);
    }
    if let Some(performed_at) = req.performed_at {
        workout.performed_at = Some(performed_at);
    }

    state.workout_repo.update(&workout).await?;
    Ok(Json(WorkoutResponse::from(workout)))
}

/// Handler for DELETE /api/workouts/:id - Delete one workout
pub async fn delete_workout(
    State(state): State<AppState>,
    CurrentAccount(account_id): CurrentAccount,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let workout = find_owned(&state, &account_id, &id).await?;
    state.workout_repo.delete(&workout.id).await?;

    tracing::info!(workout_id = %workout.id, "Workout deleted");
    Ok(Json(crate::auth::models::SuccessResponse { success: true }))
}
