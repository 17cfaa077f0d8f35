//! API routes

use crate::api::handlers::{
    create_workout, delete_workout, get_workout, list_workouts, update_workout, AppState,
};
use crate::auth::handlers::{delete_me, get_me, login, logout, signup, update_me};
use crate::auth::middleware::resolve_session;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Build the API routes
///
/// Session resolution runs on every route; handlers that require an
/// authenticated session enforce it through the CurrentAccount extractor.
pub fn build_api_routes(state: AppState) -> Router {
    Router::new()
        // Account lifecycle
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route(
            "/api/me",
            get(get_me).patch(update_me).delete(delete_me),
        )
        // Workout endpoints (owner-scoped)
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route(
            "/api/workouts/:id",
            get(get_workout).patch(update_workout).delete(delete_workout),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_session,
        ))
        .with_state(state)
}
