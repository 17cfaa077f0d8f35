//! Account lifecycle API handlers
//!
//! Thin HTTP glue over [`AccountService`]: translate requests, move the
//! session token between the service and the cookie carrier, and map
//! outcomes onto responses.

use crate::api::handlers::AppState;
use crate::auth::middleware::{AuthContext, CurrentAccount};
use crate::auth::models::{
    AccountResponse, DeleteAccountResponse, LoginRequest, SessionResponse, SignupRequest,
    SuccessResponse, UpdateAccountRequest,
};
use crate::auth::service::AccountPatch;
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::core::error::{LiftlogError, Result};
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};

/// Handler for POST /api/auth/signup - Account registration
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(email = %req.email, "Signup attempt");

    let (user, token) = state.accounts.signup(&req.email, &req.password).await?;
    let cookie = session_cookie(&token, state.token_ttl);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse {
            account: AccountResponse::from(user),
            token,
        }),
    ))
}

/// Handler for POST /api/auth/login - Credential login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(email = %req.email, "Login attempt");

    let (user, token) = state.accounts.login(&req.email, &req.password).await?;
    let cookie = session_cookie(&token, state.token_ttl);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(SessionResponse {
            account: AccountResponse::from(user),
            token,
        }),
    ))
}

/// Handler for POST /api/auth/logout - Clear the session carrier
///
/// Stateless tokens cannot be revoked server-side, so logout only clears
/// the cookie. Idempotent: logging out an anonymous session succeeds too.
pub async fn logout(context: AuthContext) -> impl IntoResponse {
    tracing::info!(
        was_authenticated = context.is_authenticated(),
        "Logout"
    );

    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(SuccessResponse { success: true }),
    )
}

/// Handler for GET /api/me - Get the authenticated account
pub async fn get_me(
    State(state): State<AppState>,
    CurrentAccount(account_id): CurrentAccount,
) -> Result<Json<AccountResponse>> {
    let user = state.accounts.view(&account_id).await?;
    Ok(Json(AccountResponse::from(user)))
}

/// Handler for PATCH /api/me - Update the authenticated account
///
/// When the email (the login identity) changes, a freshly issued token is
/// attached to the carrier alongside the response.
pub async fn update_me(
    State(state): State<AppState>,
    CurrentAccount(account_id): CurrentAccount,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse> {
    let patch = AccountPatch {
        email: req.email,
        password: req.password,
    };

    let (user, reissued) = state.accounts.update(&account_id, patch).await?;

    let mut response = Json(AccountResponse::from(user)).into_response();
    if let Some(token) = reissued {
        let cookie = HeaderValue::from_str(&session_cookie(&token, state.token_ttl))
            .map_err(|e| LiftlogError::TaskError(format!("invalid cookie value: {}", e)))?;
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    Ok(response)
}

/// Handler for DELETE /api/me - Delete the authenticated account
///
/// Cascade order is workouts first, account second; the cookie carrier is
/// cleared on success.
pub async fn delete_me(
    State(state): State<AppState>,
    CurrentAccount(account_id): CurrentAccount,
) -> Result<impl IntoResponse> {
    let workouts_removed = state.accounts.delete(&account_id).await?;

    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(DeleteAccountResponse {
            success: true,
            workouts_removed,
        }),
    ))
}
