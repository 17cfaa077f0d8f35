//! Account lifecycle service
//!
//! Orchestrates signup, login, view, update, and deletion over the
//! credential store, password hasher, and token issuer. Handlers stay thin:
//! they translate HTTP to these calls and move the resulting token in and
//! out of the session transport.
//!
//! Password hashing is deliberately expensive, so hash and verify calls run
//! on the blocking thread pool rather than the async runtime.

use crate::auth::password::{hash_password, verify_password};
use crate::auth::policy::{normalize_email, validate_email, validate_password};
use crate::auth::token::TokenIssuer;
use crate::core::error::{LiftlogError, Result};
use crate::db::models::User;
use crate::db::repository::{Repository, UserRepository, WorkoutRepository};
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

/// Partial update applied to an account; each field is independently
/// optional
#[derive(Debug, Default)]
pub struct AccountPatch {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Account lifecycle service
pub struct AccountService {
    users: Arc<UserRepository>,
    workouts: Arc<WorkoutRepository>,
    tokens: Arc<TokenIssuer>,
    bcrypt_cost: u32,
}

impl AccountService {
    /// Create a new AccountService
    pub fn new(
        users: Arc<UserRepository>,
        workouts: Arc<WorkoutRepository>,
        tokens: Arc<TokenIssuer>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            workouts,
            tokens,
            bcrypt_cost,
        }
    }

    /// Register a new account and issue its first session token
    ///
    /// The store's uniqueness constraint decides races: of N concurrent
    /// signups with one email, exactly one succeeds and the rest fail with
    /// Conflict.
    pub async fn signup(&self, email: &str, password: &str) -> Result<(User, String)> {
        validate_email(email)?;
        validate_password(password)?;

        let email = normalize_email(email);
        let password_hash = self.hash_on_blocking_pool(password.to_string()).await?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash,
            is_admin: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        self.users.create(&user).await?;
        let token = self.tokens.issue(&user.id)?;

        tracing::info!(user_id = %user.id, "Account created");
        Ok((user, token))
    }

    /// Authenticate credentials and issue a fresh session token
    ///
    /// Unknown email and wrong password produce the same Unauthenticated
    /// outcome. Tokens are non-exclusive: logging in again does not
    /// invalidate earlier tokens.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let email = normalize_email(email);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| LiftlogError::AuthenticationError("invalid credentials".to_string()))?;

        let verified = self
            .verify_on_blocking_pool(password.to_string(), user.password_hash.clone())
            .await?;
        if !verified {
            tracing::warn!(user_id = %user.id, "Login with wrong password");
            return Err(LiftlogError::AuthenticationError(
                "invalid credentials".to_string(),
            ));
        }

        let token = self.tokens.issue(&user.id)?;
        tracing::info!(user_id = %user.id, "Login successful");
        Ok((user, token))
    }

    /// Load the account behind an authenticated session
    ///
    /// A token can outlive its account (stateless tokens are not revoked on
    /// deletion); that case surfaces as NotFound, never as the stale record.
    pub async fn view(&self, account_id: &str) -> Result<User> {
        self.users
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| LiftlogError::NotFound("account no longer exists".to_string()))
    }

    /// Apply a partial update to an account
    ///
    /// Returns the updated account and, when the login identity (email)
    /// changed, a fresh token for the transport to attach.
    pub async fn update(
        &self,
        account_id: &str,
        patch: AccountPatch,
    ) -> Result<(User, Option<String>)> {
        let mut user = self.view(account_id).await?;
        let mut email_changed = false;

        if let Some(new_email) = patch.email {
            validate_email(&new_email)?;
            let new_email = normalize_email(&new_email);
            // Re-submitting the current email is a no-op, not a conflict
            if new_email != user.email {
                user.email = new_email;
                email_changed = true;
            }
        }

        if let Some(new_password) = patch.password {
            validate_password(&new_password)?;
            user.password_hash = self.hash_on_blocking_pool(new_password).await?;
        }

        self.users.update(&user).await?;

        let token = if email_changed {
            Some(self.tokens.issue(&user.id)?)
        } else {
            None
        };

        tracing::info!(user_id = %user.id, email_changed, "Account updated");
        Ok((user, token))
    }

    /// Delete an account and everything it owns
    ///
    /// Dependent workouts are removed first; only then is the account row
    /// deleted. A failure between the two phases leaves the account intact
    /// (with fewer workouts) rather than orphaning resources. Returns the
    /// number of workouts removed.
    pub async fn delete(&self, account_id: &str) -> Result<usize> {
        let user = self.view(account_id).await?;

        let workouts_removed = self.workouts.delete_all_owned_by(&user.id).await?;
        self.users.delete(&user.id).await?;

        tracing::info!(
            user_id = %user.id,
            workouts_removed,
            "Account deleted"
        );
        Ok(workouts_removed)
    }

    async fn hash_on_blocking_pool(&self, password: String) -> Result<String> {
        let cost = self.bcrypt_cost;
        task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| LiftlogError::TaskError(format!("Hashing task panicked: {}", e)))?
    }

    async fn verify_on_blocking_pool(&self, password: String, hash: String) -> Result<bool> {
        task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| LiftlogError::TaskError(format!("Verification task panicked: {}", e)))
    }
}
