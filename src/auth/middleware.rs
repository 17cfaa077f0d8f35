//! Session resolution middleware
//!
//! Turns whatever the transport carries into an explicit [`AuthContext`]
//! value on the request, so handlers never infer login state from cookie
//! presence. Protected handlers extract [`CurrentAccount`], which rejects
//! anonymous requests with a single uniform Unauthenticated outcome.

use crate::auth::session::read_session;
use crate::core::error::{LiftlogError, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

/// Explicit authentication state of a request
#[derive(Clone, Debug)]
pub enum AuthContext {
    Anonymous,
    Authenticated { account_id: String },
}

impl AuthContext {
    /// Whether the request carries a valid session
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthContext::Authenticated { .. })
    }

    /// Account id of the session, if any
    pub fn account_id(&self) -> Option<&str> {
        match self {
            AuthContext::Authenticated { account_id } => Some(account_id),
            AuthContext::Anonymous => None,
        }
    }
}

/// Resolve the session token on every request into an AuthContext
///
/// Missing, forged, and expired tokens all resolve to Anonymous; rejection
/// happens later at extraction, so unauthenticated and invalid sessions are
/// indistinguishable to the client.
pub async fn resolve_session(
    State(state): State<crate::api::handlers::AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let context = read_session(request.headers())
        .and_then(|token| state.tokens.validate(&token).ok())
        .map_or(AuthContext::Anonymous, |account_id| {
            AuthContext::Authenticated { account_id }
        });

    request.extensions_mut().insert(context);
    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = LiftlogError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        // Requests that never went through resolve_session are anonymous
        Ok(parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .unwrap_or(AuthContext::Anonymous))
    }
}

/// Extractor for handlers that require an authenticated session
///
/// Holds the account id taken from the validated token.
#[derive(Clone, Debug)]
pub struct CurrentAccount(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = LiftlogError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        match parts.extensions.get::<AuthContext>() {
            Some(AuthContext::Authenticated { account_id }) => {
                Ok(CurrentAccount(account_id.clone()))
            }
            _ => Err(LiftlogError::AuthenticationError(
                "Missing or invalid session token".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn parts_with(context: Option<AuthContext>) -> Parts {
        let request = HttpRequest::builder().body(()).unwrap();
        let (mut parts, ()) = request.into_parts();
        if let Some(context) = context {
            parts.extensions.insert(context);
        }
        parts
    }

    #[test]
    fn test_auth_context_queries() {
        let authed = AuthContext::Authenticated {
            account_id: "u1".to_string(),
        };
        assert!(authed.is_authenticated());
        assert_eq!(authed.account_id(), Some("u1"));

        let anon = AuthContext::Anonymous;
        assert!(!anon.is_authenticated());
        assert_eq!(anon.account_id(), None);
    }

    #[tokio::test]
    async fn test_current_account_requires_authenticated_context() {
        let mut parts = parts_with(Some(AuthContext::Authenticated {
            account_id: "u1".to_string(),
        }));
        let account = CurrentAccount::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(account.0, "u1");

        let mut parts = parts_with(Some(AuthContext::Anonymous));
        let err = CurrentAccount::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, LiftlogError::AuthenticationError(_)));

        let mut parts = parts_with(None);
        assert!(CurrentAccount::from_request_parts(&mut parts, &())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_auth_context_defaults_to_anonymous() {
        let mut parts = parts_with(None);
        let context = AuthContext::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(!context.is_authenticated());
    }
}
