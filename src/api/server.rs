//! HTTP Server implementation
//!
//! This module provides the HTTP server using Axum framework with:
//! - Configurable host/port binding
//! - Graceful shutdown handling
//! - Health check endpoint
//! - CORS support and per-request trace IDs

use crate::api::handlers::AppState;
use crate::api::middleware::trace_id_middleware;
use crate::api::routes::build_api_routes;
use crate::auth::service::AccountService;
use crate::auth::token::TokenIssuer;
use crate::core::config::{Config, ServerConfig};
use crate::db::manager::DatabaseManager;
use crate::db::repository::{UserRepository, WorkoutRepository};
use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server with the given configuration and database manager
    pub fn new(config: &Config, db: Arc<DatabaseManager>) -> Self {
        let server_config = config.server.clone();
        let router = Self::build_router(config, db);

        Self {
            router,
            config: server_config,
        }
    }

    /// Build the Axum router with all routes and middleware
    fn build_router(config: &Config, db: Arc<DatabaseManager>) -> Router {
        let user_repo = Arc::new(UserRepository::new(db.clone()));
        let workout_repo = Arc::new(WorkoutRepository::new(db));
        let tokens = Arc::new(TokenIssuer::new(&config.auth));
        let accounts = Arc::new(AccountService::new(
            user_repo,
            workout_repo.clone(),
            tokens.clone(),
            config.auth.bcrypt_cost,
        ));

        let state = AppState {
            workout_repo,
            accounts,
            tokens,
            token_ttl: config.auth.token_ttl,
        };

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(health_check))
            .merge(build_api_routes(state))
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn(trace_id_middleware))
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
    }

    /// Start the HTTP server and listen for requests
    ///
    /// Blocks until the server shuts down gracefully.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            request_timeout = self.config.request_timeout,
            "Starting HTTP server"
        );

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }

    /// Get a reference to the router
    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AuthConfig, DatabaseConfig, LoggingConfig};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                request_timeout: 30,
            },
            database: DatabaseConfig {
                path: ":memory:".into(),
                connection_pool_size: 1,
                busy_timeout: 5000,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
                token_ttl: 3600,
                bcrypt_cost: 4,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
                output: "stdout".to_string(),
                log_file: None,
            },
        };
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        ApiServer::build_router(&config, db)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn signup_session(router: &Router) -> String {
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/signup",
                r#"{"email":"user0@test.net","password":"asdfASDF1234!@#$"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("signup attaches a session cookie")
            .to_str()
            .unwrap();
        // First attribute is auth_token=<token>
        cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let router = test_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_signup_sets_cookie_and_authenticates() {
        let router = test_router();
        let cookie = signup_session(&router).await;
        assert!(cookie.starts_with("auth_token="));

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_me_requires_session() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // A forged token is rejected the same way as a missing one
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .header(header::COOKIE, "auth_token=forged.token.value")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bearer_header_fallback() {
        let router = test_router();
        let cookie = signup_session(&router).await;
        let token = cookie.strip_prefix("auth_token=").unwrap();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_failures_issue_no_cookie() {
        let router = test_router();
        signup_session(&router).await;

        // Unknown email
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                r#"{"email":"bob@aol.com","password":"asdfASDF1234!@#$"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        // Wrong password
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                r#"{"email":"user0@test.net","password":"1234!@#$asdfASDF"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_signup_rejections_issue_no_cookie() {
        let router = test_router();
        signup_session(&router).await;

        // Malformed email
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/signup",
                r#"{"email":"asdf","password":"asdfASDF1234!@#$"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        // Weak password
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/signup",
                r#"{"email":"user2@test.net","password":"pass"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        // Already registered
        let response = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/signup",
                r#"{"email":"user0@test.net","password":"asdfASDF1234!@#$"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_cookie_and_is_idempotent() {
        let router = test_router();

        // Even an anonymous logout succeeds and clears the carrier
        let response = router
            .clone()
            .oneshot(json_request("POST", "/api/auth/logout", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_delete_account_invalidates_stale_session() {
        let router = test_router();
        let cookie = signup_session(&router).await;

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/me")
                    .header(header::COOKIE, cookie.clone())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cleared.contains("Max-Age=0"));

        // The old token still validates cryptographically, but the account
        // is gone
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/me")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_workout_routes_are_owner_scoped() {
        let router = test_router();
        let cookie = signup_session(&router).await;

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/workouts")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::COOKIE, cookie.clone())
                    .body(Body::from(
                        r#"{"title":"Leg day","duration_min":60}"#.to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/workouts")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Anonymous access is rejected
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/workouts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
