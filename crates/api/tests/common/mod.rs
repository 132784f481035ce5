//! Shared fixtures and request helpers for API integration tests.
//!
//! Mirrors the router construction in `main.rs` so tests exercise the
//! same middleware stack (CORS, request ID, timeout, tracing, panic
//! recovery) that production uses.

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use vigil_api::auth::jwt::{generate_access_token, JwtConfig};
use vigil_api::config::ServerConfig;
use vigil_api::router::build_app_router;
use vigil_api::state::AppState;
use vigil_core::types::DbId;
use vigil_db::models::user::CreatePrincipal;
use vigil_db::repositories::UserRepo;
use vigil_lifecycle::policy::SessionPolicy;

pub const INTERNAL_TOKEN: &str = "test-internal-token";

pub const CHROME_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const FIREFOX_LINUX: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

/// Build a test `ServerConfig` with safe defaults and known secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        internal_token: INTERNAL_TOKEN.to_string(),
        policy: SessionPolicy::default(),
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(AppState::new(pool, config.clone()), &config)
}

/// Mint an access token the way the auth collaborator would.
pub fn mint_token(user_id: DbId, session_id: &str) -> String {
    generate_access_token(user_id, session_id, &test_config().jwt)
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST to the `/internal` surface with the shared token.
pub async fn post_internal(app: Router, path: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-internal-token", INTERNAL_TOKEN)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST to the `/internal` surface without the shared token.
pub async fn post_no_token(app: Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a principal row directly in the database.
pub async fn create_principal(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreatePrincipal {
            username: username.to_string(),
        },
    )
    .await
    .expect("principal creation should succeed")
    .id
}

/// Issue a session the way the auth collaborator does: through the
/// internal endpoint.
pub async fn issue_session(
    pool: &PgPool,
    user_id: DbId,
    session_id: &str,
    user_agent: &str,
    ip_address: &str,
) {
    let app = build_test_app(pool.clone());
    let body = serde_json::json!({
        "session_id": session_id,
        "user_id": user_id,
        "user_agent": user_agent,
        "ip_address": ip_address,
    });
    let response = post_internal(app, "/api/v1/internal/sessions", body).await;
    assert_eq!(
        response.status(),
        axum::http::StatusCode::CREATED,
        "session issue should succeed"
    );
}

/// Move a record wholly into the past: both creation and last activity.
pub async fn backdate_session(pool: &PgPool, session_id: &str, days: i64) {
    sqlx::query(
        "UPDATE session_records
         SET created_at = created_at - make_interval(days => $2),
             last_active_at = last_active_at - make_interval(days => $2)
         WHERE session_id = $1",
    )
    .bind(session_id)
    .bind(days as i32)
    .execute(pool)
    .await
    .expect("backdate should succeed");
}

/// Move a record's creation time into the past, leaving activity put.
pub async fn backdate_created(pool: &PgPool, session_id: &str, secs: i64) {
    sqlx::query(
        "UPDATE session_records
         SET created_at = created_at - make_interval(secs => $2)
         WHERE session_id = $1",
    )
    .bind(session_id)
    .bind(secs as f64)
    .execute(pool)
    .await
    .expect("backdate should succeed");
}
