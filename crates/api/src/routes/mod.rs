//! Route definitions.

pub mod health;
pub mod internal;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sessions                              list active sessions (GET)
/// /sessions/{session_id}                 revoke one session (DELETE)
/// /sessions/revoke-others                revoke all but current (POST)
/// /sessions/revoke-all                   revoke everything (POST)
///
/// /internal/sessions                     shadow-record creation (POST)
/// /internal/sessions/{session_id}/touch  activity ping (POST)
/// /internal/cleanup                      scheduled cleanup trigger (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sessions", sessions::router())
        .nest("/internal", internal::router())
}
