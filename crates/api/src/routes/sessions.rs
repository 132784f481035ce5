//! Route definitions for the `/sessions` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`. All require authentication.
///
/// ```text
/// GET    /               -> list_sessions
/// DELETE /{session_id}   -> revoke_session
/// POST   /revoke-others  -> revoke_other_sessions
/// POST   /revoke-all     -> revoke_all_sessions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sessions::list_sessions))
        .route("/{session_id}", delete(sessions::revoke_session))
        .route("/revoke-others", post(sessions::revoke_other_sessions))
        .route("/revoke-all", post(sessions::revoke_all_sessions))
}
