//! Route definitions for the `/internal` surface.

use axum::routing::post;
use axum::Router;

use crate::handlers::internal;
use crate::state::AppState;

/// Routes mounted at `/internal`. All require the shared internal token.
///
/// ```text
/// POST /sessions                      -> create_session
/// POST /sessions/{session_id}/touch   -> touch_session
/// POST /cleanup                       -> run_cleanup
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(internal::create_session))
        .route("/sessions/{session_id}/touch", post(internal::touch_session))
        .route("/cleanup", post(internal::run_cleanup))
}
