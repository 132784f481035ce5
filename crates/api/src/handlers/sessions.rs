//! Handlers for the `/sessions` resource (device list and revocation).

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use vigil_core::types::Timestamp;
use vigil_db::repositories::SessionRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One entry in the caller's device list.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub device_type: Option<String>,
    pub location: Location,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
    pub last_active_at: Timestamp,
    /// Whether this is the session the request rides on.
    pub is_current: bool,
}

/// Coarse location as reported by the edge proxy at sign-in.
#[derive(Debug, Serialize)]
pub struct Location {
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Response for a single-session revocation.
#[derive(Debug, Serialize)]
pub struct RevokeResponse {
    pub success: bool,
}

/// Response for a bulk revocation.
#[derive(Debug, Serialize)]
pub struct BulkRevokeResponse {
    pub success: bool,
    pub revoked: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/sessions
///
/// List the caller's active sessions, most recently active first.
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SessionInfo>>>> {
    let records = SessionRepo::list_for_user(&state.pool, auth.user_id, false).await?;

    let sessions = records
        .into_iter()
        .map(|r| {
            let is_current = r.session_id == auth.session_id;
            SessionInfo {
                session_id: r.session_id,
                browser: r.browser,
                os: r.os,
                device_type: r.device_type,
                location: Location {
                    city: r.city,
                    country: r.country,
                },
                ip_address: r.ip_address,
                created_at: r.created_at,
                last_active_at: r.last_active_at,
                is_current,
            }
        })
        .collect();

    Ok(Json(DataResponse { data: sessions }))
}

/// DELETE /api/v1/sessions/{session_id}
///
/// Revoke one of the caller's sessions. Idempotent: revoking an
/// already-revoked session succeeds again.
pub async fn revoke_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<String>,
) -> AppResult<Json<RevokeResponse>> {
    state
        .revocation
        .revoke_session(&session_id, auth.user_id)
        .await?;
    Ok(Json(RevokeResponse { success: true }))
}

/// POST /api/v1/sessions/revoke-others
///
/// Revoke every session except the one this request rides on.
pub async fn revoke_other_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<BulkRevokeResponse>> {
    let revoked = state
        .revocation
        .revoke_all_other_sessions(auth.user_id, &auth.session_id)
        .await?;
    Ok(Json(BulkRevokeResponse {
        success: true,
        revoked,
    }))
}

/// POST /api/v1/sessions/revoke-all
///
/// Revoke every session including the current one (forced logout). The
/// client is responsible for discarding its credentials afterwards.
pub async fn revoke_all_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<BulkRevokeResponse>> {
    let revoked = state.revocation.revoke_all_sessions(auth.user_id).await?;
    Ok(Json(BulkRevokeResponse {
        success: true,
        revoked,
    }))
}
