//! Handlers for the `/internal` surface: shadow-record creation,
//! activity pings, and the scheduled cleanup trigger.
//!
//! These endpoints are called by the authentication collaborator (when
//! it issues a credential session or sees activity on one) and by the
//! external cleanup timer. All of them require the shared internal
//! token.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vigil_core::device;
use vigil_core::error::CoreError;
use vigil_core::types::DbId;
use vigil_db::models::session::{CreateSessionRecord, SessionRecord};
use vigil_db::repositories::{CredentialSessionRepo, SessionRepo, TouchOutcome};
use vigil_lifecycle::sweeper::CleanupReport;

use crate::error::{AppError, AppResult};
use crate::middleware::internal::InternalCaller;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /internal/sessions`.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub session_id: String,
    pub user_id: DbId,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Coarse location as seen by the edge proxy, if any.
    pub country: Option<String>,
    pub city: Option<String>,
}

/// Response body for an activity ping.
#[derive(Debug, Serialize)]
pub struct TouchResponse {
    pub touched: bool,
    /// Set when the ping hit a revoked session; non-fatal for the caller.
    pub revoked: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/internal/sessions
///
/// Record an issued credential session: writes the authoritative row and
/// the tracking shadow record. A retried call with identical content is
/// success (200); the same session id with different content is a
/// conflict.
pub async fn create_session(
    State(state): State<AppState>,
    _caller: InternalCaller,
    Json(body): Json<CreateSessionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SessionRecord>>)> {
    if body.session_id.trim().is_empty() {
        return Err(CoreError::Validation("session_id must not be empty".into()).into());
    }

    CredentialSessionRepo::insert(&state.pool, &body.session_id, body.user_id).await?;

    let info = device::parse_user_agent(body.user_agent.as_deref().unwrap_or(""));
    let input = CreateSessionRecord {
        session_id: body.session_id.clone(),
        user_id: body.user_id,
        ip_address: body.ip_address.clone(),
        user_agent: body.user_agent.clone(),
        browser: info.browser,
        os: info.os,
        device_type: info.device_type,
        device_fingerprint: device::fingerprint(
            body.user_agent.as_deref(),
            body.ip_address.as_deref(),
        ),
        country: body.country.clone(),
        city: body.city.clone(),
    };

    match SessionRepo::create(&state.pool, &input).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(DataResponse { data: record }))),
        Err(e) if is_unique_violation(&e) => {
            // Creation race: re-read and compare. An identical retried
            // sign-in is success; mismatched content is a conflict.
            let existing = SessionRepo::find_by_session_id(&state.pool, &body.session_id)
                .await?
                .ok_or_else(|| {
                    AppError::InternalError("Duplicate session vanished during re-read".into())
                })?;
            if existing.user_id == input.user_id
                && existing.device_fingerprint == input.device_fingerprint
            {
                Ok((StatusCode::OK, Json(DataResponse { data: existing })))
            } else {
                Err(CoreError::DuplicateSessionId(body.session_id).into())
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /api/v1/internal/sessions/{session_id}/touch
///
/// Activity ping: advance `last_active_at`. A ping against a revoked
/// session is a no-op reported back to the caller, never an error --
/// revocation dominates.
pub async fn touch_session(
    State(state): State<AppState>,
    _caller: InternalCaller,
    Path(session_id): Path<String>,
) -> AppResult<Json<TouchResponse>> {
    match SessionRepo::touch(&state.pool, &session_id).await? {
        TouchOutcome::Touched => Ok(Json(TouchResponse {
            touched: true,
            revoked: false,
        })),
        TouchOutcome::AlreadyRevoked => Ok(Json(TouchResponse {
            touched: false,
            revoked: true,
        })),
        TouchOutcome::NotFound => Err(CoreError::NotFound {
            entity: "Session",
            id: session_id,
        }
        .into()),
    }
}

/// POST /api/v1/internal/cleanup
///
/// Run the scheduled cleanup once. Invoked by the external timer; also
/// safe to call manually for diagnostics, and to call twice in the same
/// minute -- the jobs are idempotent.
pub async fn run_cleanup(
    State(state): State<AppState>,
    _caller: InternalCaller,
) -> AppResult<Json<DataResponse<CleanupReport>>> {
    let report = state.sweeper.run_scheduled_cleanup().await;
    Ok(Json(DataResponse { data: report }))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
