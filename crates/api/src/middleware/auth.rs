//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vigil_core::error::CoreError;
use vigil_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated principal extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// The token also names the credential session it was minted for, so
/// handlers know which session is "current" without an extra lookup:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, session_id = %user.session_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The principal's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The credential session the request rides on (from `claims.sid`).
    pub session_id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Core(CoreError::NotAuthenticated))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Core(CoreError::NotAuthenticated))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Core(CoreError::NotAuthenticated))?;

        Ok(AuthUser {
            user_id: claims.sub,
            session_id: claims.sid,
        })
    }
}
