//! Shared-secret guard for the `/internal` surface.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use vigil_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Marker extractor for trusted server-to-server callers (the auth
/// collaborator's issue/activity hooks and the cleanup trigger).
///
/// Requires the `X-Internal-Token` header to match the configured
/// `INTERNAL_API_TOKEN`.
#[derive(Debug, Clone, Copy)]
pub struct InternalCaller;

impl FromRequestParts<AppState> for InternalCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("x-internal-token")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Core(CoreError::NotAuthenticated))?;

        if token != state.config.internal_token {
            return Err(AppError::Core(CoreError::NotAuthenticated));
        }

        Ok(InternalCaller)
    }
}
