//! Session revocation across both stores.

use std::sync::Arc;

use vigil_core::error::CoreError;
use vigil_core::types::DbId;
use vigil_db::repositories::SessionRepo;
use vigil_db::DbPool;

use crate::credential::CredentialSessionSink;
use crate::store_unavailable;

/// Revokes sessions in the tracking store and keeps the authoritative
/// credential store in sync.
///
/// The tracking-store revocation is the source of truth: it happens
/// first, and a failure there surfaces to the caller as retryable. The
/// authoritative delete is attempted afterwards; if it fails, the gap is
/// logged and the sweeper's sync repair closes it on the next cycle, so
/// the caller still sees success.
pub struct RevocationService {
    pool: DbPool,
    credentials: Arc<dyn CredentialSessionSink>,
}

impl RevocationService {
    pub fn new(pool: DbPool, credentials: Arc<dyn CredentialSessionSink>) -> Self {
        Self { pool, credentials }
    }

    /// Revoke one session owned by `requesting_user_id`.
    ///
    /// Fails with `NotFound` if the session does not exist or belongs to
    /// another principal. Idempotent: revoking an already-revoked session
    /// succeeds again.
    pub async fn revoke_session(
        &self,
        session_id: &str,
        requesting_user_id: DbId,
    ) -> Result<(), CoreError> {
        let record = SessionRepo::find_by_session_id(&self.pool, session_id)
            .await
            .map_err(store_unavailable)?
            .filter(|r| r.user_id == requesting_user_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Session",
                id: session_id.to_string(),
            })?;

        let changed = SessionRepo::revoke(&self.pool, &record.session_id)
            .await
            .map_err(store_unavailable)?;
        if changed {
            tracing::info!(session_id, user_id = requesting_user_id, "Session revoked");
        }

        self.delete_credential(session_id).await;
        Ok(())
    }

    /// Revoke every session for the user except the current one.
    ///
    /// The exclusion is part of the update predicate, so the current
    /// session survives any interleaving. Returns the count revoked.
    pub async fn revoke_all_other_sessions(
        &self,
        user_id: DbId,
        current_session_id: &str,
    ) -> Result<u64, CoreError> {
        let revoked =
            SessionRepo::revoke_all_for_user_except(&self.pool, user_id, current_session_id)
                .await
                .map_err(store_unavailable)?;

        for session_id in &revoked {
            self.delete_credential(session_id).await;
        }

        if !revoked.is_empty() {
            tracing::info!(
                user_id,
                revoked = revoked.len(),
                "Revoked all other sessions"
            );
        }
        Ok(revoked.len() as u64)
    }

    /// Revoke every session for the user, current one included (forced
    /// logout, account deletion). The caller clears client-held
    /// credentials afterwards. Returns the count revoked.
    pub async fn revoke_all_sessions(&self, user_id: DbId) -> Result<u64, CoreError> {
        let revoked = SessionRepo::revoke_all_for_user(&self.pool, user_id)
            .await
            .map_err(store_unavailable)?;

        if let Err(e) = self.credentials.delete_all_for_user(user_id).await {
            tracing::warn!(
                user_id,
                error = %e,
                "Authoritative bulk delete failed; sweeper will retry"
            );
        }

        if !revoked.is_empty() {
            tracing::info!(user_id, revoked = revoked.len(), "Revoked all sessions");
        }
        Ok(revoked.len() as u64)
    }

    /// Best-effort delete against the authoritative store. A failure here
    /// is a partial sync, not a request failure: the tracking store is
    /// already revoked and the sweeper repairs the gap.
    async fn delete_credential(&self, session_id: &str) {
        if let Err(e) = self.credentials.delete(session_id).await {
            tracing::warn!(
                session_id,
                error = %e,
                "Authoritative session delete failed; sweeper will retry"
            );
        }
    }
}
