//! Repository for the `auth_sessions` table -- the authoritative
//! credential-session store.
//!
//! The authentication collaborator writes rows here when it issues a
//! session; the revocation service and the sweeper's sync-repair job
//! delete them. Tracking-side state lives in `session_records`.

use sqlx::PgPool;
use vigil_core::types::DbId;

/// Provides mutations against the authoritative credential store.
pub struct CredentialSessionRepo;

impl CredentialSessionRepo {
    /// Record an issued credential session. Idempotent: re-inserting an
    /// existing session id is a no-op.
    pub async fn insert(pool: &PgPool, session_id: &str, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO auth_sessions (session_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT (session_id) DO NOTHING",
        )
        .bind(session_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete one credential session. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, session_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every credential session for a user. Returns the count of
    /// deleted rows.
    pub async fn delete_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Check whether a credential session exists.
    pub async fn exists(pool: &PgPool, session_id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM auth_sessions WHERE session_id = $1)")
            .bind(session_id)
            .fetch_one(pool)
            .await
    }

    /// Session ids revoked in the tracking store but still present here.
    ///
    /// These are the gaps left by partial sync failures during
    /// revocation; the sweeper deletes them on its next pass.
    pub async fn stale_after_revocation(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT a.session_id FROM auth_sessions a
             JOIN session_records s ON s.session_id = a.session_id
             WHERE s.is_revoked = true",
        )
        .fetch_all(pool)
        .await
    }
}
