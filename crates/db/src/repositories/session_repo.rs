//! Repository for the `session_records` table.
//!
//! Every mutation is a conditional, set-based update so sweeps and
//! revocations stay idempotent and safe under concurrent invocation.
//! In particular `is_revoked` only ever transitions `false -> true`.

use sqlx::PgPool;
use vigil_core::types::{DbId, Timestamp};

use crate::models::session::{CreateSessionRecord, SessionRecord};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, user_id, ip_address, user_agent, browser, os, \
                        device_type, device_fingerprint, country, city, created_at, \
                        last_active_at, is_revoked";

/// Outcome of an activity ping against a session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// `last_active_at` was advanced.
    Touched,
    /// The record exists but is revoked; the ping was a no-op.
    AlreadyRevoked,
    /// No record with this session id exists.
    NotFound,
}

/// Provides CRUD operations for session records.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session record, returning the created row.
    ///
    /// Fails with a unique violation on `uq_session_records_session_id`
    /// if the session id is already tracked.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSessionRecord,
    ) -> Result<SessionRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO session_records (session_id, user_id, ip_address, user_agent,
                                          browser, os, device_type, device_fingerprint,
                                          country, city)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionRecord>(&query)
            .bind(&input.session_id)
            .bind(input.user_id)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .bind(&input.browser)
            .bind(&input.os)
            .bind(&input.device_type)
            .bind(&input.device_fingerprint)
            .bind(&input.country)
            .bind(&input.city)
            .fetch_one(pool)
            .await
    }

    /// Find a record by its correlation session id.
    pub async fn find_by_session_id(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Option<SessionRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM session_records WHERE session_id = $1");
        sqlx::query_as::<_, SessionRecord>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// Advance `last_active_at` for a live session.
    ///
    /// Revocation dominates: a revoked record is never touched, so a ping
    /// that races a revocation can not resurrect the session.
    pub async fn touch(pool: &PgPool, session_id: &str) -> Result<TouchOutcome, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE session_records SET last_active_at = NOW()
             WHERE session_id = $1 AND is_revoked = false",
        )
        .bind(session_id)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(TouchOutcome::Touched);
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM session_records WHERE session_id = $1)",
        )
        .bind(session_id)
        .fetch_one(pool)
        .await?;

        Ok(if exists {
            TouchOutcome::AlreadyRevoked
        } else {
            TouchOutcome::NotFound
        })
    }

    /// Revoke a single session. Returns `true` if the row changed state
    /// (`false` if it was already revoked -- idempotent).
    pub async fn revoke(pool: &PgPool, session_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE session_records SET is_revoked = true
             WHERE session_id = $1 AND is_revoked = false",
        )
        .bind(session_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List sessions for a user, most recently active first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        include_revoked: bool,
    ) -> Result<Vec<SessionRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM session_records
             WHERE user_id = $1 AND (is_revoked = false OR $2)
             ORDER BY last_active_at DESC"
        );
        sqlx::query_as::<_, SessionRecord>(&query)
            .bind(user_id)
            .bind(include_revoked)
            .fetch_all(pool)
            .await
    }

    /// Count sessions for a user.
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: DbId,
        include_revoked: bool,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM session_records
             WHERE user_id = $1 AND (is_revoked = false OR $2)",
        )
        .bind(user_id)
        .bind(include_revoked)
        .fetch_one(pool)
        .await
    }

    /// Distinct user ids with at least one non-revoked session, for
    /// reconciliation sweeps.
    pub async fn distinct_user_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT user_id FROM session_records WHERE is_revoked = false",
        )
        .fetch_all(pool)
        .await
    }

    /// Snapshot of all non-revoked records for the duplicate-collapse
    /// planner, in a stable order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<SessionRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM session_records
             WHERE is_revoked = false
             ORDER BY user_id, created_at, session_id"
        );
        sqlx::query_as::<_, SessionRecord>(&query).fetch_all(pool).await
    }

    /// Revoke a batch of sessions by id. Returns the count that changed
    /// state; already-revoked entries are skipped.
    pub async fn revoke_many(pool: &PgPool, session_ids: &[String]) -> Result<u64, sqlx::Error> {
        if session_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE session_records SET is_revoked = true
             WHERE session_id = ANY($1) AND is_revoked = false",
        )
        .bind(session_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Revoke every non-revoked session belonging to any of the given
    /// users (orphan sweep).
    pub async fn revoke_all_for_users(pool: &PgPool, user_ids: &[DbId]) -> Result<u64, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE session_records SET is_revoked = true
             WHERE user_id = ANY($1) AND is_revoked = false",
        )
        .bind(user_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Revoke every non-revoked session for a user except one, returning
    /// the revoked session ids. The exclusion lives in the predicate, so
    /// `keep_session_id` is never revoked under any interleaving.
    pub async fn revoke_all_for_user_except(
        pool: &PgPool,
        user_id: DbId,
        keep_session_id: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE session_records SET is_revoked = true
             WHERE user_id = $1 AND session_id <> $2 AND is_revoked = false
             RETURNING session_id",
        )
        .bind(user_id)
        .bind(keep_session_id)
        .fetch_all(pool)
        .await
    }

    /// Revoke every non-revoked session for a user, returning the revoked
    /// session ids.
    pub async fn revoke_all_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE session_records SET is_revoked = true
             WHERE user_id = $1 AND is_revoked = false
             RETURNING session_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Hard-delete expired rows: revoked records idle since before
    /// `revoked_cutoff`, and any record idle since before
    /// `absolute_cutoff`. Returns the count of deleted rows.
    pub async fn delete_expired(
        pool: &PgPool,
        revoked_cutoff: Timestamp,
        absolute_cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM session_records
             WHERE (is_revoked = true AND last_active_at < $1)
                OR last_active_at < $2",
        )
        .bind(revoked_cutoff)
        .bind(absolute_cutoff)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
