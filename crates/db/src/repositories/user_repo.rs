//! Repository for the `users` table (principal existence checks).

use sqlx::PgPool;
use vigil_core::types::DbId;

use crate::models::user::{CreatePrincipal, Principal};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, created_at";

/// Provides lookups against the principal store.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new principal, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePrincipal) -> Result<Principal, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Principal>(&query)
            .bind(&input.username)
            .fetch_one(pool)
            .await
    }

    /// Find a principal by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Principal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, Principal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a principal exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Subset of `candidates` that still exist, for bulk orphan checks.
    pub async fn existing_ids(pool: &PgPool, candidates: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar("SELECT id FROM users WHERE id = ANY($1)")
            .bind(candidates)
            .fetch_all(pool)
            .await
    }

    /// Delete a principal (account deletion). Returns `true` if the row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
