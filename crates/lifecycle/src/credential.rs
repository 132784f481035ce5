//! Authoritative credential-session store adapter.
//!
//! The second of the two stores. Modeled as one trait seam with a
//! Postgres adapter; revocation and sync repair go through it so tests
//! can inject failures at the store boundary.

use async_trait::async_trait;
use vigil_core::error::CoreError;
use vigil_core::types::DbId;
use vigil_db::repositories::CredentialSessionRepo;
use vigil_db::DbPool;

use crate::store_unavailable;

/// Mutations the session core needs against the authoritative store.
#[async_trait]
pub trait CredentialSessionSink: Send + Sync {
    /// Delete one credential session. Returns `true` if a row existed.
    async fn delete(&self, session_id: &str) -> Result<bool, CoreError>;

    /// Delete every credential session for a user. Returns the count.
    async fn delete_all_for_user(&self, user_id: DbId) -> Result<u64, CoreError>;

    /// Session ids revoked in the tracking store but still live here.
    async fn stale_after_revocation(&self) -> Result<Vec<String>, CoreError>;
}

/// Postgres-backed sink over the `auth_sessions` table.
pub struct PgCredentialSessions {
    pool: DbPool,
}

impl PgCredentialSessions {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialSessionSink for PgCredentialSessions {
    async fn delete(&self, session_id: &str) -> Result<bool, CoreError> {
        CredentialSessionRepo::delete(&self.pool, session_id)
            .await
            .map_err(store_unavailable)
    }

    async fn delete_all_for_user(&self, user_id: DbId) -> Result<u64, CoreError> {
        CredentialSessionRepo::delete_all_for_user(&self.pool, user_id)
            .await
            .map_err(store_unavailable)
    }

    async fn stale_after_revocation(&self) -> Result<Vec<String>, CoreError> {
        CredentialSessionRepo::stale_after_revocation(&self.pool)
            .await
            .map_err(store_unavailable)
    }
}
