//! Principal existence lookups.
//!
//! The session core never owns principals; it only needs to know which
//! user ids still exist. This trait is the seam to the authentication
//! collaborator's user store.

use std::collections::HashSet;

use async_trait::async_trait;
use vigil_core::error::CoreError;
use vigil_core::types::DbId;
use vigil_db::repositories::UserRepo;
use vigil_db::DbPool;

use crate::store_unavailable;

/// Read-only view of the principal collaborator.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Subset of `candidates` that still exist.
    async fn existing_ids(&self, candidates: &[DbId]) -> Result<HashSet<DbId>, CoreError>;

    /// Check a single principal.
    async fn exists(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.existing_ids(&[id]).await?.contains(&id))
    }
}

/// Postgres-backed directory reading the `users` table.
pub struct PgPrincipalDirectory {
    pool: DbPool,
}

impl PgPrincipalDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalDirectory for PgPrincipalDirectory {
    async fn existing_ids(&self, candidates: &[DbId]) -> Result<HashSet<DbId>, CoreError> {
        let ids = UserRepo::existing_ids(&self.pool, candidates)
            .await
            .map_err(store_unavailable)?;
        Ok(ids.into_iter().collect())
    }
}
