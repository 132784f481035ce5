//! Scheduled cleanup: expiry, orphan sweep, duplicate collapse, and
//! credential-store sync repair.
//!
//! The sweeper owns no timer; an external trigger (cron binary, or the
//! diagnostics endpoint) invokes it. Every job is idempotent and
//! set-based, so overlapping invocations find nothing new to act on.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use vigil_core::error::CoreError;
use vigil_db::repositories::SessionRepo;
use vigil_db::DbPool;

use crate::credential::CredentialSessionSink;
use crate::policy::SessionPolicy;
use crate::principal::PrincipalDirectory;
use crate::reconciler::Reconciler;
use crate::store_unavailable;

/// Counts from one cleanup pass.
#[derive(Debug, Default, Serialize)]
pub struct CleanupReport {
    pub expired_sessions: u64,
    pub orphaned_sessions: u64,
    pub duplicates_removed: u64,
    pub credential_resyncs: u64,
}

/// Runs the composable cleanup jobs.
pub struct Sweeper {
    pool: DbPool,
    reconciler: Reconciler,
    credentials: Arc<dyn CredentialSessionSink>,
    policy: SessionPolicy,
}

impl Sweeper {
    pub fn new(
        pool: DbPool,
        directory: Arc<dyn PrincipalDirectory>,
        credentials: Arc<dyn CredentialSessionSink>,
        policy: SessionPolicy,
    ) -> Self {
        let reconciler = Reconciler::new(pool.clone(), directory, policy.clone());
        Self {
            pool,
            reconciler,
            credentials,
            policy,
        }
    }

    /// Run all cleanup jobs once.
    ///
    /// Each job catches and logs its own failure so one failing step
    /// never blocks the others; a failed job contributes zero to the
    /// report and retries on the next scheduled run.
    pub async fn run_scheduled_cleanup(&self) -> CleanupReport {
        let mut report = CleanupReport::default();

        match self.expire_stale().await {
            Ok(deleted) => report.expired_sessions = deleted,
            Err(e) => tracing::error!(error = %e, "Expiry job failed"),
        }

        match self.reconciler.collapse_duplicates().await {
            Ok(revoked) => report.duplicates_removed = revoked,
            Err(e) => tracing::error!(error = %e, "Duplicate collapse failed"),
        }

        match self.reconciler.revoke_orphans().await {
            Ok(revoked) => report.orphaned_sessions = revoked,
            Err(e) => tracing::error!(error = %e, "Orphan sweep failed"),
        }

        match self.repair_credential_store().await {
            Ok(repaired) => report.credential_resyncs = repaired,
            Err(e) => tracing::error!(error = %e, "Credential sync repair failed"),
        }

        tracing::info!(
            expired = report.expired_sessions,
            orphaned = report.orphaned_sessions,
            duplicates = report.duplicates_removed,
            resynced = report.credential_resyncs,
            "Session cleanup completed"
        );
        report
    }

    /// Hard-delete revoked records past the retention window and any
    /// record idle past the absolute max session age.
    pub async fn expire_stale(&self) -> Result<u64, CoreError> {
        let now = Utc::now();
        SessionRepo::delete_expired(
            &self.pool,
            self.policy.revoked_cutoff(now),
            self.policy.absolute_cutoff(now),
        )
        .await
        .map_err(store_unavailable)
    }

    /// Delete authoritative rows that outlived a tracking-store
    /// revocation (the gap left by a partial sync failure).
    pub async fn repair_credential_store(&self) -> Result<u64, CoreError> {
        let stale = self.credentials.stale_after_revocation().await?;
        let mut repaired = 0;
        for session_id in &stale {
            if self.credentials.delete(session_id).await? {
                repaired += 1;
            }
        }
        if repaired > 0 {
            tracing::info!(repaired, "Resynced authoritative store after revocations");
        }
        Ok(repaired)
    }
}
