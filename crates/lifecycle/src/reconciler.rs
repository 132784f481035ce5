//! Session reconciliation: duplicate collapse and orphan detection.

use std::sync::Arc;

use serde::Serialize;
use vigil_core::dedup::{self, SessionSnapshot};
use vigil_core::error::CoreError;
use vigil_core::types::DbId;
use vigil_db::repositories::SessionRepo;
use vigil_db::DbPool;

use crate::policy::SessionPolicy;
use crate::principal::PrincipalDirectory;
use crate::store_unavailable;

/// Counts from one reconciliation pass.
#[derive(Debug, Default, Serialize)]
pub struct ReconcileReport {
    pub duplicates_removed: u64,
    pub orphans_revoked: u64,
    /// `false` when the principal lookup failed and the orphan step was
    /// skipped for this run.
    pub orphan_sweep_completed: bool,
}

/// Detects and collapses duplicate session rows, and revokes sessions
/// whose principal no longer exists.
pub struct Reconciler {
    pool: DbPool,
    directory: Arc<dyn PrincipalDirectory>,
    policy: SessionPolicy,
}

impl Reconciler {
    pub fn new(pool: DbPool, directory: Arc<dyn PrincipalDirectory>, policy: SessionPolicy) -> Self {
        Self {
            pool,
            directory,
            policy,
        }
    }

    /// Full pass: duplicate collapse, then orphan sweep.
    ///
    /// A principal-lookup failure aborts only the orphan step; duplicate
    /// collapsing still runs and the partial result is reported rather
    /// than escalated.
    pub async fn run(&self) -> Result<ReconcileReport, CoreError> {
        let duplicates_removed = self.collapse_duplicates().await?;

        let mut report = ReconcileReport {
            duplicates_removed,
            orphans_revoked: 0,
            orphan_sweep_completed: false,
        };
        match self.revoke_orphans().await {
            Ok(revoked) => {
                report.orphans_revoked = revoked;
                report.orphan_sweep_completed = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Orphan sweep skipped: principal lookup failed");
            }
        }
        Ok(report)
    }

    /// Collapse duplicate rows for the same `(user, device fingerprint)`
    /// created within the merge window, keeping the most recent.
    ///
    /// Returns the number of records revoked. Re-running over the
    /// survivors is a no-op.
    pub async fn collapse_duplicates(&self) -> Result<u64, CoreError> {
        let active = SessionRepo::list_active(&self.pool)
            .await
            .map_err(store_unavailable)?;

        let snapshots: Vec<SessionSnapshot> = active
            .iter()
            .map(|r| SessionSnapshot {
                session_id: r.session_id.clone(),
                user_id: r.user_id,
                device_fingerprint: r.device_fingerprint.clone(),
                created_at: r.created_at,
            })
            .collect();

        let plan = dedup::plan_collapse(&snapshots, self.policy.merge_window());
        if plan.is_empty() {
            return Ok(0);
        }

        let revoked = SessionRepo::revoke_many(&self.pool, &plan)
            .await
            .map_err(store_unavailable)?;
        if revoked > 0 {
            tracing::info!(revoked, "Collapsed duplicate sessions");
        }
        Ok(revoked)
    }

    /// Revoke every session belonging to a principal that no longer
    /// exists. Records are revoked, not deleted, to preserve the audit
    /// trail until the retention window closes.
    pub async fn revoke_orphans(&self) -> Result<u64, CoreError> {
        let candidates = SessionRepo::distinct_user_ids(&self.pool)
            .await
            .map_err(store_unavailable)?;
        if candidates.is_empty() {
            return Ok(0);
        }

        let existing = self.directory.existing_ids(&candidates).await?;
        let missing: Vec<DbId> = candidates
            .into_iter()
            .filter(|id| !existing.contains(id))
            .collect();
        if missing.is_empty() {
            return Ok(0);
        }

        let revoked = SessionRepo::revoke_all_for_users(&self.pool, &missing)
            .await
            .map_err(store_unavailable)?;
        if revoked > 0 {
            tracing::info!(
                orphaned_principals = missing.len(),
                sessions = revoked,
                "Revoked orphaned sessions"
            );
        }
        Ok(revoked)
    }
}
