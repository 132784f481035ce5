//! Duplicate-session collapse planning.
//!
//! A duplicate almost always indicates a retried sign-in rather than two
//! genuine devices, so collapsing is last-write-wins: within a group of
//! records sharing `(user_id, device_fingerprint)`, runs of records
//! created closer together than the merge window keep only the most
//! recent entry.
//!
//! Planning is pure and deterministic; applying the plan (revoking the
//! returned session ids) happens in the store, where revocation is
//! idempotent -- re-running a sweep over the surviving records is a
//! no-op.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::types::{DbId, Timestamp};

/// Minimal view of a non-revoked session record, as seen by the planner.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub user_id: DbId,
    pub device_fingerprint: String,
    pub created_at: Timestamp,
}

/// Plan which session ids to revoke to collapse duplicates.
///
/// Records are grouped by `(user_id, device_fingerprint)` and ordered by
/// `created_at` (ties broken by `session_id` so the plan is stable).
/// Within a group, each record created less than `merge_window` after its
/// predecessor is treated as the same logical sign-in: the predecessor is
/// planned for revocation and the newest record of the run survives.
pub fn plan_collapse(records: &[SessionSnapshot], merge_window: Duration) -> Vec<String> {
    let mut groups: BTreeMap<(DbId, &str), Vec<&SessionSnapshot>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.user_id, record.device_fingerprint.as_str()))
            .or_default()
            .push(record);
    }

    let mut revoke = Vec::new();
    for mut group in groups.into_values() {
        group.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        for pair in group.windows(2) {
            if pair[1].created_at - pair[0].created_at < merge_window {
                revoke.push(pair[0].session_id.clone());
            }
        }
    }
    revoke
}
