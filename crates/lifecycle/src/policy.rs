//! Operational tuning for session lifecycle sweeps.

use vigil_core::types::Timestamp;

/// Default merge window: 5 minutes.
const DEFAULT_MERGE_WINDOW_SECS: i64 = 300;
/// Default retention for revoked records: 90 days.
const DEFAULT_RETENTION_DAYS: i64 = 90;
/// Default absolute max idle age for any record: 90 days.
const DEFAULT_MAX_AGE_DAYS: i64 = 90;

/// Tuning knobs for deduplication and retention.
///
/// The defaults mirror the reference deployment. These are operational
/// tuning rather than invariants, so each value can be overridden from
/// the environment.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    /// Sessions for the same device fingerprint created within this many
    /// seconds are collapsed as one retried sign-in.
    pub dedup_merge_window_secs: i64,
    /// Revoked records idle longer than this are purged.
    pub revoked_retention_days: i64,
    /// Any record idle longer than this is purged, revoked or not.
    pub max_session_age_days: i64,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            dedup_merge_window_secs: DEFAULT_MERGE_WINDOW_SECS,
            revoked_retention_days: DEFAULT_RETENTION_DAYS,
            max_session_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }
}

impl SessionPolicy {
    /// Load the policy from environment variables with defaults.
    ///
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `SESSION_DEDUP_WINDOW_SECS` | `300`   |
    /// | `SESSION_RETENTION_DAYS`    | `90`    |
    /// | `SESSION_MAX_AGE_DAYS`      | `90`    |
    pub fn from_env() -> Self {
        Self {
            dedup_merge_window_secs: env_i64("SESSION_DEDUP_WINDOW_SECS", DEFAULT_MERGE_WINDOW_SECS),
            revoked_retention_days: env_i64("SESSION_RETENTION_DAYS", DEFAULT_RETENTION_DAYS),
            max_session_age_days: env_i64("SESSION_MAX_AGE_DAYS", DEFAULT_MAX_AGE_DAYS),
        }
    }

    /// Merge window as a duration.
    pub fn merge_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.dedup_merge_window_secs)
    }

    /// Cutoff before which revoked records are purged.
    pub fn revoked_cutoff(&self, now: Timestamp) -> Timestamp {
        now - chrono::Duration::days(self.revoked_retention_days)
    }

    /// Cutoff before which any record is purged.
    pub fn absolute_cutoff(&self, now: Timestamp) -> Timestamp {
        now - chrono::Duration::days(self.max_session_age_days)
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
