//! Cron-invoked session cleanup binary.
//!
//! Runs one sweep (expiry, duplicate collapse, orphan sweep, credential
//! sync repair) and exits. The external timer owns the schedule; running
//! two invocations back-to-back is safe because every job is idempotent.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vigil_lifecycle::credential::PgCredentialSessions;
use vigil_lifecycle::policy::SessionPolicy;
use vigil_lifecycle::principal::PgPrincipalDirectory;
use vigil_lifecycle::sweeper::Sweeper;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil_sweeper=info,vigil_lifecycle=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = vigil_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    vigil_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    let policy = SessionPolicy::from_env();
    tracing::info!(
        merge_window_secs = policy.dedup_merge_window_secs,
        retention_days = policy.revoked_retention_days,
        max_age_days = policy.max_session_age_days,
        "Starting session sweep"
    );

    let sweeper = Sweeper::new(
        pool.clone(),
        Arc::new(PgPrincipalDirectory::new(pool.clone())),
        Arc::new(PgCredentialSessions::new(pool.clone())),
        policy,
    );

    let report = sweeper.run_scheduled_cleanup().await;

    tracing::info!(
        expired = report.expired_sessions,
        orphaned = report.orphaned_sessions,
        duplicates = report.duplicates_removed,
        resynced = report.credential_resyncs,
        "Sweep finished"
    );
}
