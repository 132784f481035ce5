//! Shared fixtures for lifecycle integration tests.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use vigil_core::device;
use vigil_core::error::CoreError;
use vigil_core::types::DbId;
use vigil_db::models::session::{CreateSessionRecord, SessionRecord};
use vigil_db::models::user::CreatePrincipal;
use vigil_db::repositories::{CredentialSessionRepo, SessionRepo, UserRepo};
use vigil_lifecycle::credential::CredentialSessionSink;
use vigil_lifecycle::principal::PrincipalDirectory;

pub const CHROME_WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const FIREFOX_LINUX: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

/// Create a principal row and return its id.
pub async fn create_principal(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreatePrincipal {
            username: username.to_string(),
        },
    )
    .await
    .expect("principal creation should succeed")
    .id
}

/// Create a tracking record plus its authoritative credential row, the
/// way the issue hook does in production.
pub async fn create_session(
    pool: &PgPool,
    session_id: &str,
    user_id: DbId,
    user_agent: &str,
    ip_address: &str,
) -> SessionRecord {
    CredentialSessionRepo::insert(pool, session_id, user_id)
        .await
        .expect("credential insert should succeed");

    let info = device::parse_user_agent(user_agent);
    let input = CreateSessionRecord {
        session_id: session_id.to_string(),
        user_id,
        ip_address: Some(ip_address.to_string()),
        user_agent: Some(user_agent.to_string()),
        browser: info.browser,
        os: info.os,
        device_type: info.device_type,
        device_fingerprint: device::fingerprint(Some(user_agent), Some(ip_address)),
        country: None,
        city: None,
    };
    SessionRepo::create(pool, &input)
        .await
        .expect("session creation should succeed")
}

/// Move a record's creation time into the past (activity time stays put,
/// so the `last_active_at >= created_at` constraint holds).
pub async fn backdate_created(pool: &PgPool, session_id: &str, secs: i64) {
    sqlx::query(
        "UPDATE session_records
         SET created_at = created_at - make_interval(secs => $2)
         WHERE session_id = $1",
    )
    .bind(session_id)
    .bind(secs as f64)
    .execute(pool)
    .await
    .expect("backdate should succeed");
}

/// Move a record wholly into the past: both creation and last activity.
pub async fn backdate_session(pool: &PgPool, session_id: &str, days: i64) {
    sqlx::query(
        "UPDATE session_records
         SET created_at = created_at - make_interval(days => $2),
             last_active_at = last_active_at - make_interval(days => $2)
         WHERE session_id = $1",
    )
    .bind(session_id)
    .bind(days as i32)
    .execute(pool)
    .await
    .expect("backdate should succeed");
}

/// Read back a record's revocation flag.
pub async fn is_revoked(pool: &PgPool, session_id: &str) -> bool {
    SessionRepo::find_by_session_id(pool, session_id)
        .await
        .expect("lookup should succeed")
        .expect("record should exist")
        .is_revoked
}

/// A principal directory that always fails, for partial-failure paths.
pub struct FailingDirectory;

#[async_trait]
impl PrincipalDirectory for FailingDirectory {
    async fn existing_ids(&self, _candidates: &[DbId]) -> Result<HashSet<DbId>, CoreError> {
        Err(CoreError::Unavailable("directory offline".into()))
    }
}

/// A credential sink that always fails, for partial-sync paths.
pub struct FailingSink;

#[async_trait]
impl CredentialSessionSink for FailingSink {
    async fn delete(&self, _session_id: &str) -> Result<bool, CoreError> {
        Err(CoreError::Unavailable("credential store offline".into()))
    }

    async fn delete_all_for_user(&self, _user_id: DbId) -> Result<u64, CoreError> {
        Err(CoreError::Unavailable("credential store offline".into()))
    }

    async fn stale_after_revocation(&self) -> Result<Vec<String>, CoreError> {
        Err(CoreError::Unavailable("credential store offline".into()))
    }
}
