//! Session record model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use vigil_core::types::{DbId, Timestamp};

/// A session tracking row from the `session_records` table.
///
/// This is the shadow of an authoritative credential session: the
/// `session_id` correlates the two stores. Once `is_revoked` flips to
/// `true` it never reverts; the row is retained for a grace period and
/// then purged by the sweeper.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionRecord {
    pub id: DbId,
    pub session_id: String,
    pub user_id: DbId,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub device_type: Option<String>,
    pub device_fingerprint: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub created_at: Timestamp,
    pub last_active_at: Timestamp,
    pub is_revoked: bool,
}

/// DTO for creating a new session record.
#[derive(Debug, Clone)]
pub struct CreateSessionRecord {
    pub session_id: String,
    pub user_id: DbId,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub device_type: Option<String>,
    pub device_fingerprint: String,
    pub country: Option<String>,
    pub city: Option<String>,
}
