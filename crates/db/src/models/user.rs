//! Principal model.
//!
//! Principals are owned by the external authentication collaborator; the
//! session core only depends on their existence.

use serde::Serialize;
use sqlx::FromRow;
use vigil_core::types::{DbId, Timestamp};

/// A principal row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Principal {
    pub id: DbId,
    pub username: String,
    pub created_at: Timestamp,
}

/// DTO for creating a principal.
#[derive(Debug, Clone)]
pub struct CreatePrincipal {
    pub username: String,
}
