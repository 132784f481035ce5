//! Session lifecycle services: reconciliation, revocation, and scheduled
//! sweeps over the two session stores.
//!
//! The tracking store (`session_records`) and the authoritative
//! credential store (`auth_sessions`) are kept eventually consistent:
//! user-initiated revocation mutates both, and the sweeper closes any
//! gap a partial failure leaves behind within one cycle.

pub mod credential;
pub mod policy;
pub mod principal;
pub mod reconciler;
pub mod revocation;
pub mod sweeper;

use vigil_core::error::CoreError;

/// Map a store-level failure onto the retryable domain error.
pub(crate) fn store_unavailable(err: sqlx::Error) -> CoreError {
    CoreError::Unavailable(err.to_string())
}
