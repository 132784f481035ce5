//! Domain logic for session lifecycle tracking.
//!
//! Pure types and algorithms only -- no I/O. Persistence lives in
//! `vigil-db`, orchestration in `vigil-lifecycle`.

pub mod dedup;
pub mod device;
pub mod error;
pub mod types;
