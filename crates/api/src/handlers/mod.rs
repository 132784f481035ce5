//! HTTP handlers, grouped by resource.

pub mod internal;
pub mod sessions;
