//! Application services: one module per console screen.
//!
//! Each service drives a single screen's dialogues through the navigator.
//! Services import only from `crate::domain` and `crate::application`,
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

pub mod cds;
pub mod entitlements;
pub mod repo;
