//! Command implementations

pub mod cds;
pub mod config;
pub mod entitlements;
pub mod repo;
