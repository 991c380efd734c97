//! Domain layer: console vocabulary, value objects and pure parsers.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod cds;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod repo;
pub mod screen;
pub mod summary;
pub mod text;

pub use cds::{Cds, parse_cds_list};
pub use config::{ConsoleConfig, Timeouts};
pub use entitlement::{Entitlement, UploadVerdict};
pub use error::ConsoleError;
pub use repo::{CustomRepo, RepoListing};
pub use screen::Screen;
