//! Typed console error taxonomy.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! Every console operation surfaces one of these to its immediate caller;
//! none is retried internally.

use std::time::Duration;

use thiserror::Error;

use crate::domain::screen::Screen;

/// Errors raised by the session primitive, the navigator and the
/// per-screen command modules.
#[derive(Debug, Error)]
pub enum ConsoleError {
    // ── Session primitive ─────────────────────────────────────────────────────
    #[error("timed out after {}s waiting for /{pattern}/", .waited.as_secs())]
    Timeout { pattern: String, waited: Duration },

    #[error("console output ended before any of {patterns:?} matched")]
    NoMatch { patterns: Vec<String> },

    #[error("console session is closed")]
    Closed,

    #[error("the console asks for a login but no password is configured")]
    LoginRequired,

    // ── Navigator ─────────────────────────────────────────────────────────────
    #[error("could not reach the {screen} screen; the console is in an unexpected state")]
    Navigation { screen: Screen },

    #[error("{header} is missing expected line(s): {}", .missing.join("; "))]
    ConfirmationMismatch { header: String, missing: Vec<String> },

    #[error("'{0}' is not offered for selection")]
    NoSuchEntity(String),

    // ── Command modules ───────────────────────────────────────────────────────
    #[error("{0} is already tracked but update was not requested")]
    AlreadyExists(String),

    #[error("the console cannot find {0}")]
    InvalidPath(String),

    #[error("missing artifact: {0}")]
    MissingArtifact(String),

    #[error("cannot check for {path}: {reason}")]
    ProbeFailed { path: String, reason: String },

    #[error("the provided certificate is expired or invalid")]
    BadCertificate,

    #[error("the provided certificate is not compatible with the RHUI")]
    IncompatibleCertificate,

    // ── Plumbing ──────────────────────────────────────────────────────────────
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid console pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ConsoleError {
    /// Stable machine-readable code, used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "TIMEOUT",
            Self::NoMatch { .. } => "NO_MATCH",
            Self::Closed => "CLOSED",
            Self::LoginRequired => "LOGIN_REQUIRED",
            Self::Navigation { .. } => "NAVIGATION",
            Self::ConfirmationMismatch { .. } => "CONFIRMATION_MISMATCH",
            Self::NoSuchEntity(_) => "NO_SUCH_ENTITY",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::InvalidPath(_) => "INVALID_PATH",
            Self::MissingArtifact(_) => "MISSING_ARTIFACT",
            Self::ProbeFailed { .. } => "PROBE_FAILED",
            Self::BadCertificate => "BAD_CERTIFICATE",
            Self::IncompatibleCertificate => "INCOMPATIBLE_CERTIFICATE",
            Self::Io(_) => "IO",
            Self::Pattern(_) => "PATTERN",
        }
    }
}
