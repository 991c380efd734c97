//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`: never from `crate::infra`,
//! `crate::commands`, or `crate::output`.
//!
//! Futures returned by the console-facing ports are `Send` so that one
//! session per host can be driven from its own tokio task.

use std::future::Future;
use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use regex::Regex;

use crate::domain::ConsoleError;
use crate::domain::config::{ConsoleConfig, Timeouts};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Output consumed by a successful expectation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matched {
    /// Buffered text that preceded the match.
    pub before: String,
    /// The text the pattern matched.
    pub text: String,
}

// ── Console Port ──────────────────────────────────────────────────────────────

/// Capability interface of an interactive console session.
///
/// Every call blocks (asynchronously) until it is satisfied or times out;
/// callers never overlap calls on one session, which `&mut self` enforces.
pub trait Console: Send {
    /// Timeout policy for dialogues run over this session.
    fn timeouts(&self) -> Timeouts;

    /// Writes `text` followed by a line terminator.
    fn send(&mut self, text: &str) -> impl Future<Output = Result<(), ConsoleError>> + Send;

    /// Writes the interrupt character (Ctrl-C).
    fn send_interrupt(&mut self) -> impl Future<Output = Result<(), ConsoleError>> + Send;

    /// Waits until the buffered output matches `pattern`.
    ///
    /// The buffer is consumed up to and including the match.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::Timeout`] when `timeout` elapses first,
    /// [`ConsoleError::NoMatch`] when the channel ends first.
    fn expect(
        &mut self,
        pattern: &Regex,
        timeout: Duration,
    ) -> impl Future<Output = Result<Matched, ConsoleError>> + Send;

    /// Waits until one of `branches` matches and returns its tag.
    ///
    /// All patterns are evaluated, in list order, against the whole buffer
    /// each time output arrives; the first pattern in the list that matches
    /// wins, regardless of where in the buffer the match lies.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::NoMatch`] when the channel ends or `timeout` elapses
    /// before any branch matches.
    fn expect_branch<T>(
        &mut self,
        branches: &[(Regex, T)],
        timeout: Duration,
    ) -> impl Future<Output = Result<(T, Matched), ConsoleError>> + Send
    where
        T: Copy + Send + Sync;

    /// Drops buffered output nobody has consumed yet.
    fn discard_pending(&mut self);

    /// Closes the channel. Further sends fail with [`ConsoleError::Closed`].
    fn close(&mut self) -> impl Future<Output = Result<(), ConsoleError>> + Send;
}

// ── Artifact Probe Port ───────────────────────────────────────────────────────

/// Checks that a file the console will be pointed at exists, before any
/// console dialogue starts.
pub trait ArtifactProbe: Sync {
    /// Returns whether `path` exists where the console runs.
    fn exists(&self, path: &str) -> impl Future<Output = Result<bool>> + Send;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
pub trait CommandRunner: Sync {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    fn run(&self, program: &str, args: &[&str]) -> impl Future<Output = Result<Output>> + Send;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> impl Future<Output = Result<Output>> + Send;
    /// Spawn a program with piped stdin/stdout without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn spawn(&self, program: &str, args: &[&str]) -> Result<tokio::process::Child>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Loads and stores the rhuictl configuration file.
pub trait ConfigStore {
    /// Loads the configuration, falling back to defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<ConsoleConfig>;
    /// Writes the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &ConsoleConfig) -> Result<()>;
    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
