//! Application context: unified state passed to every command handler.
//!
//! Holds the output context, the config store and the connection overrides
//! given on the command line, and runs console dialogues over SSH on behalf
//! of the command handlers.

use std::path::PathBuf;

use anyhow::Result;
use futures_util::future::BoxFuture;

use crate::application::navigator::with_session;
use crate::application::ports::ConfigStore;
use crate::domain::{ConsoleConfig, ConsoleError};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::probe::SshArtifactProbe;
use crate::infra::session::SshSession;
use crate::infra::ssh;
use crate::output::OutputContext;
use crate::output::progress;

/// Environment variable holding the console login password.
pub const PASSWORD_ENV: &str = "RHUI_PASSWORD";

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Answer yes to confirmation prompts (also set by the `CI` env var).
    pub yes: bool,
}

/// Connection settings given on the command line; each overrides the
/// config file when set.
#[derive(Debug, Default)]
pub struct ConnectionFlags {
    pub config: Option<PathBuf>,
    pub host: Option<String>,
    pub user: Option<String>,
    pub identity: Option<String>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
    /// Connection overrides.
    pub connection: ConnectionFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Configuration file access.
    pub config_store: YamlConfigStore,
    /// When `true`, confirmation prompts are answered yes without asking.
    pub non_interactive: bool,
    connection: ConnectionFlags,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: AppFlags) -> Self {
        let non_interactive = flags.behaviour.yes || std::env::var("CI").is_ok();

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet || flags.output.json),
            mode,
            config_store: YamlConfigStore::new(flags.connection.config.clone()),
            non_interactive,
            connection: flags.connection,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// The config file with command-line and environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn effective_config(&self) -> Result<ConsoleConfig> {
        let mut config = self.config_store.load()?;
        apply_overrides(&mut config, &self.connection, std::env::var(PASSWORD_ENV).ok());
        Ok(config)
    }

    /// Probe that checks for files on the console host.
    ///
    /// # Errors
    ///
    /// Returns an error if no console host is configured.
    pub fn artifact_probe(&self) -> Result<SshArtifactProbe<TokioCommandRunner>> {
        SshArtifactProbe::new(TokioCommandRunner::default(), &self.effective_config()?)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (`--yes` or `CI`), returns `true`
    /// immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.non_interactive {
            return Ok(true);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;
        Ok(confirmed)
    }

    /// Starts the console over SSH, runs `body` against it behind a spinner
    /// labelled `label`, and closes the session.
    ///
    /// Console failures are returned as [`ConsoleError`] inside the
    /// `anyhow::Error`, so callers can still tell them apart.
    ///
    /// # Errors
    ///
    /// Connection failures and whatever the dialogue reports.
    pub async fn run_console<T, F>(&self, label: &str, body: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c mut SshSession) -> BoxFuture<'c, Result<T, ConsoleError>>,
    {
        let config = self.effective_config()?;
        let runner = TokioCommandRunner::default();
        let mut session = ssh::connect(&config, &runner)?;

        let pb = progress::spinner(&self.output, label);
        let outcome = with_session(&mut session, &config.login, body).await;
        match &outcome {
            Ok(_) => progress::finish_ok(&pb, label),
            Err(_) => progress::finish_failed(&pb),
        }
        Ok(outcome?)
    }
}

/// Layers command-line flags and the password variable over the file config.
fn apply_overrides(config: &mut ConsoleConfig, flags: &ConnectionFlags, password: Option<String>) {
    if let Some(host) = &flags.host {
        config.host = Some(host.clone());
    }
    if let Some(user) = &flags.user {
        config.user.clone_from(user);
    }
    if let Some(identity) = &flags.identity {
        config.identity_file = Some(identity.clone());
    }
    if let Some(password) = password.filter(|p| !p.is_empty()) {
        config.login.password = Some(password);
    }
}
