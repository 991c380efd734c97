//! SSH transport for the console.
//!
//! The console runs on the RHUA host and is reached through the system
//! `ssh` client with a forced tty (`-tt`), so `rhui-manager` behaves exactly
//! as it does for an operator.

use anyhow::{Context, Result};
use tracing::info;

use crate::application::ports::CommandRunner;
use crate::domain::ConsoleConfig;
use crate::infra::session::{Session, SshSession};

/// Connection options shared by the console and the probe.
///
/// # Errors
///
/// Returns an error when no console host is configured.
pub fn ssh_base_args(config: &ConsoleConfig) -> Result<Vec<String>> {
    let host = config
        .host
        .as_deref()
        .filter(|h| !h.is_empty())
        .context("no console host configured; pass --host or set `host` in the config file")?;

    let mut args = vec![
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-p".to_string(),
        config.port.to_string(),
    ];
    if let Some(identity) = &config.identity_file {
        args.push("-i".to_string());
        args.push(identity.clone());
    }
    args.push(format!("{}@{host}", config.user));
    Ok(args)
}

/// Arguments that start the console on the remote host under a forced tty.
///
/// # Errors
///
/// Returns an error when no console host is configured.
pub fn console_args(config: &ConsoleConfig) -> Result<Vec<String>> {
    let mut args = vec!["-tt".to_string()];
    args.extend(ssh_base_args(config)?);
    args.push(config.console_command.clone());
    Ok(args)
}

/// Single-quotes `s` for a POSIX shell.
#[must_use]
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Starts the console over SSH and returns the session driving it.
///
/// # Errors
///
/// Returns an error when no host is configured or `ssh` cannot be spawned.
pub fn connect(config: &ConsoleConfig, runner: &impl CommandRunner) -> Result<SshSession> {
    let args = console_args(config)?;
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    let mut child = runner.spawn("ssh", &arg_refs)?;
    let stdout = child.stdout.take().context("ssh stdout was not captured")?;
    let stdin = child.stdin.take().context("ssh stdin was not captured")?;

    info!(
        host = config.host.as_deref().unwrap_or_default(),
        command = %config.console_command,
        "console session started"
    );
    Ok(Session::new(stdout, stdin, config.timeouts.into()).with_child(child))
}
