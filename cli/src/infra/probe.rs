//! Infrastructure implementations of the `ArtifactProbe` port.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::application::ports::{ArtifactProbe, CommandRunner};
use crate::domain::ConsoleConfig;
use crate::infra::ssh::{shell_quote, ssh_base_args};

/// Probe for consoles running on this machine.
pub struct LocalArtifactProbe;

impl ArtifactProbe for LocalArtifactProbe {
    async fn exists(&self, path: &str) -> Result<bool> {
        tokio::fs::try_exists(Path::new(path))
            .await
            .with_context(|| format!("cannot check {path}"))
    }
}

/// Probe that runs `test -e` on the console host over SSH.
pub struct SshArtifactProbe<R> {
    runner: R,
    ssh_args: Vec<String>,
}

impl<R: CommandRunner> SshArtifactProbe<R> {
    /// # Errors
    ///
    /// Returns an error when no console host is configured.
    pub fn new(runner: R, config: &ConsoleConfig) -> Result<Self> {
        Ok(Self {
            runner,
            ssh_args: ssh_base_args(config)?,
        })
    }
}

impl<R: CommandRunner> ArtifactProbe for SshArtifactProbe<R> {
    async fn exists(&self, path: &str) -> Result<bool> {
        let test = format!("test -e {}", shell_quote(path));
        let mut args: Vec<&str> = self.ssh_args.iter().map(String::as_str).collect();
        args.push(&test);

        let output = self.runner.run("ssh", &args).await?;
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            code => bail!(
                "ssh exited with {}: {}",
                code.map_or_else(|| "a signal".to_string(), |c| c.to_string()),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }
    }
}
