//! `rhuictl config`: show the effective configuration and where it lives.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::output::human::HumanRenderer;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (file plus flags)
    Show,
    /// Print the config file path
    Path,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the config file cannot be located or parsed.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Path => show_path(app),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let mut config = app.effective_config()?;
    let path = app.config_store.path()?;
    if app.is_json() {
        if config.login.password.is_some() {
            config.login.password = Some("********".to_string());
        }
        json::print(&json!({ "path": path, "config": config }))?;
    } else {
        HumanRenderer::new(&app.output).render_config(&config, &path);
        if config.host.as_deref().is_none_or(str::is_empty) {
            app.output
                .warn("no console host configured; console commands need --host or `host` in the config file");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn show_path(app: &AppContext) -> Result<ExitCode> {
    let path = app.config_store.path()?;
    if app.is_json() {
        json::print(&json!({ "path": path }))?;
    } else {
        println!("{}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
