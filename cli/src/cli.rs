//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, ConnectionFlags, OutputFlags};
use crate::commands;

/// Scripted driver for the RHUI administration console
#[derive(Parser)]
#[command(
    name = "rhuictl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Config file (default: ~/.rhuictl/config.yaml, or $RHUICTL_CONFIG)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Host running the console
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// SSH user on the console host
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// SSH private key for the console host
    #[arg(long, global = true, value_name = "FILE")]
    pub identity: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// More log output on stderr (-v debug, -vv console trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage Content Delivery Servers
    #[command(subcommand)]
    Cds(commands::cds::CdsCommand),

    /// Manage entitlement certificates
    #[command(subcommand)]
    Entitlements(commands::entitlements::EntitlementsCommand),

    /// Manage repositories
    #[command(subcommand)]
    Repo(commands::repo::RepoCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color: self.no_color,
                quiet: self.quiet,
                json: self.json,
            },
            behaviour: BehaviourFlags { yes: self.yes },
            connection: ConnectionFlags {
                config: self.config,
                host: self.host,
                user: self.user,
                identity: self.identity,
            },
        });

        match self.command {
            Command::Cds(cmd) => commands::cds::run(&app, cmd).await,
            Command::Entitlements(cmd) => commands::entitlements::run(&app, cmd).await,
            Command::Repo(cmd) => commands::repo::run(&app, cmd).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
        }
    }
}
