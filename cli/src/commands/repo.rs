//! `rhuictl repo`: list repositories and create custom ones.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::services::repo;
use crate::domain::CustomRepo;
use crate::domain::repo::DEFAULT_CHECKSUM_CHOICE;
use crate::output::human::HumanRenderer;
use crate::output::json;

/// Repo subcommands.
#[derive(Subcommand)]
pub enum RepoCommand {
    /// List Red Hat and custom repositories
    List,
    /// Create a custom repository
    Create(CreateArgs),
}

/// Arguments for `repo create`.
#[derive(Args)]
pub struct CreateArgs {
    /// Unique repository ID
    pub id: String,
    /// Display name (default: the ID)
    #[arg(long)]
    pub name: Option<String>,
    /// Path the repository is served at (default: the ID)
    #[arg(long)]
    pub path: Option<String>,
    /// Checksum menu choice
    #[arg(long, default_value = DEFAULT_CHECKSUM_CHOICE)]
    pub checksum: String,
    /// Do not require an entitlement certificate
    #[arg(long)]
    pub no_entitlement: bool,
    /// Entitlement path (default: guessed from the served path)
    #[arg(long, conflicts_with = "no_entitlement")]
    pub entitlement_path: Option<String>,
    /// The repository hosts no Red Hat GPG signed content
    #[arg(long)]
    pub no_redhat_gpg: bool,
    /// Public key of a custom GPG keypair, on the console host
    #[arg(long, value_name = "FILE")]
    pub custom_gpg: Option<String>,
}

impl From<CreateArgs> for CustomRepo {
    fn from(args: CreateArgs) -> Self {
        Self {
            display_name: args.name,
            path: args.path,
            checksum: args.checksum,
            entitlement: !args.no_entitlement,
            entitlement_path: args.entitlement_path,
            redhat_gpg: !args.no_redhat_gpg,
            custom_gpg: args.custom_gpg,
            ..CustomRepo::new(args.id)
        }
    }
}

/// Run the repo command.
///
/// # Errors
///
/// Connection and console failures.
pub async fn run(app: &AppContext, cmd: RepoCommand) -> Result<ExitCode> {
    match cmd {
        RepoCommand::List => {
            let listing = app
                .run_console("Listing repositories", |c| Box::pin(repo::list_repos(c)))
                .await?;
            if app.is_json() {
                json::print(&listing)?;
            } else {
                HumanRenderer::new(&app.output).render_repos(&listing);
            }
        }
        RepoCommand::Create(args) => {
            let custom = CustomRepo::from(args);
            let id = custom.id.clone();
            app.run_console(&format!("Creating repository {id}"), move |c| {
                Box::pin(async move { repo::add_custom_repo(c, &custom).await })
            })
            .await?;
            if app.is_json() {
                json::print(&serde_json::json!({ "created": id }))?;
            } else {
                app.output.success(&format!("Repository {id} created"));
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
