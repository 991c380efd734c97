//! `rhuictl cds`: register, unregister and list Content Delivery Servers.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::application::services::cds;
use crate::domain::Cds;
use crate::domain::cds::{DEFAULT_CDS_SSH_KEY, DEFAULT_CDS_USER};
use crate::output::human::HumanRenderer;
use crate::output::json;

/// CDS subcommands.
#[derive(Subcommand)]
pub enum CdsCommand {
    /// List registered CDSes
    List,
    /// Register a CDS
    Add(AddArgs),
    /// Unregister CDSes
    Remove {
        /// Hostnames to unregister
        #[arg(required = true)]
        hosts: Vec<String>,
    },
}

/// Arguments for `cds add`.
#[derive(Args)]
pub struct AddArgs {
    /// Hostname of the CDS
    pub host: String,
    /// SSH user the console logs into the CDS as
    #[arg(long, default_value = DEFAULT_CDS_USER)]
    pub user: String,
    /// SSH private key, as a path on the console host
    #[arg(long, default_value = DEFAULT_CDS_SSH_KEY)]
    pub key: String,
    /// Reconfigure the CDS if it is already registered
    #[arg(long)]
    pub update: bool,
}

/// Run the cds command.
///
/// # Errors
///
/// Connection and console failures.
pub async fn run(app: &AppContext, cmd: CdsCommand) -> Result<ExitCode> {
    match cmd {
        CdsCommand::List => list(app).await,
        CdsCommand::Add(args) => add(app, args).await,
        CdsCommand::Remove { hosts } => remove(app, hosts).await,
    }
}

async fn list(app: &AppContext) -> Result<ExitCode> {
    let cdses = app
        .run_console("Listing CDSes", |c| Box::pin(cds::list_cds(c)))
        .await?;
    if app.is_json() {
        json::print(&cdses)?;
    } else {
        HumanRenderer::new(&app.output).render_cds_list(&cdses);
    }
    Ok(ExitCode::SUCCESS)
}

async fn add(app: &AppContext, args: AddArgs) -> Result<ExitCode> {
    let target = Cds::new(args.host).with_user(args.user).with_ssh_key(args.key);
    let update = args.update;

    let registered = target.clone();
    app.run_console(&format!("Registering {}", target.host_name), move |c| {
        Box::pin(async move { cds::add_cds(c, &registered, update).await })
    })
    .await?;

    if app.is_json() {
        json::print(&serde_json::json!({ "registered": target }))?;
    } else {
        app.output
            .success(&format!("CDS {} registered", target.host_name));
    }
    Ok(ExitCode::SUCCESS)
}

async fn remove(app: &AppContext, hosts: Vec<String>) -> Result<ExitCode> {
    let listed = hosts.join(", ");
    if !app.confirm(&format!("Unregister {listed}?"))? {
        app.output.info("Nothing unregistered.");
        return Ok(ExitCode::SUCCESS);
    }

    let selected = hosts.clone();
    app.run_console(&format!("Unregistering {listed}"), move |c| {
        Box::pin(async move { cds::delete_cdses(c, &selected).await })
    })
    .await?;

    if app.is_json() {
        json::print(&serde_json::json!({ "unregistered": hosts }))?;
    } else {
        app.output.success(&format!("Unregistered {listed}"));
    }
    Ok(ExitCode::SUCCESS)
}
