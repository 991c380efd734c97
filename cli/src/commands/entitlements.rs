//! `rhuictl entitlements`: list entitlements and upload the Red Hat
//! content certificate.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::services::entitlements;
use crate::domain::entitlement::DEFAULT_CERTIFICATE_PATH;
use crate::output::human::HumanRenderer;
use crate::output::json;

/// Entitlements subcommands.
#[derive(Subcommand)]
pub enum EntitlementsCommand {
    /// Print the console's entitlement listing as is
    List,
    /// List Red Hat entitlements
    Rh,
    /// List custom repository entitlements
    Custom,
    /// Upload a new or updated Red Hat content certificate
    Upload {
        /// Certificate path on the console host
        #[arg(default_value = DEFAULT_CERTIFICATE_PATH)]
        path: String,
    },
}

/// Run the entitlements command.
///
/// # Errors
///
/// Connection and console failures.
pub async fn run(app: &AppContext, cmd: EntitlementsCommand) -> Result<ExitCode> {
    match cmd {
        EntitlementsCommand::List => {
            let text = app
                .run_console("Listing entitlements", |c| {
                    Box::pin(entitlements::list_entitlements(c))
                })
                .await?;
            if app.is_json() {
                json::print(&serde_json::json!({ "listing": text }))?;
            } else {
                print!("{text}");
            }
        }
        EntitlementsCommand::Rh => {
            let list = app
                .run_console("Listing Red Hat entitlements", |c| {
                    Box::pin(entitlements::list_rh_entitlements(c))
                })
                .await?;
            if app.is_json() {
                json::print(&list)?;
            } else {
                HumanRenderer::new(&app.output).render_rh_entitlements(&list);
            }
        }
        EntitlementsCommand::Custom => {
            let names = app
                .run_console("Listing custom entitlements", |c| {
                    Box::pin(entitlements::list_custom_entitlements(c))
                })
                .await?;
            if app.is_json() {
                json::print(&names)?;
            } else {
                HumanRenderer::new(&app.output).render_custom_entitlements(&names);
            }
        }
        EntitlementsCommand::Upload { path } => {
            let probe = app.artifact_probe()?;
            let certificate = path.clone();
            let granted = app
                .run_console(&format!("Uploading {path}"), move |c| {
                    Box::pin(async move {
                        entitlements::upload_rh_certificate(c, &probe, &certificate).await
                    })
                })
                .await?;
            if app.is_json() {
                json::print(&granted)?;
            } else {
                app.output.success(&format!("Uploaded {path}"));
                HumanRenderer::new(&app.output).render_rh_entitlements(&granted);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
