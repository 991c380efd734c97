//! Application service: the repository management screen.

use tracing::{debug, info};

use crate::application::navigator::{expect_text, list_lines, proceed_with_check, with_screen};
use crate::application::ports::Console;
use crate::domain::ConsoleError;
use crate::domain::repo::{CustomRepo, RepoListing, parse_repo_list};
use crate::domain::screen::{Screen, keys};

const CREATE_CUSTOM_KEY: &str = "c";

const CREATE_HEADER: &str = "The following repository will be created:";

fn yes_no(answer: bool) -> &'static str {
    if answer { keys::YES } else { keys::NO }
}

/// Creates a custom repository.
///
/// The summary the console prints before committing is checked line by line
/// against what was asked for, with the console's own defaulting rules
/// applied, and the repository is only created when it matches.
///
/// # Errors
///
/// [`ConsoleError::ConfirmationMismatch`] when the summary differs; nothing
/// is created in that case.
pub async fn add_custom_repo<C: Console>(console: &mut C, repo: &CustomRepo) -> Result<(), ConsoleError> {
    let repo = repo.clone();
    with_screen(console, Screen::Repo, move |c| {
        Box::pin(async move { create(c, &repo).await })
    })
    .await
}

async fn create<C: Console>(console: &mut C, repo: &CustomRepo) -> Result<(), ConsoleError> {
    let timeout = console.timeouts().default;

    console.send(CREATE_CUSTOM_KEY).await?;
    expect_text(console, "Unique ID for the custom repository.*:", timeout).await?;
    console.send(&repo.id).await?;
    let mut checklist = vec![format!("ID: {}", repo.id)];

    expect_text(console, "Display name for the custom repository.*:", timeout).await?;
    console.send(repo.display_name.as_deref().unwrap_or_default()).await?;
    checklist.push(format!("Name: {}", repo.effective_name()));

    expect_text(console, "Path at which the repository will be served.*:", timeout).await?;
    console.send(repo.path.as_deref().unwrap_or_default()).await?;
    checklist.push(format!("Path: {}", repo.effective_path()));

    expect_text(console, "Enter value.*:", timeout).await?;
    console.send(&repo.checksum).await?;

    expect_text(
        console,
        r"Should the repository require an entitlement certificate to access\? \(y/n\)",
        timeout,
    )
    .await?;
    console.send(yes_no(repo.entitlement)).await?;
    if let Some(entitlement) = repo.effective_entitlement() {
        expect_text(
            console,
            "Path that should be used when granting an entitlement for this repository.*:",
            timeout,
        )
        .await?;
        console
            .send(repo.entitlement_path.as_deref().unwrap_or_default())
            .await?;
        checklist.push(format!("Entitlement: {entitlement}"));
    }

    expect_text(console, r"packages are signed by a GPG key\? \(y/n\)", timeout).await?;
    if repo.gpg_check() {
        console.send(keys::YES).await?;
        checklist.push("GPG Check Yes".to_string());

        expect_text(
            console,
            r"Will the repository be used to host any Red Hat GPG signed content\? \(y/n\)",
            timeout,
        )
        .await?;
        console.send(yes_no(repo.redhat_gpg)).await?;
        checklist.push(format!(
            "Red Hat GPG Key: {}",
            if repo.redhat_gpg { "Yes" } else { "No" }
        ));

        expect_text(
            console,
            r"Will the repository be used to host any custom GPG signed content\? \(y/n\)",
            timeout,
        )
        .await?;
        if let Some(key) = &repo.custom_gpg {
            console.send(keys::YES).await?;
            expect_text(
                console,
                "Enter the absolute path to the public key of the GPG keypair:",
                timeout,
            )
            .await?;
            console.send(key).await?;
            expect_text(
                console,
                r"Would you like to enter another public key\? \(y/n\)",
                timeout,
            )
            .await?;
            console.send(keys::NO).await?;
            checklist.push(format!("Custom GPG Keys: '{key}'"));
        } else {
            console.send(keys::NO).await?;
            checklist.push("Custom GPG Keys: (None)".to_string());
        }
    } else {
        console.send(keys::NO).await?;
        checklist.push("GPG Check No".to_string());
        checklist.push("Red Hat GPG Key: No".to_string());
    }

    debug!(id = %repo.id, ?checklist, "verifying repository summary");
    proceed_with_check(console, None, CREATE_HEADER, &checklist).await?;
    expect_text(console, "Successfully created repository", timeout).await?;
    info!(id = %repo.id, "custom repository created");
    Ok(())
}

/// Lists Red Hat and custom repositories.
///
/// # Errors
///
/// Expectation failures; the console is back at the top-level prompt.
pub async fn list_repos<C: Console>(console: &mut C) -> Result<RepoListing, ConsoleError> {
    with_screen(console, Screen::Repo, |c| {
        Box::pin(async move {
            let text = list_lines(c, &Screen::Repo.prompt()).await?;
            Ok(parse_repo_list(&text))
        })
    })
    .await
}
