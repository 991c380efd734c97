//! Application service: the Content Delivery Server (CDS) management screen.

use regex::Regex;
use tracing::{debug, info};

use crate::application::navigator::{
    PROCEED_PATTERN, expect_text, list_lines, proceed_with_check, select_items, with_screen,
};
use crate::application::ports::Console;
use crate::domain::cds::{Cds, parse_cds_list};
use crate::domain::screen::{Screen, keys};
use crate::domain::ConsoleError;

const ADD_KEY: &str = "a";
const DELETE_KEY: &str = "d";

const UNREGISTER_HEADER: &str = "The following CDS instances will be unregistered:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Registration {
    New,
    AlreadyTracked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyPath {
    NotFound,
    Accepted,
}

/// Registers `cds` with the console.
///
/// When the hostname is already tracked the registration only proceeds if
/// `update` is set, in which case the existing entry is reconfigured.
///
/// # Errors
///
/// [`ConsoleError::AlreadyExists`] for a tracked host without `update`,
/// [`ConsoleError::InvalidPath`] when the console cannot find the SSH key.
/// Either way the console is back at the top-level prompt.
pub async fn add_cds<C: Console>(console: &mut C, cds: &Cds, update: bool) -> Result<(), ConsoleError> {
    let cds = cds.clone();
    with_screen(console, Screen::Cds, move |c| {
        Box::pin(async move { register(c, &cds, update).await })
    })
    .await
}

async fn register<C: Console>(console: &mut C, cds: &Cds, update: bool) -> Result<(), ConsoleError> {
    let timeouts = console.timeouts();
    let host = regex::escape(&cds.host_name);
    let username_question = format!("Username with SSH access to {host} and sudo privileges:");

    console.send(ADD_KEY).await?;
    expect_text(console, "Hostname of the CDS instance to register:", timeouts.default).await?;
    console.send(&cds.host_name).await?;

    let branches = [
        (Regex::new(&format!("(?s){username_question}"))?, Registration::New),
        (
            Regex::new(
                r"(?s)A Content Delivery Server instance with that hostname exists.*Continue\?\s+\(y/n\): ",
            )?,
            Registration::AlreadyTracked,
        ),
    ];
    let (registration, _) = console.expect_branch(&branches, timeouts.default).await?;
    if registration == Registration::AlreadyTracked {
        if !update {
            return Err(ConsoleError::AlreadyExists(cds.host_name.clone()));
        }
        debug!(host = %cds.host_name, "CDS already tracked; updating");
        console.send(keys::YES).await?;
        expect_text(console, &username_question, timeouts.default).await?;
    }

    console.send(&cds.user_name).await?;
    expect_text(
        console,
        &format!(
            "Absolute path to an SSH private key to log into {host} as {}:",
            regex::escape(&cds.user_name)
        ),
        timeouts.default,
    )
    .await?;
    console.send(&cds.ssh_key_path).await?;

    let branches = [
        (
            Regex::new(r"(?s)Cannot find file, please enter a valid path")?,
            KeyPath::NotFound,
        ),
        (Regex::new(&format!("(?s){PROCEED_PATTERN}"))?, KeyPath::Accepted),
    ];
    let (key_path, _) = console.expect_branch(&branches, timeouts.default).await?;
    if key_path == KeyPath::NotFound {
        return Err(ConsoleError::InvalidPath(cds.ssh_key_path.clone()));
    }

    console.send(keys::YES).await?;
    // The console now installs and configures the CDS; give it time.
    expect_text(
        console,
        r"(?s)The CDS was successfully configured\..*rhui \(.*\) =>",
        timeouts.configure,
    )
    .await?;
    info!(host = %cds.host_name, "CDS registered");
    Ok(())
}

/// Unregisters the CDSes with the given hostnames.
///
/// An empty `hosts` list is a no-op: nothing is sent to the console.
///
/// # Errors
///
/// [`ConsoleError::NoSuchEntity`] when a host is not registered,
/// [`ConsoleError::ConfirmationMismatch`] when the console's summary does not
/// name exactly what was selected.
pub async fn delete_cdses<C: Console>(console: &mut C, hosts: &[String]) -> Result<(), ConsoleError> {
    if hosts.is_empty() {
        debug!("no CDSes to unregister");
        return Ok(());
    }
    let hosts = hosts.to_vec();
    with_screen(console, Screen::Cds, move |c| {
        Box::pin(async move { unregister(c, &hosts).await })
    })
    .await
}

async fn unregister<C: Console>(console: &mut C, hosts: &[String]) -> Result<(), ConsoleError> {
    let timeouts = console.timeouts();
    console.send(DELETE_KEY).await?;
    select_items(console, hosts).await?;
    proceed_with_check(console, Some(keys::CONFIRM_SELECTION), UNREGISTER_HEADER, hosts).await?;
    expect_text(console, r"(?s)Unregistered.*rhui \(.*\) =>", timeouts.configure).await?;
    info!(?hosts, "CDSes unregistered");
    Ok(())
}

/// Lists the registered CDSes in console order.
///
/// # Errors
///
/// Expectation failures; the console is back at the top-level prompt.
pub async fn list_cds<C: Console>(console: &mut C) -> Result<Vec<Cds>, ConsoleError> {
    with_screen(console, Screen::Cds, |c| {
        Box::pin(async move {
            let lines = list_lines(c, &Screen::Cds.prompt()).await?;
            Ok(parse_cds_list(&lines))
        })
    })
    .await
}
