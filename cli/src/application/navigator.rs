//! Screen navigator: moves the console between screens and hosts the
//! dialogue helpers every screen shares.
//!
//! Command modules never open or leave screens themselves: they hand their
//! dialogue to [`with_screen`], which opens the screen and, whatever the
//! dialogue's outcome, brings the console back to the top-level prompt (or
//! closes the session when that is impossible).

use std::sync::LazyLock;
use std::time::Duration;

use futures_util::future::BoxFuture;
use regex::Regex;
use tracing::{debug, warn};

use crate::application::ports::{Console, Matched};
use crate::domain::ConsoleError;
use crate::domain::config::LoginConfig;
use crate::domain::screen::{Screen, TOP_LEVEL_PROMPT, keys};
use crate::domain::summary::missing_lines;
use crate::domain::text::strip_ansi;

/// Confirmation question that ends every summary block.
pub const PROCEED_PATTERN: &str = r"Proceed\? \(y/n\)";

/// Footer of a multi-selection menu.
const SELECTION_FOOTER: &str = r"for more commands:";

#[allow(clippy::expect_used)] // compile-time constant patterns
static TOP_LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TOP_LEVEL_PROMPT).expect("valid regex"));

#[allow(clippy::expect_used)]
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RHUI Username:").expect("valid regex"));

#[allow(clippy::expect_used)]
static SELECTION_FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SELECTION_FOOTER).expect("valid regex"));

/// Compiles `pattern` and waits for it.
///
/// # Errors
///
/// Propagates [`Console::expect`] failures and invalid patterns.
pub async fn expect_text<C: Console>(
    console: &mut C,
    pattern: &str,
    timeout: Duration,
) -> Result<Matched, ConsoleError> {
    let re = Regex::new(pattern)?;
    console.expect(&re, timeout).await
}

// ── Session entry and exit ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Greeting {
    Ready,
    Login,
}

/// Waits for the console's top-level prompt after it starts, logging in
/// first when the console asks for credentials.
///
/// # Errors
///
/// [`ConsoleError::LoginRequired`] when a login is requested but no
/// password is configured; expectation failures otherwise.
pub async fn wait_for_top_level<C: Console>(
    console: &mut C,
    login: &LoginConfig,
) -> Result<(), ConsoleError> {
    let timeout = console.timeouts().default;
    let branches = [
        (TOP_LEVEL_RE.clone(), Greeting::Ready),
        (USERNAME_RE.clone(), Greeting::Login),
    ];
    let (greeting, _) = console.expect_branch(&branches, timeout).await?;
    if greeting == Greeting::Login {
        let password = login.password.as_deref().ok_or(ConsoleError::LoginRequired)?;
        debug!(username = %login.username, "logging in to the console");
        console.send(&login.username).await?;
        expect_text(console, r"RHUI Password:", timeout).await?;
        console.send(password).await?;
        console.expect(&TOP_LEVEL_RE, timeout).await?;
    }
    Ok(())
}

/// Ends the console from the top-level prompt.
///
/// # Errors
///
/// Fails when the quit key cannot be written.
pub async fn quit_console<C: Console>(console: &mut C) -> Result<(), ConsoleError> {
    console.send(keys::QUIT).await
}

/// Runs `body` over a freshly started console: waits for the top-level
/// prompt (logging in if asked), runs the body, quits the console.
///
/// The session is closed on every exit path.
///
/// # Errors
///
/// The first failure among login, body and quit.
pub async fn with_session<C, T, F>(console: &mut C, login: &LoginConfig, body: F) -> Result<T, ConsoleError>
where
    C: Console,
    F: for<'c> FnOnce(&'c mut C) -> BoxFuture<'c, Result<T, ConsoleError>>,
{
    let outcome = async {
        wait_for_top_level(console, login).await?;
        let value = body(&mut *console).await?;
        quit_console(console).await?;
        Ok(value)
    }
    .await;

    close_session(console).await;
    outcome
}

async fn close_session<C: Console>(console: &mut C) {
    if let Err(e) = console.close().await {
        warn!(error = %e, "closing console session failed");
    }
}

// ── Screens ───────────────────────────────────────────────────────────────────

/// Opens `screen` from the top-level prompt.
///
/// # Errors
///
/// [`ConsoleError::Navigation`] when the screen prompt does not appear within
/// the navigation timeout. The caller must not retry blindly: the console was
/// not where it was supposed to be.
pub async fn open_screen<C: Console>(console: &mut C, screen: Screen) -> Result<(), ConsoleError> {
    debug!(%screen, "opening screen");
    let timeout = console.timeouts().navigation;
    let prompt = Regex::new(&screen.prompt())?;
    console.send(screen.key()).await?;
    match console.expect(&prompt, timeout).await {
        Ok(_) => Ok(()),
        Err(ConsoleError::Timeout { .. } | ConsoleError::NoMatch { .. }) => {
            Err(ConsoleError::Navigation { screen })
        }
        Err(e) => Err(e),
    }
}

/// Returns from a screen to the top-level prompt.
///
/// # Errors
///
/// Propagates expectation failures.
pub async fn leave_screen<C: Console>(console: &mut C, screen: Screen) -> Result<(), ConsoleError> {
    debug!(%screen, "leaving screen");
    let timeout = console.timeouts().navigation;
    console.send(keys::HOME).await?;
    console.expect(&TOP_LEVEL_RE, timeout).await?;
    Ok(())
}

/// Aborts whatever dialogue is in progress and returns to the top-level
/// prompt: interrupt, `home`, wait for the prompt. Closes the session when
/// the prompt does not come back, so it cannot be reused in an unknown state.
///
/// `q` is not used here: it ends `rhui-manager` rather than the screen.
async fn recover<C: Console>(console: &mut C, screen: Screen) {
    let timeout = console.timeouts().navigation;
    console.discard_pending();
    let outcome = async {
        console.send_interrupt().await?;
        console.send(keys::HOME).await?;
        console.expect(&TOP_LEVEL_RE, timeout).await
    }
    .await;

    if let Err(e) = outcome {
        warn!(%screen, error = %e, "console did not return to the top level; closing session");
        close_session(console).await;
    }
}

/// Runs a screen dialogue inside a guaranteed open/leave-or-recover scope.
///
/// On success the console is returned to the top-level prompt. When the
/// dialogue or the return to the top level fails, the interrupt + `home`
/// recovery runs before the error is handed back unchanged. A screen that
/// does not open means the console is somewhere unknown; the session is
/// closed instead of retried.
///
/// # Errors
///
/// [`ConsoleError::Navigation`] when the screen cannot be opened, the
/// dialogue's own error, or a failure to leave the screen afterwards.
pub async fn with_screen<C, T, F>(console: &mut C, screen: Screen, body: F) -> Result<T, ConsoleError>
where
    C: Console,
    F: for<'c> FnOnce(&'c mut C) -> BoxFuture<'c, Result<T, ConsoleError>>,
{
    if let Err(e) = open_screen(console, screen).await {
        warn!(%screen, error = %e, "screen did not open; closing session");
        close_session(console).await;
        return Err(e);
    }
    match body(&mut *console).await {
        Ok(value) => match leave_screen(console, screen).await {
            Ok(()) => Ok(value),
            Err(e) => {
                debug!(%screen, error = %e, "screen did not return to the top level; recovering console");
                recover(console, screen).await;
                Err(e)
            }
        },
        Err(e) => {
            debug!(%screen, error = %e, "dialogue failed; recovering console");
            recover(console, screen).await;
            Err(e)
        }
    }
}

// ── Shared dialogues ──────────────────────────────────────────────────────────

/// Sends `key` and captures everything printed before `prompt` reappears.
///
/// # Errors
///
/// [`ConsoleError::Timeout`] when the prompt never reappears.
pub async fn capture<C: Console>(
    console: &mut C,
    key: &str,
    prompt: &str,
) -> Result<String, ConsoleError> {
    let timeout = console.timeouts().default;
    let prompt = Regex::new(prompt)?;
    console.send(key).await?;
    let matched = console.expect(&prompt, timeout).await?;
    Ok(matched.before)
}

/// Lists the current screen's entities: the list key, then everything up to
/// the reappearing `prompt`.
///
/// # Errors
///
/// [`ConsoleError::Timeout`] when the prompt never reappears.
pub async fn list_lines<C: Console>(console: &mut C, prompt: &str) -> Result<String, ConsoleError> {
    capture(console, keys::LIST, prompt).await
}

/// Verifies the summary block the console echoes before committing a change,
/// then confirms it.
///
/// `trigger`, when given, is sent first to make the console print the
/// summary. The block runs from `header` to the `Proceed? (y/n)` question;
/// every line of `expected` must occur in it.
///
/// # Errors
///
/// [`ConsoleError::ConfirmationMismatch`] listing the absent lines; the
/// confirmation is not sent in that case.
pub async fn proceed_with_check<C: Console>(
    console: &mut C,
    trigger: Option<&str>,
    header: &str,
    expected: &[String],
) -> Result<(), ConsoleError> {
    let timeout = console.timeouts().default;
    let pattern = Regex::new(&format!(r"(?s){}.*?{PROCEED_PATTERN}", regex::escape(header)))?;
    if let Some(key) = trigger {
        console.send(key).await?;
    }
    let matched = console.expect(&pattern, timeout).await?;
    let summary = matched.text.strip_prefix(header).unwrap_or(matched.text.as_str());

    let missing = missing_lines(summary, expected);
    if !missing.is_empty() {
        warn!(header, ?missing, "summary does not match the requested change");
        return Err(ConsoleError::ConfirmationMismatch {
            header: header.to_string(),
            missing,
        });
    }
    console.send(keys::YES).await
}

/// Toggles `items` in the multi-selection menu currently on screen.
///
/// Each item is looked up by name in the menu (`-  <n> : <item>`), its number
/// sent, and the redrawn menu checked for the item's `x` marker. The menu is
/// left open; confirming it is up to the caller.
///
/// # Errors
///
/// [`ConsoleError::NoSuchEntity`] when an item is not offered or does not
/// become selected.
pub async fn select_items<C: Console>(console: &mut C, items: &[String]) -> Result<(), ConsoleError> {
    let timeout = console.timeouts().default;
    let mut menu = console.expect(&SELECTION_FOOTER_RE, timeout).await?.before;

    for item in items {
        let escaped = regex::escape(item);
        let offered = Regex::new(&format!(r"(?m)^\s*-\s+(\d+)\s*:\s*{escaped}\s*$"))?;
        let selected = Regex::new(&format!(r"(?m)^\s*x\s+\d+\s*:\s*{escaped}\s*$"))?;

        let clean = strip_ansi(&menu);
        if selected.is_match(&clean) {
            continue;
        }
        let index = offered
            .captures(&clean)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ConsoleError::NoSuchEntity(item.clone()))?;

        debug!(item = %item, index = %index, "selecting item");
        console.send(&index).await?;
        menu = console.expect(&SELECTION_FOOTER_RE, timeout).await?.before;
        if !selected.is_match(&strip_ansi(&menu)) {
            return Err(ConsoleError::NoSuchEntity(item.clone()));
        }
    }
    Ok(())
}
