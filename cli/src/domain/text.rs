//! Text clean-up shared by the console output parsers.

use std::sync::LazyLock;

use regex::Regex;

/// CSI escape sequences (colours, cursor movement) emitted by the console.
#[allow(clippy::expect_used)] // compile-time constant pattern
static ANSI_ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("valid regex"));

/// Removes ANSI escape sequences from console output.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    ANSI_ESCAPE_RE.replace_all(text, "").into_owned()
}

/// Normalizes one summary line: trims it, turns tabs into spaces and
/// collapses whitespace runs to a single space.
#[must_use]
pub fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits console output into lines, tolerating `\r\n`, bare `\r` and ANSI
/// colouring.
pub fn clean_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(['\n', '\r']).map(strip_ansi)
}
