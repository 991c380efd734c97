//! Checklist verification for console confirmation summaries.
//!
//! Before a create/remove is confirmed the console echoes a summary block.
//! Every line the caller expects must appear in it, otherwise the operation
//! would commit settings nobody asked for.

use crate::domain::text::{clean_lines, normalize_line};

/// Returns the expected lines that do not occur in `summary`.
///
/// Each summary line is normalized with [`normalize_line`]; an expected line
/// (normalized the same way) is present when it is a substring of at least
/// one summary line. Order is irrelevant. The returned lines keep the
/// caller's spelling and order.
#[must_use]
pub fn missing_lines(summary: &str, expected: &[String]) -> Vec<String> {
    let lines: Vec<String> = clean_lines(summary)
        .map(|l| normalize_line(&l))
        .filter(|l| !l.is_empty())
        .collect();

    expected
        .iter()
        .filter(|want| {
            let want = normalize_line(want);
            !lines.iter().any(|line| line.contains(&want))
        })
        .cloned()
        .collect()
}
