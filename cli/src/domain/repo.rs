//! Custom repository parameters, the console's defaulting rules, and the
//! repository list parser.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use serde::Serialize;

use crate::domain::text::clean_lines;

/// Architecture components the console rewrites to `$basearch` when it
/// guesses an entitlement path.
#[allow(clippy::expect_used)] // compile-time constant pattern
static ARCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(i386|x86_64)").expect("valid regex"));

/// Checksum menu entry the console offers first (`sha256`).
pub const DEFAULT_CHECKSUM_CHOICE: &str = "1";

/// Everything the console asks when creating a custom repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRepo {
    /// Unique repository ID.
    pub id: String,
    /// Display name; the console defaults it to the ID.
    pub display_name: Option<String>,
    /// Relative path the repository is served at; defaults to the ID.
    pub path: Option<String>,
    /// Checksum menu choice, as typed at the `Enter value` prompt.
    pub checksum: String,
    /// Whether clients need an entitlement certificate.
    pub entitlement: bool,
    /// Entitlement path; guessed from the served path when absent.
    pub entitlement_path: Option<String>,
    /// Whether the repository hosts Red Hat GPG signed content.
    pub redhat_gpg: bool,
    /// Public key of a custom GPG keypair, on the console host.
    pub custom_gpg: Option<String>,
}

impl CustomRepo {
    /// Repository with the console's defaults for every optional field.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            path: None,
            checksum: DEFAULT_CHECKSUM_CHOICE.to_string(),
            entitlement: true,
            entitlement_path: None,
            redhat_gpg: true,
            custom_gpg: None,
        }
    }

    /// Display name the console will record.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        non_empty(self.display_name.as_deref()).unwrap_or(self.id.as_str())
    }

    /// Path the console will serve the repository at.
    #[must_use]
    pub fn effective_path(&self) -> &str {
        non_empty(self.path.as_deref()).unwrap_or(self.id.as_str())
    }

    /// Entitlement path the console will record, if entitlements are on.
    #[must_use]
    pub fn effective_entitlement(&self) -> Option<String> {
        if !self.entitlement {
            return None;
        }
        Some(match non_empty(self.entitlement_path.as_deref()) {
            Some(path) => path.to_string(),
            None => guess_entitlement_path(self.effective_path()),
        })
    }

    /// Whether the console will be told the packages are GPG signed.
    #[must_use]
    pub fn gpg_check(&self) -> bool {
        self.redhat_gpg || self.custom_gpg.is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// The console's entitlement path guess for a served path.
///
/// A single `i386` or `x86_64` component becomes `$basearch`. When the path
/// holds more than one of them the console gives up and uses the path
/// unchanged.
#[must_use]
pub fn guess_entitlement_path(path: &str) -> String {
    if ARCH_RE.find_iter(path).count() > 1 {
        return path.to_string();
    }
    ARCH_RE.replace_all(path, NoExpand("$basearch")).into_owned()
}

/// Repository names as listed by the repository screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoListing {
    pub red_hat: Vec<String>,
    pub custom: Vec<String>,
}

#[derive(Clone, Copy)]
enum Section {
    None,
    RedHat,
    Custom,
}

/// Parses the repository listing into Red Hat and custom repository names.
#[must_use]
pub fn parse_repo_list(text: &str) -> RepoListing {
    let mut listing = RepoListing::default();
    let mut section = Section::None;

    for line in clean_lines(text) {
        let line = line.trim();
        if line.is_empty() || line.starts_with("---") || line == "(None)" {
            continue;
        }
        match line {
            "Red Hat Repositories" => section = Section::RedHat,
            "Custom Repositories" => section = Section::Custom,
            name => match section {
                Section::RedHat => listing.red_hat.push(name.to_string()),
                Section::Custom => listing.custom.push(name.to_string()),
                Section::None => {}
            },
        }
    }
    listing
}
