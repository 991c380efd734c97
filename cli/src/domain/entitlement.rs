//! Entitlement certificate listings and upload verdicts.

use serde::Serialize;

use crate::domain::text::clean_lines;

/// Where the test fixtures drop the Red Hat content certificate.
pub const DEFAULT_CERTIFICATE_PATH: &str = "/tmp/extra_rhui_files/rhcert.pem";

const BAD_CERTIFICATE_MSG: &str = "The provided certificate is expired or invalid";
const INCOMPATIBLE_CERTIFICATE_MSG: &str = "not compatible with the RHUI";

/// One Red Hat entitlement: the product line and the certificate line under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entitlement {
    pub name: String,
    pub detail: String,
}

/// How the console judged an uploaded certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadVerdict {
    Accepted,
    ExpiredOrInvalid,
    Incompatible,
}

/// Parses the Red Hat entitlement listing.
///
/// Entitlements are rendered as a name line followed by a detail line that
/// ends in `pem`. A name is the last non-empty line before such a detail
/// line, so headings (`Red Hat Entitlements`, `Valid`) and echoed keystrokes
/// never become entitlements. Console order is preserved.
#[must_use]
pub fn parse_rh_entitlements(text: &str) -> Vec<Entitlement> {
    let mut out = Vec::new();
    let mut name: Option<String> = None;

    for line in clean_lines(text) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.ends_with("pem") {
            if let Some(name) = name.take() {
                out.push(Entitlement {
                    name,
                    detail: line.to_string(),
                });
            }
        } else {
            name = Some(line.to_string());
        }
    }
    out
}

/// Parses the custom repository entitlement listing into sorted names.
#[must_use]
pub fn parse_custom_entitlements(text: &str) -> Vec<String> {
    let mut names: Vec<String> = clean_lines(text)
        .filter(|line| line.contains("Name:"))
        .map(|line| line.replace("Name:", "").trim().to_string())
        .collect();
    names.sort();
    names
}

/// Classifies the console's reaction to a certificate upload.
#[must_use]
pub fn upload_verdict(text: &str) -> UploadVerdict {
    if text.contains(BAD_CERTIFICATE_MSG) {
        UploadVerdict::ExpiredOrInvalid
    } else if text.contains(INCOMPATIBLE_CERTIFICATE_MSG) {
        UploadVerdict::Incompatible
    } else {
        UploadVerdict::Accepted
    }
}
