//! Content Delivery Server (CDS) value object and list parser.

use serde::Serialize;

use crate::domain::text::clean_lines;

/// SSH user the console logs into a CDS as, unless told otherwise.
pub const DEFAULT_CDS_USER: &str = "ec2-user";

/// Key the console uses to reach a CDS, unless told otherwise.
pub const DEFAULT_CDS_SSH_KEY: &str = "/root/.ssh/id_rsa_rhua";

/// A content delivery server as registered with the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cds {
    /// Hostname the CDS is registered (and listed) under.
    pub host_name: String,
    /// User with SSH access and sudo privileges on the CDS.
    pub user_name: String,
    /// Path, on the console host, of the SSH private key for `user_name`.
    pub ssh_key_path: String,
}

impl Cds {
    /// A CDS with the default user and key.
    #[must_use]
    pub fn new(host_name: impl Into<String>) -> Self {
        Self {
            host_name: host_name.into(),
            user_name: DEFAULT_CDS_USER.to_string(),
            ssh_key_path: DEFAULT_CDS_SSH_KEY.to_string(),
        }
    }

    #[must_use]
    pub fn with_user(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = user_name.into();
        self
    }

    #[must_use]
    pub fn with_ssh_key(mut self, ssh_key_path: impl Into<String>) -> Self {
        self.ssh_key_path = ssh_key_path.into();
        self
    }
}

const HOSTNAME_LABEL: &str = "Hostname:";
const USERNAME_LABEL: &str = "SSH Username:";
const KEY_LABEL: &str = "SSH Private Key:";

/// Parses the CDS screen listing into CDS records, in console order.
///
/// Each record starts at a `Hostname:` line; `SSH Username:` and
/// `SSH Private Key:` lines that follow fill in the rest. Fields the console
/// omits keep their defaults. Any other line (headings, echoed keystrokes,
/// separators) is ignored.
#[must_use]
pub fn parse_cds_list(text: &str) -> Vec<Cds> {
    let mut out = Vec::new();
    let mut current: Option<Cds> = None;

    for line in clean_lines(text) {
        let line = line.trim();
        if let Some(host) = line.strip_prefix(HOSTNAME_LABEL) {
            if let Some(done) = current.take() {
                out.push(done);
            }
            current = Some(Cds::new(host.trim()));
        } else if let Some(user) = line.strip_prefix(USERNAME_LABEL) {
            if let Some(cds) = current.as_mut() {
                cds.user_name = user.trim().to_string();
            }
        } else if let Some(key) = line.strip_prefix(KEY_LABEL)
            && let Some(cds) = current.as_mut()
        {
            cds.ssh_key_path = key.trim().to_string();
        }
    }
    out.extend(current);
    out
}
