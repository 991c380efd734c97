//! Domain types for rhuictl configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.rhuictl/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Host running the administration console (the RHUA).
    pub host: Option<String>,
    /// SSH user on the console host.
    pub user: String,
    /// SSH port on the console host.
    pub port: u16,
    /// Private key for the SSH connection; ssh's own default when unset.
    pub identity_file: Option<String>,
    /// Command that starts the console on the remote host.
    pub console_command: String,
    /// Console login, answered when the console asks for it.
    pub login: LoginConfig,
    /// Expectation timeouts.
    pub timeouts: TimeoutConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            host: None,
            user: "root".to_string(),
            port: 22,
            identity_file: None,
            console_command: "rhui-manager".to_string(),
            login: LoginConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Console login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    pub username: String,
    /// Prefer `$RHUI_PASSWORD` over storing the password here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: None,
        }
    }
}

/// Timeouts, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Ordinary prompt round-trips.
    pub default_secs: u64,
    /// Reaching a screen prompt after a navigation key.
    pub navigation_secs: u64,
    /// Operations during which the console configures remote hosts.
    pub configure_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_secs: 60,
            navigation_secs: 30,
            configure_secs: 180,
        }
    }
}

/// Timeout policy carried by every console session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub default: Duration,
    pub navigation: Duration,
    pub configure: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        TimeoutConfig::default().into()
    }
}

impl Timeouts {
    /// The same timeout for every kind of wait. Handy for tests.
    #[must_use]
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            default: timeout,
            navigation: timeout,
            configure: timeout,
        }
    }
}

impl From<TimeoutConfig> for Timeouts {
    fn from(cfg: TimeoutConfig) -> Self {
        Self {
            default: Duration::from_secs(cfg.default_secs),
            navigation: Duration::from_secs(cfg.navigation_secs),
            configure: Duration::from_secs(cfg.configure_secs),
        }
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
