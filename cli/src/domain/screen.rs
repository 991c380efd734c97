//! Console screens, their navigation keys and prompts.
//!
//! Pure data: no I/O.

use std::fmt;

/// Prompt shown at the top level of the console, outside any screen.
pub const TOP_LEVEL_PROMPT: &str = r"rhui => ";

/// Keystrokes shared by every screen.
pub mod keys {
    /// List the entities managed by the current screen.
    pub const LIST: &str = "l";
    /// Return from a screen to the top-level prompt.
    pub const HOME: &str = "home";
    /// End the console, from the top level or from inside a screen.
    pub const QUIT: &str = "q";
    /// Affirmative answer to a `(y/n)` question.
    pub const YES: &str = "y";
    /// Negative answer to a `(y/n)` question.
    pub const NO: &str = "n";
    /// Confirm the current multi-selection.
    pub const CONFIRM_SELECTION: &str = "c";
}

/// A named modal screen of the administration console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Repo,
    Cds,
    LoadBalancers,
    Sync,
    Identity,
    Users,
    Client,
    Entitlements,
    Subscriptions,
}

impl Screen {
    /// Every screen reachable from the top-level prompt.
    pub const ALL: [Screen; 9] = [
        Screen::Repo,
        Screen::Cds,
        Screen::LoadBalancers,
        Screen::Sync,
        Screen::Identity,
        Screen::Users,
        Screen::Client,
        Screen::Entitlements,
        Screen::Subscriptions,
    ];

    /// Name shown inside the screen prompt, e.g. `cds` in `rhui (cds) => `.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Cds => "cds",
            Self::LoadBalancers => "loadbalancers",
            Self::Sync => "sync",
            Self::Identity => "identity",
            Self::Users => "users",
            Self::Client => "client",
            Self::Entitlements => "entitlements",
            Self::Subscriptions => "subscriptions",
        }
    }

    /// Keystroke(s) that open this screen from the top-level prompt.
    ///
    /// Most screens are opened by their initial letter; `client`,
    /// `entitlements` and `subscriptions` collide with other screens and use
    /// dedicated keys.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Repo => "r",
            Self::Cds => "c",
            Self::LoadBalancers => "l",
            Self::Sync => "s",
            Self::Identity => "i",
            Self::Users => "u",
            Self::Client => "e",
            Self::Entitlements => "n",
            Self::Subscriptions => "sm",
        }
    }

    /// Regular expression matching this screen's command prompt.
    #[must_use]
    pub fn prompt(self) -> String {
        format!(r"rhui \({}\) => ", self.name())
    }

    /// Looks a screen up by its prompt name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pattern matching the prompt of any screen (`rhui (<name>) => `).
pub const ANY_SCREEN_PROMPT: &str = r"rhui \([a-z]+\) => ";
