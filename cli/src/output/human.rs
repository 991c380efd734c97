//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::config::ConsoleConfig;
use crate::domain::{Cds, Entitlement, RepoListing};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the registered CDSes.
    pub fn render_cds_list(&self, cdses: &[Cds]) {
        if cdses.is_empty() {
            self.ctx.info("No CDS instances are registered.");
            return;
        }
        self.ctx.header("Content Delivery Servers:");
        for cds in cdses {
            println!("  {}", cds.host_name.style(self.ctx.styles.bold));
            self.ctx.kv("  SSH user:", &cds.user_name);
            self.ctx.kv("  SSH key:", &cds.ssh_key_path);
        }
    }

    /// Render Red Hat entitlements.
    pub fn render_rh_entitlements(&self, entitlements: &[Entitlement]) {
        if entitlements.is_empty() {
            self.ctx.info("No Red Hat entitlements.");
            return;
        }
        self.ctx.header("Red Hat entitlements:");
        for entitlement in entitlements {
            println!("  {}", entitlement.name);
            println!("    {}", entitlement.detail.style(self.ctx.styles.dim));
        }
    }

    /// Render custom repository entitlement names.
    pub fn render_custom_entitlements(&self, names: &[String]) {
        if names.is_empty() {
            self.ctx.info("No custom repository entitlements.");
            return;
        }
        self.ctx.header("Custom repository entitlements:");
        for name in names {
            println!("  {name}");
        }
    }

    /// Render the repository listing.
    pub fn render_repos(&self, listing: &RepoListing) {
        for (title, names) in [
            ("Red Hat repositories:", &listing.red_hat),
            ("Custom repositories:", &listing.custom),
        ] {
            self.ctx.header(title);
            if names.is_empty() {
                println!("  {}", "(none)".style(self.ctx.styles.dim));
            }
            for name in names {
                println!("  {name}");
            }
        }
    }

    /// Render the effective configuration. The password is never shown.
    pub fn render_config(&self, config: &ConsoleConfig, path: &std::path::Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!(
            "  {:<24} {}",
            "host:",
            config.host.as_deref().unwrap_or("(not set)")
        );
        println!("  {:<24} {}", "user:", config.user);
        println!("  {:<24} {}", "port:", config.port);
        println!(
            "  {:<24} {}",
            "identity_file:",
            config.identity_file.as_deref().unwrap_or("(ssh default)")
        );
        println!("  {:<24} {}", "console_command:", config.console_command);
        println!("  {:<24} {}", "login.username:", config.login.username);
        println!(
            "  {:<24} {}",
            "login.password:",
            if config.login.password.is_some() { "(set)" } else { "(not set)" }
        );
        println!("  {:<24} {}s", "timeouts.default:", config.timeouts.default_secs);
        println!("  {:<24} {}s", "timeouts.navigation:", config.timeouts.navigation_secs);
        println!("  {:<24} {}s", "timeouts.configure:", config.timeouts.configure_secs);
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["RHUICTL_CONFIG", "RHUI_PASSWORD", "NO_COLOR"] {
            let value = match std::env::var(var) {
                Ok(_) if var == "RHUI_PASSWORD" => "(set)".to_string(),
                Ok(v) => v,
                Err(_) => "(not set)".to_string(),
            };
            println!("    {:<22} {value}", format!("{var}:"));
        }
        println!();
    }
}
