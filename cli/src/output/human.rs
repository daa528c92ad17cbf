//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::application::services::teardown::TeardownReport;
use crate::domain::config::ShipstackConfig;
use crate::domain::report::RunReport;
use crate::domain::resource::{Inventory, Service};
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

    /// Render the summary of a finished provisioning run.
    pub fn render_report(&self, report: &RunReport) {
        if self.ctx.quiet {
            if let Some(url) = &report.production_url {
                println!("{url}");
            }
            return;
        }
        println!();
        self.ctx.header(&format!(
            "{} provisioned in {}s",
            report.app_name,
            report.elapsed_secs()
        ));
        println!();
        if let Some(url) = &report.repository_url {
            self.link("Repository:", url);
        }
        if let Some(url) = &report.production_url {
            self.link("Production:", url);
        }
        if let Some(domain) = &report.project_domain {
            self.ctx.kv("Domain:    ", domain);
        }
        if let Some(pid) = report.dev_server_pid {
            self.ctx.kv("Dev server:", &format!("pid {pid}"));
        }
        self.ctx
            .kv("Steps:     ", &report.completed_steps.join(", "));

        if report.has_warnings() {
            println!();
            self.ctx.header("Warnings:");
            for w in &report.warnings {
                self.ctx.warn(&w.to_string());
            }
        }
    }

    /// Render what exists for an application on each service.
    pub fn render_inventory(
        &self,
        app: &str,
        inventory: &Inventory,
        connection_string: Option<&str>,
    ) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header(&format!("Resources for '{app}':"));
        for service in Service::ALL {
            if let Some(reason) = inventory.failures.get(&service) {
                self.ctx.warn(&format!("{service}: could not check ({reason})"));
                continue;
            }
            match inventory.get(service) {
                Some(resource) if resource.exists => self.ctx.success(&resource.to_string()),
                _ => self.ctx.info(&format!("{service}: none")),
            }
        }
        if let Some(uri) = connection_string {
            println!();
            self.ctx.kv("DATABASE_URL:", uri);
        }
    }

    /// Render the result of `shipstack down`.
    pub fn render_teardown(&self, app: &str, report: &TeardownReport) {
        if self.ctx.quiet {
            return;
        }
        if report.is_noop() {
            self.ctx.info(&format!("nothing to remove for '{app}'"));
            return;
        }
        println!();
        self.ctx.header(&format!(
            "removed {} resource(s) for '{app}'",
            report.deleted.len()
        ));
        for w in &report.warnings {
            self.ctx.warn(&w.to_string());
        }
    }

    /// Render the current configuration.
    pub fn render_config(&self, config: &ShipstackConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        let rows = [
            ("readiness.attempts", config.readiness.attempts.to_string()),
            ("readiness.delay_secs", config.readiness.delay_secs.to_string()),
            ("auth.login_wait_secs", config.auth.login_wait_secs.to_string()),
            (
                "database.org_id",
                config
                    .database
                    .org_id
                    .clone()
                    .unwrap_or_else(|| "(first available)".to_string()),
            ),
            ("database.name", config.database.name.clone()),
            ("database.role", config.database.role.clone()),
            ("local_dev.enabled", config.local_dev.enabled.to_string()),
            ("local_dev.port", config.local_dev.port.to_string()),
            (
                "local_dev.database_port",
                config.local_dev.database_port.to_string(),
            ),
            ("local_dev.attempts", config.local_dev.attempts.to_string()),
            ("local_dev.delay_secs", config.local_dev.delay_secs.to_string()),
        ];
        for (key, value) in rows {
            println!("  {:<26} {value}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["SHIPSTACK_CONFIG", "SHIPSTACK_LOG", "SHIPSTACK_FORCE", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("shipstack {version}");
    }

    fn link(&self, key: &str, url: &str) {
        if !self.ctx.quiet {
            println!("  {}  {}", key.style(self.ctx.styles.dim), url.style(self.ctx.styles.link));
        }
    }
}
