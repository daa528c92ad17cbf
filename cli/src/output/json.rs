//! JSON output helpers.
//!
//! Every `--json` code path prints one pretty-printed object to stdout. A
//! failing command prints the error object from [`format_error`] instead.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use crate::application::services::teardown::TeardownReport;
use crate::domain::config::ShipstackConfig;
use crate::domain::report::{RunReport, Warning};
use crate::domain::resource::Inventory;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Renders domain types as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    fn print(value: &impl serde::Serialize) -> Result<()> {
        let text = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
        println!("{text}");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_report(&self, report: &RunReport) -> Result<()> {
        Self::print(report)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_inventory(
        &self,
        app: &str,
        inventory: &Inventory,
        warnings: &[Warning],
        connection_string: Option<&str>,
    ) -> Result<()> {
        Self::print(&inventory_value(app, inventory, warnings, connection_string))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_teardown(&self, app: &str, report: &TeardownReport) -> Result<()> {
        Self::print(&json!({
            "app_name": app,
            "deleted": report.deleted,
            "warnings": report.warnings,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &ShipstackConfig, path: &Path) -> Result<()> {
        Self::print(&json!({
            "path": path.display().to_string(),
            "config": config,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        Self::print(&json!({ "version": version }))
    }
}

fn inventory_value(
    app: &str,
    inventory: &Inventory,
    warnings: &[Warning],
    connection_string: Option<&str>,
) -> serde_json::Value {
    let mut value = json!({
        "app_name": app,
        "resources": inventory.resources.values().collect::<Vec<_>>(),
        "warnings": warnings,
    });
    if let Some(uri) = connection_string {
        value["connection_string"] = json!(uri);
    }
    value
}
