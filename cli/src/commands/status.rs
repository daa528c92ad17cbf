//! `shipstack status`: show what exists for an application.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::DatabaseHost;
use crate::application::services::config_service;
use crate::application::services::orchestrate;
use crate::domain::resource::Service;

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Application name (defaults to the current directory's name)
    pub name: Option<String>,

    /// Also print the database connection string
    #[arg(long)]
    pub connection_string: bool,
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if authentication fails, or the connection string was
/// requested and cannot be fetched.
pub async fn run(app: &AppContext, args: StatusArgs) -> Result<ExitCode> {
    let (name, _) = super::resolve_target(args.name.as_deref(), None)?;
    let config = config_service::load_config(&app.config_store)?;
    let reporter = app.reporter();
    let (inventory, warnings) = orchestrate::inspect(&app.remote(), &reporter, &name, &config).await?;
    drop(reporter);

    let connection_string = match inventory.get(Service::Database) {
        Some(db) if args.connection_string && db.exists => {
            let id = db
                .id
                .as_deref()
                .with_context(|| format!("Neon project '{name}' has no id"))?;
            Some(
                app.neon
                    .connection_string(id, &config.database.name, &config.database.role)
                    .await
                    .context("fetching connection string")?,
            )
        }
        _ => None,
    };

    app.renderer().render_inventory(
        name.as_str(),
        &inventory,
        &warnings,
        connection_string.as_deref(),
    )?;
    Ok(ExitCode::SUCCESS)
}
