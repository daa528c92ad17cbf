//! `shipstack up`: provision the full stack for an application.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::orchestrate::{self, RunOptions};
use crate::domain::session::RunMode;
use crate::infra::http::ReqwestProbe;

/// Arguments for the up command.
#[derive(Args)]
pub struct UpArgs {
    /// Application name (defaults to the current directory's name)
    pub name: Option<String>,

    /// Project directory (defaults to ./<NAME>, or the current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Delete existing resources with the same name before provisioning
    #[arg(
        long,
        env = "SHIPSTACK_FORCE",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub force: bool,

    /// Skip the local database and dev server
    #[arg(long)]
    pub no_dev_server: bool,
}

/// Run the up command.
///
/// # Errors
///
/// Returns an error on any fatal authentication, conflict or creation
/// failure.
pub async fn run(app: &AppContext, args: UpArgs) -> Result<ExitCode> {
    let (name, project_dir) = super::resolve_target(args.name.as_deref(), args.dir.as_deref())?;
    let mode = RunMode::from_flag(args.force);
    let config = config_service::load_config(&app.config_store)?;

    if mode == RunMode::Force
        && !app.confirm(
            &format!(
                "Delete every existing '{name}' repository, deployment and database, and clear {}?",
                project_dir.display()
            ),
            false,
        )?
    {
        app.output.info("Aborted.");
        return Ok(ExitCode::SUCCESS);
    }

    tracing::info!(app = %name, %mode, dir = %project_dir.display(), "provisioning");
    let http = ReqwestProbe::new()?;
    let reporter = app.reporter();
    let report = orchestrate::provision(
        &app.remote(),
        &app.local,
        &http,
        &reporter,
        RunOptions {
            app_name: name,
            mode,
            project_dir,
            config: &config,
            local_dev: config.local_dev.enabled && !args.no_dev_server,
        },
    )
    .await?;
    drop(reporter);

    app.renderer().render_report(&report)?;
    Ok(ExitCode::SUCCESS)
}
