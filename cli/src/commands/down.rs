//! `shipstack down`: remove everything named after an application.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::orchestrate;

/// Arguments for the down command.
#[derive(Args)]
pub struct DownArgs {
    /// Application name (defaults to the current directory's name)
    pub name: Option<String>,

    /// Project directory (defaults to ./<NAME>, or the current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Leave the local project directory untouched
    #[arg(long)]
    pub keep_local: bool,
}

/// Run the down command.
///
/// # Errors
///
/// Returns an error if authentication fails. Deletion failures are warnings.
pub async fn run(app: &AppContext, args: DownArgs) -> Result<ExitCode> {
    let (name, project_dir) = super::resolve_target(args.name.as_deref(), args.dir.as_deref())?;
    let config = config_service::load_config(&app.config_store)?;

    let prompt = if args.keep_local {
        format!("Delete every '{name}' repository, deployment and database?")
    } else {
        format!(
            "Delete every '{name}' repository, deployment and database, and clear {}?",
            project_dir.display()
        )
    };
    if !app.confirm(&prompt, false)? {
        app.output.info("Aborted.");
        return Ok(ExitCode::SUCCESS);
    }

    let local_dir = (!args.keep_local).then_some(project_dir.as_path());
    let reporter = app.reporter();
    let report =
        orchestrate::destroy(&app.remote(), &app.local, &reporter, &name, local_dir, &config)
            .await?;
    drop(reporter);

    app.renderer().render_teardown(name.as_str(), &report)?;
    Ok(ExitCode::SUCCESS)
}
