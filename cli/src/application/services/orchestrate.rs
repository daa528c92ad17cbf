//! Application service: the top-level provisioning, teardown and status
//! use-cases.
//!
//! Control flow for `provision`: authenticate, resolve the database
//! organisation, scan the inventory, then either tear down (force) or check
//! for conflicts (safe), then run the pipeline.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use crate::application::ports::{
    DatabaseHost, DeploymentHost, HttpProbe, LocalToolchain, ProgressReporter, ProjectFs,
    RemoteServices, RepositoryHost,
};
use crate::application::services::pipeline::{PipelineContext, run_pipeline};
use crate::application::services::teardown::{self, TeardownReport};
use crate::application::services::{auth, conflicts, inventory};
use crate::domain::app_name::ApplicationName;
use crate::domain::config::ShipstackConfig;
use crate::domain::pipeline::{ScaffoldProfile, standard_steps};
use crate::domain::report::{RunReport, Warning};
use crate::domain::resource::Inventory;
use crate::domain::session::{OrchestrationSession, RunMode};

/// Inputs of one provisioning run.
pub struct RunOptions<'a> {
    pub app_name: ApplicationName,
    pub mode: RunMode,
    pub project_dir: PathBuf,
    pub config: &'a ShipstackConfig,
    /// Start the local database and dev server after deploying.
    pub local_dev: bool,
}

/// Provision the full stack for one application.
///
/// # Errors
///
/// Returns an `OrchestrationError` (authentication, conflict, or creation)
/// for any fatal failure. Warnings are returned inside the report.
pub async fn provision<V, H, D, L, P, R>(
    services: &RemoteServices<'_, V, H, D>,
    local: &L,
    http: &P,
    reporter: &R,
    opts: RunOptions<'_>,
) -> Result<RunReport>
where
    V: RepositoryHost,
    H: DeploymentHost,
    D: DatabaseHost,
    L: LocalToolchain,
    P: HttpProbe,
    R: ProgressReporter,
{
    let started_at = Utc::now();
    let RunOptions {
        app_name,
        mode,
        project_dir,
        config,
        local_dev,
    } = opts;

    let statuses = auth::ensure_all(services, mode, reporter, config.login_wait()).await?;
    let org_id =
        auth::resolve_organization(services.database, config.database.org_id.as_deref()).await?;

    let mut session = OrchestrationSession::new(app_name, mode, project_dir);
    session.auth = statuses;
    session.org_id = Some(org_id);

    reporter.step(&format!("looking for existing '{}' resources...", session.app_name));
    let found = inventory::scan(services, session.app_name.as_str()).await;
    let mut warnings = inventory::failure_warnings(&found);
    for w in &warnings {
        reporter.warn(&w.to_string());
    }

    match mode {
        RunMode::Force => {
            let report = teardown::purge(services, &found, reporter).await;
            warnings.extend(report.warnings);
            warnings.extend(teardown::purge_local(local, &session.project_dir));
        }
        RunMode::Safe => {
            conflicts::ensure_no_conflicts(local, &found, &session.app_name, &session.project_dir)?;
        }
    }

    let profile = ScaffoldProfile::default();
    let ctx = PipelineContext {
        services,
        local,
        http,
        reporter,
        config,
        profile: &profile,
    };
    let steps = standard_steps(local_dev);
    match run_pipeline(&steps, session, &ctx).await {
        Ok(outcome) => {
            warnings.extend(outcome.warnings);
            Ok(RunReport::from_session(
                &outcome.session,
                outcome.completed,
                warnings,
                started_at,
            ))
        }
        Err(failure) => Err(failure.into_error().into()),
    }
}

/// Delete everything named `app` without provisioning anything.
///
/// # Errors
///
/// Returns an error only if authentication fails; deletion failures are
/// warnings in the returned report.
pub async fn destroy<V, H, D>(
    services: &RemoteServices<'_, V, H, D>,
    fs: &impl ProjectFs,
    reporter: &impl ProgressReporter,
    app: &ApplicationName,
    local_dir: Option<&std::path::Path>,
    config: &ShipstackConfig,
) -> Result<TeardownReport>
where
    V: RepositoryHost,
    H: DeploymentHost,
    D: DatabaseHost,
{
    auth::ensure_all(services, RunMode::Force, reporter, config.login_wait()).await?;
    auth::resolve_organization(services.database, config.database.org_id.as_deref()).await?;

    let found = inventory::scan(services, app.as_str()).await;
    let mut warnings = inventory::failure_warnings(&found);
    for w in &warnings {
        reporter.warn(&w.to_string());
    }
    let mut report = teardown::purge(services, &found, reporter).await;
    warnings.append(&mut report.warnings);
    if let Some(dir) = local_dir {
        warnings.extend(teardown::purge_local(fs, dir));
    }
    report.warnings = warnings;
    Ok(report)
}

/// Report what exists for `app` on each service.
///
/// # Errors
///
/// Returns an error only if authentication fails.
pub async fn inspect<V, H, D>(
    services: &RemoteServices<'_, V, H, D>,
    reporter: &impl ProgressReporter,
    app: &ApplicationName,
    config: &ShipstackConfig,
) -> Result<(Inventory, Vec<Warning>)>
where
    V: RepositoryHost,
    H: DeploymentHost,
    D: DatabaseHost,
{
    auth::ensure_all(services, RunMode::Safe, reporter, config.login_wait()).await?;
    auth::resolve_organization(services.database, config.database.org_id.as_deref()).await?;
    let found = inventory::scan(services, app.as_str()).await;
    let warnings = inventory::failure_warnings(&found);
    Ok((found, warnings))
}
