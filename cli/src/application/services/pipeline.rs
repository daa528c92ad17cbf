//! Application service: the ordered provisioning pipeline.
//!
//! Each step takes the session by value and hands back the next one. A fatal
//! step failure stops the pipeline and returns the session as it was before
//! that step; a non-fatal failure becomes a warning and the pipeline moves on.

use crate::application::ports::{
    DatabaseHost, DeployEnvironment, DeploymentHost, HttpProbe, LocalToolchain, ProgressReporter,
    RemoteServices, RepositoryHost,
};
use crate::application::services::local_dev;
use crate::application::services::readiness::wait_until_ready;
use crate::domain::config::ShipstackConfig;
use crate::domain::deploy::{parse_deployment_url, project_domain};
use crate::domain::dotenv;
use crate::domain::error::{OrchestrationError, StepError};
use crate::domain::pipeline::{
    PipelineStep, ScaffoldProfile, StepKind, require_connection_uri, require_project_id,
};
use crate::domain::readiness::ReadinessOutcome;
use crate::domain::report::Warning;
use crate::domain::resource::Service;
use crate::domain::session::OrchestrationSession;

const DATABASE_URL: &str = "DATABASE_URL";
const COMMIT_MESSAGE: &str = "Initial commit from shipstack";

/// Everything a step may call.
pub struct PipelineContext<'a, V, H, D, L, P, R> {
    pub services: &'a RemoteServices<'a, V, H, D>,
    pub local: &'a L,
    pub http: &'a P,
    pub reporter: &'a R,
    pub config: &'a ShipstackConfig,
    pub profile: &'a ScaffoldProfile,
}

/// Result of a pipeline that ran to the end.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub session: OrchestrationSession,
    pub completed: Vec<&'static str>,
    pub warnings: Vec<Warning>,
}

/// A fatal step failure.
#[derive(Debug)]
pub struct PipelineFailure {
    pub step: PipelineStep,
    pub error: StepError,
    /// Session as left by the last successful step.
    pub session: OrchestrationSession,
    pub completed: Vec<&'static str>,
    pub warnings: Vec<Warning>,
}

impl PipelineFailure {
    #[must_use]
    pub fn into_error(self) -> OrchestrationError {
        OrchestrationError::Creation {
            step: self.step.name(),
            service: self.error.service().or_else(|| self.step.kind.service()),
            reason: self.error.to_string(),
        }
    }
}

/// Run `steps` in order.
///
/// # Errors
///
/// Returns the first fatal step failure; no later step is attempted.
pub async fn run_pipeline<V, H, D, L, P, R>(
    steps: &[PipelineStep],
    mut session: OrchestrationSession,
    ctx: &PipelineContext<'_, V, H, D, L, P, R>,
) -> Result<PipelineOutcome, Box<PipelineFailure>>
where
    V: RepositoryHost,
    H: DeploymentHost,
    D: DatabaseHost,
    L: LocalToolchain,
    P: HttpProbe,
    R: ProgressReporter,
{
    let mut completed = Vec::new();
    let mut warnings = Vec::new();

    for step in steps {
        ctx.reporter.step(&format!("{}...", describe(step.kind)));
        tracing::debug!(step = step.name(), fatal = step.fatal, "running step");
        match execute(step.kind, session.clone(), ctx).await {
            Ok(next) => {
                session = next;
                completed.push(step.name());
                ctx.reporter.success(&format!("{} done", step.name()));
            }
            Err(error) if step.fatal => {
                tracing::error!(step = step.name(), %error, "fatal step failed");
                return Err(Box::new(PipelineFailure {
                    step: *step,
                    error,
                    session,
                    completed,
                    warnings,
                }));
            }
            Err(error) => {
                let warning = step_warning(step, error);
                ctx.reporter.warn(&warning.to_string());
                warnings.push(warning);
            }
        }
    }

    Ok(PipelineOutcome {
        session,
        completed,
        warnings,
    })
}

fn step_warning(step: &PipelineStep, error: StepError) -> Warning {
    match error {
        StepError::NotReady { target, attempts } => Warning::Readiness { target, attempts },
        other => Warning::Step {
            step: step.name(),
            reason: other.to_string(),
        },
    }
}

fn describe(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Scaffold => "scaffolding application",
        StepKind::PublishRepository => "publishing repository",
        StepKind::CreateDatabase => "creating database",
        StepKind::InitialDeploy => "deploying to production",
        StepKind::InjectConfig => "configuring database access",
        StepKind::Redeploy => "redeploying with configuration",
        StepKind::VerifyProduction => "waiting for production to respond",
        StepKind::LocalDatabase => "starting local database",
        StepKind::DevServer => "starting local dev server",
    }
}

async fn execute<V, H, D, L, P, R>(
    kind: StepKind,
    session: OrchestrationSession,
    ctx: &PipelineContext<'_, V, H, D, L, P, R>,
) -> Result<OrchestrationSession, StepError>
where
    V: RepositoryHost,
    H: DeploymentHost,
    D: DatabaseHost,
    L: LocalToolchain,
    P: HttpProbe,
    R: ProgressReporter,
{
    match kind {
        StepKind::Scaffold => scaffold(session, ctx).await,
        StepKind::PublishRepository => publish_repository(session, ctx).await,
        StepKind::CreateDatabase => create_database(session, ctx).await,
        StepKind::InitialDeploy => initial_deploy(session, ctx).await,
        StepKind::InjectConfig => inject_config(session, ctx).await,
        StepKind::Redeploy => redeploy(session, ctx).await,
        StepKind::VerifyProduction => verify_production(session, ctx).await,
        StepKind::LocalDatabase => local_database(session, ctx).await,
        StepKind::DevServer => dev_server(session, ctx).await,
    }
}

fn local_err(context: &str) -> impl FnOnce(anyhow::Error) -> StepError + '_ {
    move |e| StepError::local(format!("{context}: {e:#}"))
}

fn service_err(service: Service, context: &str) -> impl FnOnce(anyhow::Error) -> StepError + '_ {
    move |e| StepError::failed(service, format!("{context}: {e:#}"))
}

// ── Steps ────────────────────────────────────────────────────────────────────

async fn scaffold<V, H, D, L: LocalToolchain, P, R>(
    session: OrchestrationSession,
    ctx: &PipelineContext<'_, V, H, D, L, P, R>,
) -> Result<OrchestrationSession, StepError> {
    ctx.local
        .create_dir_all(&session.project_dir)
        .map_err(local_err("creating project directory"))?;
    ctx.local
        .scaffold(&session.project_dir, ctx.profile)
        .await
        .map_err(local_err("application generator failed"))?;
    Ok(session)
}

async fn publish_repository<V: RepositoryHost, H, D, L: LocalToolchain, P, R>(
    mut session: OrchestrationSession,
    ctx: &PipelineContext<'_, V, H, D, L, P, R>,
) -> Result<OrchestrationSession, StepError> {
    ctx.local
        .commit_all(&session.project_dir, COMMIT_MESSAGE)
        .await
        .map_err(local_err("committing scaffolded tree"))?;
    let url = ctx
        .services
        .vcs
        .create_public_repo(&session.project_dir, session.app_name.as_str())
        .await
        .map_err(service_err(Service::Vcs, "creating repository"))?;
    session.repository_url = Some(url);
    session.record_created(Service::Vcs, None);
    Ok(session)
}

async fn create_database<V, H, D: DatabaseHost, L, P, R>(
    mut session: OrchestrationSession,
    ctx: &PipelineContext<'_, V, H, D, L, P, R>,
) -> Result<OrchestrationSession, StepError> {
    let org_id = session
        .org_id
        .clone()
        .ok_or(StepError::MissingInput("database organization"))?;
    let created = ctx
        .services
        .database
        .create_project(session.app_name.as_str(), &org_id)
        .await
        .map_err(service_err(Service::Database, "creating project"))?;
    let project_id = require_project_id(&created)?;
    let uri = require_connection_uri(created.connection_uri.as_deref())?;
    session.database_project_id = Some(project_id.clone());
    session.database_connection_string = Some(uri);
    session.record_created(Service::Database, Some(project_id));
    Ok(session)
}

async fn deploy_production<H: DeploymentHost>(
    hosting: &H,
    session: &OrchestrationSession,
) -> Result<String, StepError> {
    let output = hosting
        .deploy(&session.project_dir, true)
        .await
        .map_err(service_err(Service::Hosting, "deploy failed"))?;
    parse_deployment_url(&output)
        .ok_or_else(|| StepError::failed(Service::Hosting, "deploy printed no deployment URL"))
}

async fn initial_deploy<V, H: DeploymentHost, D, L, P, R>(
    mut session: OrchestrationSession,
    ctx: &PipelineContext<'_, V, H, D, L, P, R>,
) -> Result<OrchestrationSession, StepError> {
    // unlinked, the CLI would name the project after the directory
    ctx.services
        .hosting
        .link_project(&session.project_dir, session.app_name.as_str())
        .await
        .map_err(service_err(Service::Hosting, "project setup failed"))?;
    session.record_created(Service::Hosting, None);
    let url = deploy_production(ctx.services.hosting, &session).await?;
    session.deployment_url = Some(url);
    Ok(session)
}

async fn inject_config<V, H: DeploymentHost, D, L: LocalToolchain, P, R>(
    session: OrchestrationSession,
    ctx: &PipelineContext<'_, V, H, D, L, P, R>,
) -> Result<OrchestrationSession, StepError> {
    let uri = session
        .connection_string()
        .cloned()
        .ok_or(StepError::MissingInput("database connection string"))?;
    let hosting = ctx.services.hosting;
    hosting
        .set_env_var(
            &session.project_dir,
            DATABASE_URL,
            uri.expose(),
            DeployEnvironment::Production,
        )
        .await
        .map_err(service_err(Service::Hosting, "registering DATABASE_URL"))?;
    let vars = hosting
        .list_env_vars(&session.project_dir, DeployEnvironment::Production)
        .await
        .map_err(service_err(Service::Hosting, "listing environment variables"))?;
    if !vars.iter().any(|v| v == DATABASE_URL) {
        return Err(StepError::failed(
            Service::Hosting,
            "DATABASE_URL is not registered for production after adding it",
        ));
    }
    ctx.local
        .push_schema(&session.project_dir, uri.expose())
        .await
        .map_err(local_err("schema push failed"))?;
    Ok(session)
}

async fn redeploy<V, H: DeploymentHost, D, L, P, R>(
    mut session: OrchestrationSession,
    ctx: &PipelineContext<'_, V, H, D, L, P, R>,
) -> Result<OrchestrationSession, StepError> {
    let url = deploy_production(ctx.services.hosting, &session).await?;
    let domain = project_domain(&url, &session.app_name).ok_or_else(|| {
        StepError::failed(Service::Hosting, format!("cannot derive a domain from {url}"))
    })?;
    session.production_url = Some(format!("https://{domain}"));
    session.project_domain = Some(domain);
    session.deployment_url = Some(url);
    Ok(session)
}

async fn verify_production<V, H, D, L, P: HttpProbe, R>(
    session: OrchestrationSession,
    ctx: &PipelineContext<'_, V, H, D, L, P, R>,
) -> Result<OrchestrationSession, StepError> {
    let url = session
        .production_url
        .clone()
        .ok_or(StepError::MissingInput("production URL"))?;
    match wait_until_ready(ctx.http, &url, ctx.config.production_probe()).await {
        ReadinessOutcome::Ready { .. } => Ok(session),
        ReadinessOutcome::TimedOut { attempts } => Err(StepError::NotReady {
            target: url,
            attempts,
        }),
    }
}

async fn local_database<V, H, D, L: LocalToolchain, P, R: ProgressReporter>(
    session: OrchestrationSession,
    ctx: &PipelineContext<'_, V, H, D, L, P, R>,
) -> Result<OrchestrationSession, StepError> {
    let spec = local_dev::container_spec(&session.app_name, ctx.config.local_dev.database_port);
    local_dev::start_local_database(ctx.local, ctx.reporter, &spec)
        .await
        .map_err(local_err("local database"))?;

    let url = local_dev::local_database_url(&spec);
    let env_path = session.project_dir.join(".env");
    let current = ctx
        .local
        .read_optional(&env_path)
        .map_err(local_err("reading .env"))?
        .unwrap_or_default();
    ctx.local
        .write(&env_path, &dotenv::upsert(&current, DATABASE_URL, &url))
        .map_err(local_err("writing .env"))?;
    ctx.local
        .push_schema(&session.project_dir, &url)
        .await
        .map_err(local_err("local schema push failed"))?;
    Ok(session)
}

async fn dev_server<V, H, D, L: LocalToolchain, P: HttpProbe, R: ProgressReporter>(
    mut session: OrchestrationSession,
    ctx: &PipelineContext<'_, V, H, D, L, P, R>,
) -> Result<OrchestrationSession, StepError> {
    let port = ctx.config.local_dev.port;
    let (pid, outcome) = local_dev::start_dev_server(
        ctx.local,
        ctx.http,
        ctx.reporter,
        &session.project_dir,
        port,
        ctx.config.dev_server_probe(),
    )
    .await
    .map_err(local_err("dev server"))?;
    tracing::info!(pid, port, "dev server started");
    match outcome {
        ReadinessOutcome::Ready { .. } => {
            session.dev_server_pid = Some(pid);
            Ok(session)
        }
        ReadinessOutcome::TimedOut { attempts } => Err(StepError::NotReady {
            target: format!("http://localhost:{port}"),
            attempts,
        }),
    }
}
