//! Provisioning pipeline shape: which steps run, in what order, and which
//! ones abort the run on failure.

use serde::Serialize;

use crate::domain::error::StepError;
use crate::domain::resource::Service;
use crate::domain::session::Secret;

/// One unit of the provisioning sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Scaffold,
    PublishRepository,
    CreateDatabase,
    InitialDeploy,
    InjectConfig,
    Redeploy,
    VerifyProduction,
    LocalDatabase,
    DevServer,
}

impl StepKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Scaffold => "scaffold",
            Self::PublishRepository => "publish-repository",
            Self::CreateDatabase => "create-database",
            Self::InitialDeploy => "initial-deploy",
            Self::InjectConfig => "inject-config",
            Self::Redeploy => "redeploy",
            Self::VerifyProduction => "verify-production",
            Self::LocalDatabase => "local-database",
            Self::DevServer => "dev-server",
        }
    }

    /// Service whose API the step primarily talks to.
    #[must_use]
    pub fn service(self) -> Option<Service> {
        match self {
            Self::PublishRepository => Some(Service::Vcs),
            Self::CreateDatabase => Some(Service::Database),
            Self::InitialDeploy | Self::InjectConfig | Self::Redeploy | Self::VerifyProduction => {
                Some(Service::Hosting)
            }
            Self::Scaffold | Self::LocalDatabase | Self::DevServer => None,
        }
    }
}

/// A step plus its failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineStep {
    pub kind: StepKind,
    /// `true`: a failure aborts the run. `false`: logged as a warning.
    pub fatal: bool,
}

impl PipelineStep {
    #[must_use]
    pub const fn fatal(kind: StepKind) -> Self {
        Self { kind, fatal: true }
    }

    #[must_use]
    pub const fn best_effort(kind: StepKind) -> Self {
        Self { kind, fatal: false }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// The full provisioning sequence.
///
/// The six creation steps are fatal. The readiness and local development
/// steps only downgrade the report.
#[must_use]
pub fn standard_steps(local_dev: bool) -> Vec<PipelineStep> {
    let mut steps = vec![
        PipelineStep::fatal(StepKind::Scaffold),
        PipelineStep::fatal(StepKind::PublishRepository),
        PipelineStep::fatal(StepKind::CreateDatabase),
        PipelineStep::fatal(StepKind::InitialDeploy),
        PipelineStep::fatal(StepKind::InjectConfig),
        PipelineStep::fatal(StepKind::Redeploy),
        PipelineStep::best_effort(StepKind::VerifyProduction),
    ];
    if local_dev {
        steps.push(PipelineStep::best_effort(StepKind::LocalDatabase));
        steps.push(PipelineStep::best_effort(StepKind::DevServer));
    }
    steps
}

// ── Scaffold profile ─────────────────────────────────────────────────────────

/// Generator options for the application scaffold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScaffoldProfile {
    pub tailwind: bool,
    pub trpc: bool,
    pub drizzle: bool,
    pub app_router: bool,
    pub db_provider: &'static str,
    pub next_auth: bool,
}

impl Default for ScaffoldProfile {
    fn default() -> Self {
        Self {
            tailwind: true,
            trpc: true,
            drizzle: true,
            app_router: true,
            db_provider: "postgres",
            next_auth: false,
        }
    }
}

impl ScaffoldProfile {
    /// Non-interactive generator flags for this profile.
    #[must_use]
    pub fn generator_args(&self) -> Vec<String> {
        let flag = |name: &str, on: bool| vec![format!("--{name}"), on.to_string()];
        let mut args = vec!["--CI".to_string()];
        args.extend(flag("tailwind", self.tailwind));
        args.extend(flag("trpc", self.trpc));
        args.extend(flag("drizzle", self.drizzle));
        args.extend(flag("appRouter", self.app_router));
        args.extend(flag("nextAuth", self.next_auth));
        args.push("--dbProvider".to_string());
        args.push(self.db_provider.to_string());
        args.push("--noGit".to_string());
        args
    }
}

// ── Database creation result ─────────────────────────────────────────────────

/// Raw result of a database creation call, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedDatabase {
    pub project_id: Option<String>,
    pub connection_uri: Option<String>,
}

/// Validate the project identifier of a creation response.
///
/// # Errors
///
/// Returns a `StepError` if the identifier is missing or blank, even when the
/// service reported success.
pub fn require_project_id(created: &CreatedDatabase) -> Result<String, StepError> {
    created
        .project_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            StepError::failed(Service::Database, "creation returned no project identifier")
        })
}

/// Validate a connection string returned by the database service.
///
/// # Errors
///
/// Returns a `StepError` when the URI is missing, blank, or not a Postgres URI.
pub fn require_connection_uri(uri: Option<&str>) -> Result<Secret, StepError> {
    let uri = uri.map(str::trim).unwrap_or_default();
    if uri.is_empty() {
        return Err(StepError::failed(
            Service::Database,
            "no connection string was returned",
        ));
    }
    if !(uri.starts_with("postgres://") || uri.starts_with("postgresql://")) {
        return Err(StepError::failed(
            Service::Database,
            "connection string is not a postgres URI",
        ));
    }
    Ok(Secret::new(uri))
}
