//! Non-fatal warnings and the final run summary.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::resource::Service;
use crate::domain::session::{OrchestrationSession, RunMode};

/// A non-fatal problem collected during a run.
///
/// Warnings are reported in the final summary but never change the exit code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A best-effort remote deletion failed.
    Teardown { service: Service, reason: String },
    /// A best-effort local cleanup failed.
    LocalCleanup { path: PathBuf, reason: String },
    /// A service could not be queried; its resource state is unknown.
    Inventory { service: Service, reason: String },
    /// A polling loop exhausted its attempt budget.
    Readiness { target: String, attempts: u32 },
    /// A non-fatal pipeline step failed for another reason.
    Step { step: &'static str, reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teardown { service, reason } => {
                write!(f, "could not delete {service} resource: {reason}")
            }
            Self::LocalCleanup { path, reason } => {
                write!(f, "could not remove {}: {reason}", path.display())
            }
            Self::Inventory { service, reason } => {
                write!(f, "could not query {service}: {reason}")
            }
            Self::Readiness { target, attempts } => {
                write!(f, "{target} not ready after {attempts} attempts")
            }
            Self::Step { step, reason } => write!(f, "step '{step}' failed: {reason}"),
        }
    }
}

/// Final summary of a provisioning run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub app_name: String,
    pub mode: RunMode,
    pub completed_steps: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_server_pid: Option<u32>,
    pub warnings: Vec<Warning>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    #[must_use]
    pub fn from_session(
        session: &OrchestrationSession,
        completed_steps: Vec<&'static str>,
        warnings: Vec<Warning>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            app_name: session.app_name.to_string(),
            mode: session.mode,
            completed_steps,
            repository_url: session.repository_url.clone(),
            production_url: session.production_url.clone(),
            project_domain: session.project_domain.clone(),
            dev_server_pid: session.dev_server_pid,
            warnings,
            started_at,
            finished_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}
