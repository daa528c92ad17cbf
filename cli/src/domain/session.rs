//! Per-run orchestration state.
//!
//! An `OrchestrationSession` is created once per run, threaded by value
//! through each pipeline step, and discarded at exit. Nothing here is
//! persisted.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

use crate::domain::app_name::ApplicationName;
use crate::domain::resource::{ExternalResource, Service};

/// Whether pre-existing resources are destroyed or treated as conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Force,
    Safe,
}

impl RunMode {
    #[must_use]
    pub fn from_flag(force: bool) -> Self {
        if force { Self::Force } else { Self::Safe }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Force => "force",
            Self::Safe => "safe",
        })
    }
}

/// Outcome of ensuring one service has a valid session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    AlreadyAuthenticated,
    LoggedIn,
}

/// A string that never shows up in `Debug`, `Display` or serialized output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("***")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationSession {
    pub app_name: ApplicationName,
    pub mode: RunMode,
    /// Directory the application is scaffolded into.
    pub project_dir: PathBuf,
    pub org_id: Option<String>,
    pub auth: BTreeMap<Service, AuthStatus>,
    /// Resources created by this run, in creation order.
    pub created_resources: Vec<ExternalResource>,
    pub repository_url: Option<String>,
    pub database_project_id: Option<String>,
    pub database_connection_string: Option<Secret>,
    pub deployment_url: Option<String>,
    pub production_url: Option<String>,
    pub project_domain: Option<String>,
    pub dev_server_pid: Option<u32>,
}

impl OrchestrationSession {
    #[must_use]
    pub fn new(app_name: ApplicationName, mode: RunMode, project_dir: PathBuf) -> Self {
        Self {
            app_name,
            mode,
            project_dir,
            org_id: None,
            auth: BTreeMap::new(),
            created_resources: Vec::new(),
            repository_url: None,
            database_project_id: None,
            database_connection_string: None,
            deployment_url: None,
            production_url: None,
            project_domain: None,
            dev_server_pid: None,
        }
    }

    /// Connection string, if one was produced and is non-blank.
    #[must_use]
    pub fn connection_string(&self) -> Option<&Secret> {
        self.database_connection_string
            .as_ref()
            .filter(|s| !s.is_blank())
    }

    pub fn record_created(&mut self, service: Service, id: Option<String>) {
        let resource = ExternalResource::present(service, self.app_name.as_str(), id);
        self.created_resources.push(resource);
    }
}
