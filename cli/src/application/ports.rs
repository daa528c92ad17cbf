//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::domain::config::ShipstackConfig;
use crate::domain::pipeline::{CreatedDatabase, ScaffoldProfile};
use crate::domain::resource::{ExternalResource, Service};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Deployment environment an environment variable is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployEnvironment {
    Production,
    Preview,
    Development,
}

impl DeployEnvironment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Preview => "preview",
            Self::Development => "development",
        }
    }
}

/// Parameters for the local Postgres container used by the dev server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseContainerSpec {
    pub name: String,
    pub host_port: u16,
    pub database: String,
    pub password: String,
}

/// The three remote services, borrowed for the duration of one run.
pub struct RemoteServices<'a, V, H, D> {
    pub vcs: &'a V,
    pub hosting: &'a H,
    pub database: &'a D,
}

// ── Service Client Ports ──────────────────────────────────────────────────────

/// Capability surface shared by every external service.
#[allow(async_fn_in_trait)]
pub trait ServiceClient {
    /// Which service this client talks to.
    fn service(&self) -> Service;
    /// Non-interactive check for a valid session.
    async fn auth_status(&self) -> Result<bool>;
    /// Run the interactive login flow. Blocks until the user finishes.
    async fn login(&self) -> Result<()>;
    /// Look up a resource named `name`.
    ///
    /// `Ok` with `exists == false` means the service answered and has nothing;
    /// `Err` means the service could not be asked.
    async fn find(&self, name: &str) -> Result<ExternalResource>;
    /// Delete a resource previously returned by `find`.
    async fn remove(&self, resource: &ExternalResource) -> Result<()>;
}

/// Version-control host operations beyond the shared surface.
#[allow(async_fn_in_trait)]
pub trait RepositoryHost: ServiceClient {
    /// Login of the authenticated user.
    async fn current_user(&self) -> Result<String>;
    /// Whether the session may delete repositories.
    async fn has_delete_scope(&self) -> Result<bool>;
    /// Upgrade the session with repository deletion rights.
    async fn grant_delete_scope(&self) -> Result<()>;
    /// Create a public repository from `dir` and push it. Returns its URL.
    async fn create_public_repo(&self, dir: &Path, name: &str) -> Result<String>;
}

/// Hosting platform operations beyond the shared surface.
#[allow(async_fn_in_trait)]
pub trait DeploymentHost: ServiceClient {
    /// Names of all projects on the account.
    async fn list_projects(&self) -> Result<Vec<String>>;
    /// Create project `name` and link `dir` to it, so deploys from `dir`
    /// target `name` whatever the directory is called.
    async fn link_project(&self, dir: &Path, name: &str) -> Result<()>;
    /// Deploy the source in `dir`. Returns the raw deploy command output.
    async fn deploy(&self, dir: &Path, production: bool) -> Result<String>;
    /// Register `key = value` for `env` on the project linked to `dir`.
    async fn set_env_var(
        &self,
        dir: &Path,
        key: &str,
        value: &str,
        env: DeployEnvironment,
    ) -> Result<()>;
    /// Names of environment variables registered for `env`.
    async fn list_env_vars(&self, dir: &Path, env: DeployEnvironment) -> Result<Vec<String>>;
}

/// Managed database operations beyond the shared surface.
#[allow(async_fn_in_trait)]
pub trait DatabaseHost: ServiceClient {
    /// Organisation identifiers the session can use.
    async fn list_orgs(&self) -> Result<Vec<String>>;
    /// Make `org_id` the default for subsequent calls.
    async fn set_context(&self, org_id: &str) -> Result<()>;
    /// `(name, id)` of every project in the current context.
    async fn list_projects(&self) -> Result<Vec<(String, String)>>;
    /// Create a project. The result is returned unvalidated.
    async fn create_project(&self, name: &str, org_id: &str) -> Result<CreatedDatabase>;
    /// Fetch the connection URI for an existing project.
    async fn connection_string(
        &self,
        project_id: &str,
        database: &str,
        role: &str,
    ) -> Result<String>;
}

// ── Local Toolchain Ports ─────────────────────────────────────────────────────

/// Application generator.
#[allow(async_fn_in_trait)]
pub trait Scaffolder {
    /// Generate the application into `dir` (which may already exist, empty).
    async fn scaffold(&self, dir: &Path, profile: &ScaffoldProfile) -> Result<()>;
}

/// Local version-control operations.
#[allow(async_fn_in_trait)]
pub trait SourceTree {
    /// Initialise a repository in `dir` and commit everything in it.
    async fn commit_all(&self, dir: &Path, message: &str) -> Result<()>;
}

/// Schema-migration tool.
#[allow(async_fn_in_trait)]
pub trait SchemaMigrator {
    /// Apply pending schema changes against `connection_uri`.
    async fn push_schema(&self, dir: &Path, connection_uri: &str) -> Result<()>;
}

/// Local filesystem operations on the project directory.
pub trait ProjectFs {
    fn exists(&self, path: &Path) -> bool;
    /// `true` if `dir` exists and has any entry, dotfiles included.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    fn is_non_empty(&self, dir: &Path) -> Result<bool>;
    /// Remove a directory tree. Missing paths are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove every entry inside `dir`, keeping `dir` itself.
    ///
    /// # Errors
    ///
    /// Returns the first failure, with the offending path.
    fn clear_dir(&self, dir: &Path) -> Result<()>;
    /// Create `dir` and its parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, dir: &Path) -> Result<()>;
    /// Read a file; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    fn read_optional(&self, path: &Path) -> Result<Option<String>>;
    /// Write (create or truncate) a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
}

/// Process lookup and termination by TCP port.
#[allow(async_fn_in_trait)]
pub trait PortControl {
    /// PIDs of processes bound to `port`. Empty when the port is free.
    async fn pids_on_port(&self, port: u16) -> Result<Vec<u32>>;
    /// Forcibly terminate `pid`.
    async fn kill(&self, pid: u32) -> Result<()>;
}

/// Local background services for development.
#[allow(async_fn_in_trait)]
pub trait LocalServices {
    /// Replace any same-named container and start a fresh one.
    async fn start_database_container(&self, spec: &DatabaseContainerSpec) -> Result<()>;
    /// Start the dev server in the background, output captured to `log`.
    /// Returns the process id.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn start_dev_server(&self, dir: &Path, port: u16, log: &Path) -> Result<u32>;
    /// Open `url` in the user's browser.
    ///
    /// # Errors
    ///
    /// Returns an error if no browser could be launched.
    fn open_browser(&self, url: &str) -> Result<()>;
}

/// Composite trait: everything the pipeline needs from the local machine.
pub trait LocalToolchain:
    Scaffolder + SourceTree + SchemaMigrator + ProjectFs + PortControl + LocalServices
{
}

/// Blanket implementation: any type implementing all sub-traits is a `LocalToolchain`.
impl<T> LocalToolchain for T where
    T: Scaffolder + SourceTree + SchemaMigrator + ProjectFs + PortControl + LocalServices
{
}

// ── Network Probe Port ────────────────────────────────────────────────────────

/// HTTP readiness check.
#[allow(async_fn_in_trait)]
pub trait HttpProbe {
    /// `true` if `url` answers with a 2xx status after redirects. Never errors.
    async fn is_ready(&self, url: &str) -> bool;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program in `dir` with extra environment variables.
    async fn run_in(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<Output>;
    /// Run a program in `dir` with stdin piped from `stdin`.
    async fn run_with_stdin(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        stdin: &[u8],
    ) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
    /// Start a program that outlives this process, stdout and stderr
    /// appended to `log`. Returns its pid.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened or the process
    /// cannot be spawned.
    fn spawn_detached(&self, dir: &Path, program: &str, args: &[&str], log: &Path)
    -> Result<u32>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<ShipstackConfig>;
    /// Persist configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &ShipstackConfig) -> Result<()>;
    /// Location of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
