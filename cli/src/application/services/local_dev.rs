//! Application service: local port cleanup, database container and dev
//! server.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{
    DatabaseContainerSpec, HttpProbe, LocalServices, PortControl, ProgressReporter,
};
use crate::application::services::readiness::wait_until_ready;
use crate::domain::app_name::ApplicationName;
use crate::domain::readiness::{ProbePolicy, ReadinessOutcome};

/// File the dev server's output is captured to, inside the project directory.
pub const DEV_SERVER_LOG: &str = ".shipstack-dev.log";

/// Password for the throwaway local database container.
const LOCAL_DB_PASSWORD: &str = "password";

/// Terminate every process bound to `port`.
///
/// Idempotent: a free port is a no-op returning `Ok(0)`.
///
/// # Errors
///
/// Returns an error if the port cannot be inspected or a process cannot be
/// killed.
pub async fn free_port(ports: &impl PortControl, port: u16) -> Result<usize> {
    let pids = ports
        .pids_on_port(port)
        .await
        .with_context(|| format!("finding processes on port {port}"))?;
    for pid in &pids {
        tracing::info!(pid, port, "killing process bound to port");
        ports
            .kill(*pid)
            .await
            .with_context(|| format!("killing pid {pid} on port {port}"))?;
    }
    Ok(pids.len())
}

/// Container parameters for an application's local database.
#[must_use]
pub fn container_spec(app: &ApplicationName, host_port: u16) -> DatabaseContainerSpec {
    DatabaseContainerSpec {
        name: format!("{app}-postgres"),
        host_port,
        database: app.as_str().replace(['-', '.'], "_"),
        password: LOCAL_DB_PASSWORD.to_string(),
    }
}

/// Connection URI matching [`container_spec`].
#[must_use]
pub fn local_database_url(spec: &DatabaseContainerSpec) -> String {
    format!(
        "postgresql://postgres:{}@localhost:{}/{}",
        spec.password, spec.host_port, spec.database
    )
}

/// Free the database port and start the local database container.
///
/// # Errors
///
/// Returns an error if the port cannot be freed or the container fails to
/// start.
pub async fn start_local_database(
    local: &(impl PortControl + LocalServices),
    reporter: &impl ProgressReporter,
    spec: &DatabaseContainerSpec,
) -> Result<()> {
    let killed = free_port(local, spec.host_port).await?;
    if killed > 0 {
        reporter.warn(&format!(
            "stopped {killed} process(es) holding port {}",
            spec.host_port
        ));
    }
    local
        .start_database_container(spec)
        .await
        .with_context(|| format!("starting container {}", spec.name))
}

/// Start the dev server, wait for it, and open it when it answers.
///
/// Returns the server pid and the probe outcome. The browser is only opened
/// when the server became ready.
///
/// # Errors
///
/// Returns an error if the dev server cannot be spawned.
pub async fn start_dev_server(
    local: &(impl PortControl + LocalServices),
    http: &impl HttpProbe,
    reporter: &impl ProgressReporter,
    dir: &Path,
    port: u16,
    policy: ProbePolicy,
) -> Result<(u32, ReadinessOutcome)> {
    let killed = free_port(local, port).await?;
    if killed > 0 {
        reporter.warn(&format!("stopped {killed} process(es) holding port {port}"));
    }
    let pid = local
        .start_dev_server(dir, port, &dir.join(DEV_SERVER_LOG))
        .context("starting dev server")?;
    let url = format!("http://localhost:{port}");
    reporter.step(&format!("waiting for dev server at {url}..."));
    let outcome = wait_until_ready(http, &url, policy).await;
    if outcome.is_ready()
        && let Err(e) = local.open_browser(&url)
    {
        reporter.warn(&format!("could not open browser: {e:#}"));
    }
    Ok((pid, outcome))
}
