//! Neon adapter: drives the `neonctl` CLI with JSON output.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::ports::{CommandRunner, DatabaseHost, ServiceClient};
use crate::domain::pipeline::CreatedDatabase;
use crate::domain::resource::{ExternalResource, Service};
use crate::infra::command_runner::stdout_or_error;

const NEONCTL: &str = "neonctl";

/// `DatabaseHost` backed by `neonctl`.
pub struct NeonCli<R> {
    runner: R,
}

#[derive(Debug, Deserialize)]
struct Org {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Project {
    id: String,
    name: String,
}

/// `projects list` prints either a bare array or `{"projects": [...]}`
/// depending on the CLI release.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProjectList {
    Bare(Vec<Project>),
    Wrapped { projects: Vec<Project> },
}

#[derive(Debug, Deserialize)]
struct ConnectionUri {
    #[serde(default)]
    connection_uri: String,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    project: Option<Project>,
    #[serde(default)]
    connection_uris: Vec<ConnectionUri>,
}

impl<R: CommandRunner> NeonCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn neonctl(&self, args: &[&str]) -> Result<String> {
        let output = self.runner.run(NEONCTL, args).await?;
        stdout_or_error(NEONCTL, &output)
    }
}

impl<R: CommandRunner> ServiceClient for NeonCli<R> {
    fn service(&self) -> Service {
        Service::Database
    }

    async fn auth_status(&self) -> Result<bool> {
        let output = self.runner.run(NEONCTL, &["me", "--output", "json"]).await?;
        Ok(output.status.success())
    }

    async fn login(&self) -> Result<()> {
        let status = self.runner.run_status(NEONCTL, &["auth"]).await?;
        anyhow::ensure!(status.success(), "neonctl auth exited with {status}");
        Ok(())
    }

    async fn find(&self, name: &str) -> Result<ExternalResource> {
        let projects = self.list_projects().await?;
        Ok(match projects.into_iter().find(|(n, _)| n == name) {
            Some((_, id)) => ExternalResource::present(Service::Database, name, Some(id)),
            None => ExternalResource::absent(Service::Database, name),
        })
    }

    async fn remove(&self, resource: &ExternalResource) -> Result<()> {
        let id = resource
            .id
            .as_deref()
            .with_context(|| format!("project '{}' has no id", resource.name))?;
        self.neonctl(&["projects", "delete", id])
            .await
            .with_context(|| format!("deleting project {id}"))?;
        Ok(())
    }
}

impl<R: CommandRunner> DatabaseHost for NeonCli<R> {
    async fn list_orgs(&self) -> Result<Vec<String>> {
        let stdout = self.neonctl(&["orgs", "list", "--output", "json"]).await?;
        let orgs: Vec<Org> = serde_json::from_str(&stdout).context("parsing orgs list")?;
        Ok(orgs.into_iter().map(|o| o.id).collect())
    }

    async fn set_context(&self, org_id: &str) -> Result<()> {
        self.neonctl(&["set-context", "--org-id", org_id]).await?;
        Ok(())
    }

    async fn list_projects(&self) -> Result<Vec<(String, String)>> {
        let stdout = self
            .neonctl(&["projects", "list", "--output", "json"])
            .await?;
        parse_projects(&stdout)
    }

    async fn create_project(&self, name: &str, org_id: &str) -> Result<CreatedDatabase> {
        let stdout = self
            .neonctl(&[
                "projects", "create", "--name", name, "--org-id", org_id, "--output", "json",
            ])
            .await?;
        parse_created(&stdout)
    }

    async fn connection_string(
        &self,
        project_id: &str,
        database: &str,
        role: &str,
    ) -> Result<String> {
        self.neonctl(&[
            "connection-string",
            "--project-id",
            project_id,
            "--database-name",
            database,
            "--role-name",
            role,
        ])
        .await
    }
}

fn parse_projects(json: &str) -> Result<Vec<(String, String)>> {
    let list: ProjectList = serde_json::from_str(json).context("parsing projects list")?;
    let projects = match list {
        ProjectList::Bare(p) | ProjectList::Wrapped { projects: p } => p,
    };
    Ok(projects.into_iter().map(|p| (p.name, p.id)).collect())
}

/// Map the create response without validating it; missing fields stay
/// missing so the pipeline can reject them.
fn parse_created(json: &str) -> Result<CreatedDatabase> {
    let response: CreateResponse =
        serde_json::from_str(json).context("parsing projects create output")?;
    Ok(CreatedDatabase {
        project_id: response.project.map(|p| p.id),
        connection_uri: response
            .connection_uris
            .into_iter()
            .next()
            .map(|c| c.connection_uri),
    })
}
