//! Vercel adapter: drives the `vercel` CLI.

use std::path::Path;
use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, DeployEnvironment, DeploymentHost, ServiceClient};
use crate::domain::resource::{ExternalResource, Service};
use crate::infra::command_runner::stdout_or_error;

const VERCEL: &str = "vercel";

/// `DeploymentHost` backed by the Vercel CLI.
pub struct VercelCli<R> {
    runner: R,
}

impl<R: CommandRunner> VercelCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> ServiceClient for VercelCli<R> {
    fn service(&self) -> Service {
        Service::Hosting
    }

    async fn auth_status(&self) -> Result<bool> {
        let output = self.runner.run(VERCEL, &["whoami"]).await?;
        Ok(output.status.success())
    }

    async fn login(&self) -> Result<()> {
        let status = self.runner.run_status(VERCEL, &["login"]).await?;
        anyhow::ensure!(status.success(), "vercel login exited with {status}");
        Ok(())
    }

    async fn find(&self, name: &str) -> Result<ExternalResource> {
        let projects = self.list_projects().await?;
        Ok(if projects.iter().any(|p| p == name) {
            ExternalResource::present(Service::Hosting, name, Some(name.to_string()))
        } else {
            ExternalResource::absent(Service::Hosting, name)
        })
    }

    async fn remove(&self, resource: &ExternalResource) -> Result<()> {
        // `project rm` asks for confirmation on stdin
        let output = self
            .runner
            .run_with_stdin(
                Path::new("."),
                VERCEL,
                &["project", "rm", &resource.name],
                b"y\n",
            )
            .await?;
        stdout_or_error(VERCEL, &output)
            .with_context(|| format!("removing project {}", resource.name))?;
        Ok(())
    }
}

impl<R: CommandRunner> DeploymentHost for VercelCli<R> {
    async fn list_projects(&self) -> Result<Vec<String>> {
        let output = self.runner.run(VERCEL, &["project", "ls"]).await?;
        let stdout = stdout_or_error(VERCEL, &output)?;
        Ok(parse_project_names(&stdout))
    }

    async fn link_project(&self, dir: &Path, name: &str) -> Result<()> {
        let output = self.runner.run_in(dir, VERCEL, &["project", "add", name], &[]).await?;
        // a project that survived a failed teardown is reused
        if !output.status.success() && !is_already_exists(&output) {
            stdout_or_error(VERCEL, &output).with_context(|| format!("creating project {name}"))?;
        }
        let output = self
            .runner
            .run_in(dir, VERCEL, &["link", "--yes", "--project", name], &[])
            .await?;
        stdout_or_error(VERCEL, &output).with_context(|| format!("linking project {name}"))?;
        Ok(())
    }

    async fn deploy(&self, dir: &Path, production: bool) -> Result<String> {
        let mut args = vec!["deploy", "--yes"];
        if production {
            args.push("--prod");
        }
        let output = self.runner.run_in(dir, VERCEL, &args, &[]).await?;
        stdout_or_error(VERCEL, &output).context("vercel deploy")
    }

    async fn set_env_var(
        &self,
        dir: &Path,
        key: &str,
        value: &str,
        env: DeployEnvironment,
    ) -> Result<()> {
        // replace any stale value; absence is not an error
        let _ = self
            .runner
            .run_in(dir, VERCEL, &["env", "rm", key, env.as_str(), "--yes"], &[])
            .await;
        let output = self
            .runner
            .run_with_stdin(dir, VERCEL, &["env", "add", key, env.as_str()], value.as_bytes())
            .await?;
        stdout_or_error(VERCEL, &output).with_context(|| format!("adding {key}"))?;
        Ok(())
    }

    async fn list_env_vars(&self, dir: &Path, env: DeployEnvironment) -> Result<Vec<String>> {
        let output = self
            .runner
            .run_in(dir, VERCEL, &["env", "ls", env.as_str()], &[])
            .await?;
        let stdout = stdout_or_error(VERCEL, &output)?;
        Ok(parse_env_names(&stdout))
    }
}

fn is_already_exists(output: &Output) -> bool {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    stderr.contains("already exists") || stdout.contains("already exists")
}

/// Project names from the `vercel project ls` table.
fn parse_project_names(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('>') && !line.starts_with("Vercel CLI"))
        .filter_map(|line| line.split_whitespace().next())
        .filter(|name| {
            *name != "Project"
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        })
        .map(str::to_string)
        .collect()
}

/// Variable names from the `vercel env ls` table.
fn parse_env_names(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|name| {
            name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
                && name
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        })
        .map(str::to_string)
        .collect()
}
