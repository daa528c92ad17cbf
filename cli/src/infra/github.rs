//! GitHub adapter: drives the `gh` CLI.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, RepositoryHost, ServiceClient};
use crate::domain::resource::{ExternalResource, Service};
use crate::infra::command_runner::stdout_or_error;

const GH: &str = "gh";
const DELETE_SCOPE: &str = "delete_repo";

/// `RepositoryHost` backed by the GitHub CLI.
pub struct GhCli<R> {
    runner: R,
}

impl<R: CommandRunner> GhCli<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn gh(&self, args: &[&str]) -> Result<String> {
        let output = self.runner.run(GH, args).await?;
        stdout_or_error(GH, &output)
    }

    async fn full_name(&self, name: &str) -> Result<String> {
        let owner = self.current_user().await?;
        Ok(format!("{owner}/{name}"))
    }
}

impl<R: CommandRunner> ServiceClient for GhCli<R> {
    fn service(&self) -> Service {
        Service::Vcs
    }

    async fn auth_status(&self) -> Result<bool> {
        let output = self.runner.run(GH, &["auth", "status"]).await?;
        Ok(output.status.success())
    }

    async fn login(&self) -> Result<()> {
        let status = self
            .runner
            .run_status(GH, &["auth", "login", "--web", "--git-protocol", "https"])
            .await?;
        anyhow::ensure!(status.success(), "gh auth login exited with {status}");
        Ok(())
    }

    async fn find(&self, name: &str) -> Result<ExternalResource> {
        let full = self.full_name(name).await?;
        let output = self
            .runner
            .run(GH, &["repo", "view", &full, "--json", "url", "--jq", ".url"])
            .await?;
        if output.status.success() {
            return Ok(ExternalResource::present(Service::Vcs, name, Some(full)));
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_not_found(&stderr) {
            return Ok(ExternalResource::absent(Service::Vcs, name));
        }
        anyhow::bail!("gh repo view {full} failed: {}", stderr.trim())
    }

    async fn remove(&self, resource: &ExternalResource) -> Result<()> {
        let full = match &resource.id {
            Some(id) => id.clone(),
            None => self.full_name(&resource.name).await?,
        };
        self.gh(&["repo", "delete", &full, "--yes"])
            .await
            .with_context(|| format!("deleting repository {full}"))?;
        Ok(())
    }
}

impl<R: CommandRunner> RepositoryHost for GhCli<R> {
    async fn current_user(&self) -> Result<String> {
        let login = self.gh(&["api", "user", "--jq", ".login"]).await?;
        anyhow::ensure!(!login.is_empty(), "gh api user returned no login");
        Ok(login)
    }

    async fn has_delete_scope(&self) -> Result<bool> {
        let output = self.runner.run(GH, &["auth", "status"]).await?;
        // gh prints the token scopes to stderr on older releases, stdout on newer
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(text.contains(DELETE_SCOPE))
    }

    async fn grant_delete_scope(&self) -> Result<()> {
        let status = self
            .runner
            .run_status(GH, &["auth", "refresh", "-h", "github.com", "-s", DELETE_SCOPE])
            .await?;
        anyhow::ensure!(status.success(), "gh auth refresh exited with {status}");
        Ok(())
    }

    async fn create_public_repo(&self, dir: &Path, name: &str) -> Result<String> {
        let output = self
            .runner
            .run_in(
                dir,
                GH,
                &[
                    "repo", "create", name, "--public", "--source", ".", "--remote", "origin",
                    "--push",
                ],
                &[],
            )
            .await?;
        let stdout = stdout_or_error(GH, &output)?;
        if let Some(url) = repo_url(&stdout) {
            return Ok(url);
        }
        Ok(format!("https://github.com/{}", self.full_name(name).await?))
    }
}

fn is_not_found(stderr: &str) -> bool {
    stderr.contains("Could not resolve to a Repository") || stderr.contains("HTTP 404")
}

fn repo_url(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .find(|token| token.starts_with("https://github.com/"))
        .map(|url| url.trim_end_matches(".git").to_string())
}
