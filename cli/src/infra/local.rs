//! Local toolchain adapter: generator, git, schema push, ports, Docker and
//! the dev server, all through a `CommandRunner`.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, DatabaseContainerSpec, LocalServices, PortControl, ProjectFs, Scaffolder,
    SchemaMigrator, SourceTree,
};
use crate::domain::pipeline::ScaffoldProfile;
use crate::infra::command_runner::stdout_or_error;
use crate::infra::fs::LocalFs;

const GENERATOR: &str = "create-t3-app@latest";
const POSTGRES_IMAGE: &str = "postgres:16";

/// `pg_isready` polls while the container initialises.
const CONTAINER_READY_ATTEMPTS: u32 = 30;
const CONTAINER_READY_DELAY: Duration = Duration::from_secs(1);

/// Every local capability the pipeline needs, on this machine.
pub struct ShellLocalHost<R> {
    runner: R,
    fs: LocalFs,
}

impl<R: CommandRunner> ShellLocalHost<R> {
    pub fn new(runner: R) -> Self {
        Self { runner, fs: LocalFs }
    }

    async fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<String> {
        let output = self.runner.run_in(dir, program, args, &[]).await?;
        stdout_or_error(program, &output)
    }
}

impl<R: CommandRunner> Scaffolder for ShellLocalHost<R> {
    async fn scaffold(&self, dir: &Path, profile: &ScaffoldProfile) -> Result<()> {
        let parent = match dir.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("{} has no usable directory name", dir.display()))?;
        let flags = profile.generator_args();
        let mut args = vec!["--yes", GENERATOR, name];
        args.extend(flags.iter().map(String::as_str));
        self.run_in(parent, "npx", &args).await?;
        Ok(())
    }
}

impl<R: CommandRunner> SourceTree for ShellLocalHost<R> {
    async fn commit_all(&self, dir: &Path, message: &str) -> Result<()> {
        self.run_in(dir, "git", &["init", "-b", "main"]).await?;
        self.run_in(dir, "git", &["add", "-A"]).await?;
        self.run_in(dir, "git", &["commit", "-m", message]).await?;
        Ok(())
    }
}

impl<R: CommandRunner> SchemaMigrator for ShellLocalHost<R> {
    async fn push_schema(&self, dir: &Path, connection_uri: &str) -> Result<()> {
        let output = self
            .runner
            .run_in(
                dir,
                "npm",
                &["run", "db:push"],
                &[("DATABASE_URL", connection_uri)],
            )
            .await?;
        stdout_or_error("npm run db:push", &output)?;
        Ok(())
    }
}

impl<R> ProjectFs for ShellLocalHost<R> {
    fn exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }
    fn is_non_empty(&self, dir: &Path) -> Result<bool> {
        self.fs.is_non_empty(dir)
    }
    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.fs.remove_dir_all(path)
    }
    fn clear_dir(&self, dir: &Path) -> Result<()> {
        self.fs.clear_dir(dir)
    }
    fn create_dir_all(&self, dir: &Path) -> Result<()> {
        self.fs.create_dir_all(dir)
    }
    fn read_optional(&self, path: &Path) -> Result<Option<String>> {
        self.fs.read_optional(path)
    }
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.fs.write(path, content)
    }
}

impl<R: CommandRunner> PortControl for ShellLocalHost<R> {
    async fn pids_on_port(&self, port: u16) -> Result<Vec<u32>> {
        let target = format!("tcp:{port}");
        let output = self.runner.run("lsof", &["-ti", &target]).await?;
        // lsof exits 1 with no output when nothing matches
        if !output.status.success() && output.stdout.is_empty() {
            return Ok(Vec::new());
        }
        Ok(parse_pids(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn kill(&self, pid: u32) -> Result<()> {
        let pid = pid.to_string();
        let output = self.runner.run("kill", &["-9", &pid]).await?;
        stdout_or_error("kill", &output)?;
        Ok(())
    }
}

impl<R: CommandRunner> LocalServices for ShellLocalHost<R> {
    async fn start_database_container(&self, spec: &DatabaseContainerSpec) -> Result<()> {
        // absent container is fine
        let _ = self.runner.run("docker", &["rm", "-f", &spec.name]).await;

        let port_map = format!("{}:5432", spec.host_port);
        let password = format!("POSTGRES_PASSWORD={}", spec.password);
        let database = format!("POSTGRES_DB={}", spec.database);
        let output = self
            .runner
            .run(
                "docker",
                &[
                    "run", "-d", "--name", &spec.name, "-e", &password, "-e", &database, "-p",
                    &port_map, POSTGRES_IMAGE,
                ],
            )
            .await?;
        stdout_or_error("docker run", &output)?;

        for attempt in 1..=CONTAINER_READY_ATTEMPTS {
            let ready = self
                .runner
                .run("docker", &["exec", &spec.name, "pg_isready", "-U", "postgres"])
                .await
                .is_ok_and(|o| o.status.success());
            if ready {
                tracing::debug!(container = %spec.name, attempt, "database accepting connections");
                return Ok(());
            }
            tokio::time::sleep(CONTAINER_READY_DELAY).await;
        }
        anyhow::bail!(
            "container {} not accepting connections after {CONTAINER_READY_ATTEMPTS} checks",
            spec.name
        )
    }

    fn start_dev_server(&self, dir: &Path, port: u16, log: &Path) -> Result<u32> {
        let port = port.to_string();
        self.runner
            .spawn_detached(dir, "npm", &["run", "dev", "--", "--port", &port], log)
    }

    fn open_browser(&self, url: &str) -> Result<()> {
        open::that(url).with_context(|| format!("opening {url}"))
    }
}

fn parse_pids(output: &str) -> Vec<u32> {
    let mut pids: Vec<u32> = output
        .lines()
        .filter_map(|line| line.trim().parse().ok())
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}
