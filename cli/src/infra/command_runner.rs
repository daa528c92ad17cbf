//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` runs the service CLIs (`gh`, `vercel`, `neonctl`) and
//! local tools with a guaranteed timeout: on expiry the child is killed, not
//! left orphaned.

use std::fs::OpenOptions;
use std::path::Path;
use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::application::ports::CommandRunner;

/// Default timeout for quick service queries (auth status, list, view).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for long-running work: scaffolding, installs, deploys.
pub const LONG_CMD_TIMEOUT: Duration = Duration::from_secs(900);

/// Production `CommandRunner`.
///
/// `tokio::time::timeout` around `.output().await` drops the future but does
/// not terminate the process, so the timeout branch kills the child
/// explicitly via `tokio::select!`.
pub struct TokioCommandRunner {
    timeout: Duration,
    long_timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            long_timeout: LONG_CMD_TIMEOUT,
        }
    }

    async fn collect(
        mut command: Command,
        program: &str,
        stdin: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<Output> {
        tracing::debug!(program, timeout_secs = timeout.as_secs(), "spawning");
        let mut child = command
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdin_handle = child.stdin.take();
        let input = stdin.map(<[u8]>::to_vec);
        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr, ()) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        if let (Some(mut h), Some(bytes)) = (stdin_handle, input) {
                            let _ = h.write_all(&bytes).await;
                            // closing stdin signals EOF to prompts reading a value
                            drop(h);
                        }
                    },
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let mut command = Command::new(program);
        command.args(args);
        Self::collect(command, program, None, timeout).await
    }

    async fn run_in(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<Output> {
        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(dir)
            .envs(env.iter().copied());
        Self::collect(command, program, None, self.long_timeout).await
    }

    async fn run_with_stdin(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        stdin: &[u8],
    ) -> Result<Output> {
        let mut command = Command::new(program);
        command.args(args).current_dir(dir);
        Self::collect(command, program, Some(stdin), self.long_timeout).await
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        let mut child = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }

    fn spawn_detached(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
        log: &Path,
    ) -> Result<u32> {
        let out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log)
            .with_context(|| format!("opening {}", log.display()))?;
        let err = out
            .try_clone()
            .with_context(|| format!("duplicating handle for {}", log.display()))?;
        // std::process so the child is not tied to the runtime's reaper
        let child = std::process::Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(out)
            .stderr(err)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;
        Ok(child.id())
    }
}

/// Turn a finished command into its trimmed stdout, or an error carrying
/// stderr when it exited non-zero.
///
/// # Errors
///
/// Returns an error if the command did not succeed.
pub fn stdout_or_error(program: &str, output: &Output) -> Result<String> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        anyhow::bail!("{program} exited with {}", output.status);
    }
    anyhow::bail!("{program} failed: {stderr}")
}
