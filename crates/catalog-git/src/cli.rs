//! `git` subprocess backend

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::backend::{PathChanges, VcsBackend};
use crate::{Error, Result};

/// Upper bound for any single git invocation.
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(15);

const LOG_FORMAT: &str = "--format=%h %s (%an, %ar)";

/// Runs the `git` binary inside a working copy.
///
/// Every invocation is bounded by a timeout; a command that overruns it is
/// killed. Credential prompts are disabled so a fetch against a protected
/// remote fails instead of waiting on a terminal.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
    timeout: Duration,
}

impl GitCli {
    /// Create a backend for the working copy at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }

    /// Override the per-command timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Working copy the commands run in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `git <args>` and return stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        let command = args.join(" ");
        tracing::debug!(root = ?self.root, %command, "Running git");

        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(&self.root)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?,
            Err(_) => {
                return Err(Error::Timeout {
                    command,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command,
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl VcsBackend for GitCli {
    async fn fetch_remote_refs(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["fetch", "--quiet", remote, branch]).await?;
        Ok(())
    }

    async fn count_ahead_commits(&self, local_ref: &str, remote_ref: &str) -> Result<u64> {
        let range = format!("{local_ref}..{remote_ref}");
        let stdout = self.run(&["rev-list", "--count", &range]).await?;
        parse_count(&stdout).ok_or_else(|| Error::UnexpectedOutput {
            command: format!("rev-list --count {range}"),
            output: stdout.trim().to_string(),
        })
    }

    async fn diff_paths(&self, from: &str, to: &str) -> Result<PathChanges> {
        let range = format!("{from}...{to}");
        let stdout = self
            .run(&["diff", "--name-status", "--no-renames", "-z", &range])
            .await?;
        parse_name_status(&stdout).ok_or_else(|| Error::UnexpectedOutput {
            command: format!("diff --name-status {range}"),
            output: stdout.replace('\0', " ").trim().to_string(),
        })
    }

    async fn format_log(&self, from: &str, to: &str) -> Result<String> {
        let range = format!("{from}..{to}");
        let stdout = self.run(&["log", LOG_FORMAT, &range]).await?;
        Ok(stdout.trim_end().to_string())
    }
}

fn parse_count(stdout: &str) -> Option<u64> {
    stdout.trim().parse().ok()
}

/// Parse NUL-separated `git diff --name-status -z` output.
///
/// Entries alternate status and path. With renames disabled there is
/// exactly one path per status; `A` and `D` are adds and deletes, every
/// other status (`M`, `T`, ...) counts as a modification.
fn parse_name_status(stdout: &str) -> Option<PathChanges> {
    let mut changes = PathChanges::default();
    let mut fields = stdout.split('\0').filter(|s| !s.is_empty());

    while let Some(status) = fields.next() {
        let path = fields.next()?.to_string();
        match status.chars().next()? {
            'A' => changes.added.push(path),
            'D' => changes.deleted.push(path),
            _ => changes.modified.push(path),
        }
    }

    Some(changes)
}
