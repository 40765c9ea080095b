//! Git command execution.
//!
//! This module is the only place that spawns subprocesses. Commands are built
//! as structured argument vectors (never shell strings), and a non-zero exit
//! is a normal, inspectable outcome rather than an error. The only hard
//! failure is being unable to spawn git at all.

use anyhow::Context;
use std::path::Path;
use std::process::Command;

/// Captured output of a single git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
}

impl GitOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs `git` with the given arguments in `repo`, capturing both streams.
///
/// Returns `Err` only when the process cannot be spawned (git missing, bad
/// working directory). Callers inspect `GitOutput::success` for command-level
/// failures.
pub fn run_git(repo: &Path, args: &[&str]) -> anyhow::Result<GitOutput> {
    let output = Command::new("git")
        .current_dir(repo)
        .args(args)
        .output()
        .with_context(|| format!("Failed to spawn git {} in {}", args.join(" "), repo.display()))?;

    Ok(GitOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        code: output.status.code(),
    })
}

/// Verifies that a runnable `git` binary is on the PATH.
///
/// Called once before any repository is touched; failure aborts the whole run.
pub fn check_git_installed() -> anyhow::Result<()> {
    let output = Command::new("git")
        .arg("--version")
        .output()
        .context("Git not found. Please install git and try again.")?;

    if !output.status.success() {
        anyhow::bail!("Git not found. Please install git and try again.");
    }
    Ok(())
}
