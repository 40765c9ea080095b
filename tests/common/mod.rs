//! Test infrastructure for gitdater integration tests.

#![allow(dead_code)]

use anyhow::Result;
use gitdater::config::Config;
use gitdater::git;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Default configuration for engine tests: sequential, quiet, no auto-yes.
pub fn test_config() -> Config {
    Config::default()
}

/// Runs git and fails the test on a non-zero exit.
pub fn git_ok(repo: &Path, args: &[&str]) -> Result<String> {
    let out = git::run_git(repo, args)?;
    anyhow::ensure!(
        out.success(),
        "git {} failed: {}",
        args.join(" "),
        out.stderr
    );
    Ok(out.stdout.trim().to_string())
}

fn configure_user(repo: &Path) -> Result<()> {
    git_ok(repo, &["config", "user.email", "test@example.com"])?;
    git_ok(repo, &["config", "user.name", "Test User"])?;
    Ok(())
}

/// A local clone with a real upstream, plus a second "author" clone used to
/// publish upstream commits behind the local clone's back.
/// Everything lives in one TempDir and is cleaned up on drop.
pub struct TestRepo {
    _workspace: TempDir,
    path: PathBuf,
    author: PathBuf,
}

impl TestRepo {
    /// Creates remote + author + local, with one commit pushed to master.
    pub fn new() -> Result<Self> {
        let workspace = TempDir::new()?;
        let remote = workspace.path().join("remote.git");
        std::fs::create_dir(&remote)?;
        git_ok(&remote, &["init", "--bare", "-b", "master"])?;

        let author = workspace.path().join("author");
        std::fs::create_dir(&author)?;
        git_ok(&author, &["init", "-b", "master"])?;
        configure_user(&author)?;
        std::fs::write(author.join("README.md"), "# Test Repo\n")?;
        git_ok(&author, &["add", "README.md"])?;
        git_ok(&author, &["commit", "-m", "Initial commit"])?;
        git_ok(
            &author,
            &["remote", "add", "origin", remote.to_str().unwrap()],
        )?;
        git_ok(&author, &["push", "-u", "origin", "master"])?;

        git_ok(
            workspace.path(),
            &["clone", remote.to_str().unwrap(), "local"],
        )?;
        let path = workspace.path().join("local");
        configure_user(&path)?;

        Ok(Self {
            _workspace: workspace,
            path,
            author,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Publishes a new commit upstream without touching the local clone.
    pub fn push_upstream_change(&self, file: &str, contents: &str) -> Result<()> {
        std::fs::write(self.author.join(file), contents)?;
        git_ok(&self.author, &["add", "-f", file])?;
        git_ok(&self.author, &["commit", "-m", "Upstream change"])?;
        git_ok(&self.author, &["push", "origin", "master"])?;
        Ok(())
    }

    /// Writes a file in the local clone without committing it.
    pub fn write_local(&self, file: &str, contents: &str) -> Result<()> {
        std::fs::write(self.path.join(file), contents)?;
        Ok(())
    }

    pub fn read_local(&self, file: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.path.join(file))?)
    }

    pub fn detach_head(&self) -> Result<()> {
        git_ok(&self.path, &["checkout", "--detach", "HEAD"])?;
        Ok(())
    }

    /// Full object id of the local HEAD.
    pub fn head(&self) -> Result<String> {
        git_ok(&self.path, &["rev-parse", "--verify", "HEAD"])
    }

    /// Full object id the upstream master currently points at.
    pub fn upstream_head(&self) -> Result<String> {
        git_ok(&self.author, &["rev-parse", "--verify", "HEAD"])
    }

    /// Resolves a ref in the local clone (e.g. `origin/master`).
    pub fn local_ref(&self, name: &str) -> Result<String> {
        git_ok(&self.path, &["rev-parse", "--verify", name])
    }
}

/// Initializes a standalone repository (no remote) with one commit.
pub fn init_repo(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    git_ok(path, &["init", "-b", "master"])?;
    configure_user(path)?;
    std::fs::write(path.join("README.md"), "# Test Repo\n")?;
    git_ok(path, &["add", "README.md"])?;
    git_ok(path, &["commit", "-m", "Initial commit"])?;
    Ok(())
}

/// Builds `names` clones under `root`, each with its own upstream under
/// `upstreams` so that discovery over `root` finds exactly the clones.
pub fn setup_workspace(root: &Path, upstreams: &Path, names: &[&str]) -> Result<Vec<PathBuf>> {
    let mut repos = Vec::new();
    for name in names {
        let remote = upstreams.join(format!("{name}-remote.git"));
        std::fs::create_dir_all(&remote)?;
        git_ok(&remote, &["init", "--bare", "-b", "master"])?;

        let seed = upstreams.join(format!("{name}-seed"));
        init_repo(&seed)?;
        git_ok(
            &seed,
            &["remote", "add", "origin", remote.to_str().unwrap()],
        )?;
        git_ok(&seed, &["push", "-u", "origin", "master"])?;

        git_ok(root, &["clone", remote.to_str().unwrap(), name])?;
        let clone = root.join(name);
        configure_user(&clone)?;
        repos.push(clone);
    }
    Ok(repos)
}
