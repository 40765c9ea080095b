//! Repository discovery, the per-repository update state machine, and the
//! orchestrator that runs it across a workspace.

use crate::classify::{self, PullOutcome};
use crate::config::Config;
use crate::constants::{GIT_DIR, MAX_RECOVERY_ATTEMPTS, UNKNOWN_REVISION};
use crate::git::{self, GitOutput};
use crate::prompt::Confirmer;
use anyhow::Context;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Terminal state of one repository update. Only the first two variants count
/// as a successful update; `DetachedFetched` is blocked-but-expected, the
/// rest are failures of one kind or another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// New commits were integrated.
    Updated { revision: String },
    /// Nothing to do; already at the remote tip.
    UpToDate { revision: String },
    /// No branch checked out; refs were fetched but nothing was merged.
    DetachedFetched,
    /// The user declined destructive recovery.
    SkippedByUser,
    /// The reset/clean itself did not take effect.
    RecoveryFailed,
    /// Recovery ran the maximum number of times without clearing the conflict.
    GaveUp,
    /// Unrecognized failure.
    Failed { error: String },
}

impl UpdateOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Updated { .. } | Self::UpToDate { .. })
    }
}

/// Result of updating one repository. The log is append-only: every decision
/// the engine took is recorded as a line and nothing is ever edited out, so
/// the printed message is a full audit trail.
#[derive(Debug)]
pub struct UpdateResult {
    pub path: PathBuf,
    pub outcome: UpdateOutcome,
    pub log: Vec<String>,
    pub duration: Duration,
}

impl UpdateResult {
    #[must_use]
    pub fn message(&self) -> String {
        self.log.join("\n")
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// A directory is a repository root when it carries a `.git` entry. A plain
/// file counts too: worktrees and submodules use a gitlink file.
#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    path.join(GIT_DIR).exists()
}

/// Walks `root` and returns every repository root underneath it, in traversal
/// order (not sorted). Traversal never descends into `.git` itself, but does
/// descend into the rest of a repository, so repositories nested inside other
/// repositories are all reported.
#[must_use]
pub fn find_git_repos(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != GIT_DIR)
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir() && is_git_repo(entry.path()))
        .map(|entry| {
            std::path::absolute(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf())
        })
        .collect()
}

/// Updates a single repository and reports everything that happened.
///
/// A spawn-level failure (git disappeared mid-run, repository directory
/// removed) degrades to a `Failed` outcome rather than propagating, so one
/// broken repository never takes down the rest of the run.
pub fn update(path: &Path, config: &Config, confirmer: &dyn Confirmer) -> UpdateResult {
    let started = Instant::now();
    let mut log = Vec::new();

    if config.verbose {
        log.push(format!("\"{}\" checking for updates...", path.display()));
    } else {
        log.push(format!("Checking updates for \"{}\"...", path.display()));
    }

    let outcome = match run_update(path, config, confirmer, &mut log) {
        Ok(outcome) => outcome,
        Err(err) => {
            log.push(format!("Problem occurred while updating repository: {err:#}"));
            UpdateOutcome::Failed {
                error: format!("{err:#}"),
            }
        }
    };

    UpdateResult {
        path: path.to_path_buf(),
        outcome,
        log,
        duration: started.elapsed(),
    }
}

/// Issues the update command appropriate for the current branch state.
///
/// With a branch checked out this is a plain pull. Detached, it is a fetch
/// followed by a fast-forward-only merge against the upstream tracking ref;
/// a failed fetch short-circuits and is returned for classification.
fn attempt_pull(path: &Path) -> anyhow::Result<GitOutput> {
    let branch = git::run_git(path, &["symbolic-ref", "--short", "HEAD"])?;
    let detached = !branch.success() || branch.stdout.trim().is_empty();

    if detached {
        let fetch = git::run_git(path, &["fetch"])?;
        if !fetch.success() {
            return Ok(fetch);
        }
        git::run_git(path, &["merge", "--ff-only", "@{u}"])
    } else {
        git::run_git(path, &["pull"])
    }
}

/// The update state machine: pull, classify, and on a recoverable conflict
/// confirm + recover + retry. The retry is an explicit bounded loop, not
/// recursion; after `MAX_RECOVERY_ATTEMPTS` recoveries the engine gives up
/// with a distinct outcome.
fn run_update(
    path: &Path,
    config: &Config,
    confirmer: &dyn Confirmer,
    log: &mut Vec<String>,
) -> anyhow::Result<UpdateOutcome> {
    let mut recoveries = 0;

    loop {
        let pull = attempt_pull(path)?;

        match classify::classify(&pull) {
            PullOutcome::UpToDate => {
                let revision = head_revision(path)?;
                log.push(format!("Already at the latest revision '{revision}'."));
                return Ok(UpdateOutcome::UpToDate { revision });
            }
            PullOutcome::Updated => {
                let revision = head_revision(path)?;
                log.push(format!("Updated to the latest revision '{revision}'."));
                return Ok(UpdateOutcome::Updated { revision });
            }
            PullOutcome::WouldOverwrite { untracked } => {
                log.push("Problem occurred while updating repository.".to_string());
                log.push("Error: Files would be overwritten by merge.".to_string());

                if recoveries >= MAX_RECOVERY_ATTEMPTS {
                    log.push("Giving up: recovery did not clear the conflict.".to_string());
                    return Ok(UpdateOutcome::GaveUp);
                }

                if !config.assume_yes && !confirmer.confirm(path) {
                    log.push("Update skipped by user.".to_string());
                    return Ok(UpdateOutcome::SkippedByUser);
                }

                let recovery_args: &[&str] = if untracked {
                    &["clean", "-df"]
                } else {
                    &["reset", "--hard"]
                };
                let recovery = git::run_git(path, recovery_args)?;

                // `clean` prints removal notices, never the reset marker, so
                // its exit status is the only confirmation available there.
                let recovered = recovery.success()
                    && (untracked || recovery.stdout.contains(classify::RESET_CONFIRMED_MARKER));

                if !recovered {
                    log.push("Unable to reset local copy to current git branch.".to_string());
                    return Ok(UpdateOutcome::RecoveryFailed);
                }

                recoveries += 1;
                log.push("Local copy reset to current git branch.".to_string());
                log.push("Attempting to run update again...".to_string());
            }
            PullOutcome::DetachedHead => {
                log.push("Problem occurred while updating repository.".to_string());
                log.push("Repository is in detached HEAD state.".to_string());

                // Merging is off the table; at least bring the refs up to date.
                let fetch = git::run_git(path, &["fetch"])?;
                log.push("Fetched updates but cannot merge (detached HEAD).".to_string());
                if config.verbose {
                    for stream in [&fetch.stdout, &fetch.stderr] {
                        let trimmed = stream.trim();
                        if !trimmed.is_empty() {
                            log.push(trimmed.to_string());
                        }
                    }
                }
                return Ok(UpdateOutcome::DetachedFetched);
            }
            PullOutcome::Unknown => {
                log.push("Problem occurred while updating repository.".to_string());
                log.push("Please make sure that you have a 'git' package installed.".to_string());
                if config.verbose && !pull.stderr.trim().is_empty() {
                    log.push(pull.stderr.trim().to_string());
                }
                let error = pull
                    .stderr
                    .lines()
                    .next()
                    .unwrap_or("update failed")
                    .to_string();
                return Ok(UpdateOutcome::Failed { error });
            }
        }
    }
}

/// Resolves HEAD to its abbreviated revision, or `-` when the output does not
/// look like a full object id.
fn head_revision(path: &Path) -> anyhow::Result<String> {
    let out = git::run_git(path, &["rev-parse", "--verify", "HEAD"])?;
    Ok(classify::short_revision(&out.stdout).unwrap_or_else(|| UNKNOWN_REVISION.to_string()))
}

/// Runs every repository, sequentially or on a bounded worker pool.
///
/// `on_complete` fires as each repository finishes, in completion order. The
/// returned results are always in the same order as `repos`: indexed parallel
/// iteration collects into input order regardless of which worker finished
/// first, so no re-sort is needed for discovery-order reporting.
pub fn update_all<F>(
    repos: &[PathBuf],
    config: &Config,
    confirmer: &dyn Confirmer,
    on_complete: F,
) -> anyhow::Result<Vec<UpdateResult>>
where
    F: Fn(&UpdateResult) + Sync,
{
    if config.parallel && repos.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .build()
            .context("Failed to build worker pool")?;

        Ok(pool.install(|| {
            repos
                .par_iter()
                .map(|repo| {
                    let result = update(repo, config, confirmer);
                    on_complete(&result);
                    result
                })
                .collect()
        }))
    } else {
        Ok(repos
            .iter()
            .map(|repo| {
                let result = update(repo, config, confirmer);
                on_complete(&result);
                result
            })
            .collect())
    }
}
