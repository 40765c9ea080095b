//! Pure classification of git output.
//!
//! Everything in this module is a function of captured text plus an exit
//! code, so the whole taxonomy can be exercised against literal fixtures
//! without spawning a subprocess.
//!
//! Known limitation: every marker below is a substring or regex match on
//! whatever the installed git version printed. Different versions or locales
//! can and do change these strings; there is no structured signal available
//! from the git CLI, so this fragility is accepted rather than papered over.

use crate::constants::SHORT_REVISION_LEN;
use crate::git::GitOutput;
use regex::Regex;
use std::sync::LazyLock;

/// Marker git prints for a no-op pull ("Already up to date." and older
/// variants all start with this word).
pub const UP_TO_DATE_MARKER: &str = "Already";

/// Marker `git reset --hard` prints on success.
pub const RESET_CONFIRMED_MARKER: &str = "HEAD is now at";

/// Distinguishes the untracked-files overwrite refusal from the
/// local-modifications one.
pub const UNTRACKED_MARKER: &str = "untracked";

/// Known stderr substrings for git refusing to act without a checked-out branch.
pub const DETACHED_MARKERS: [&str; 3] = [
    "You are not currently on a branch",
    "HEAD does not point to a branch",
    "detached HEAD",
];

static OVERWRITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"error:.*files would be overwritten by merge")
        .expect("overwrite pattern must compile")
});

static OBJECT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[0-9a-f]{32,}").expect("object id pattern must compile"));

/// Classification of a single pull (or fetch + ff-only merge) invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// Exit 0 and git said nothing changed.
    UpToDate,
    /// Exit 0 and new commits were integrated.
    Updated,
    /// Git refused because local files would be overwritten by the merge.
    /// Recoverable by discarding local state.
    WouldOverwrite {
        /// The refusal was about untracked files (clean) rather than tracked
        /// modifications (hard reset).
        untracked: bool,
    },
    /// Git refused because no branch is checked out.
    DetachedHead,
    /// Anything else; not recoverable here.
    Unknown,
}

/// Maps one git invocation onto the update taxonomy.
///
/// Failure patterns are checked in priority order: the overwrite refusal is
/// more specific than the detached-HEAD markers, which are more specific than
/// the catch-all.
#[must_use]
pub fn classify(output: &GitOutput) -> PullOutcome {
    if output.success() {
        if output.stdout.contains(UP_TO_DATE_MARKER) {
            return PullOutcome::UpToDate;
        }
        return PullOutcome::Updated;
    }

    if OVERWRITE_RE.is_match(&output.stderr) {
        return PullOutcome::WouldOverwrite {
            untracked: output.stderr.contains(UNTRACKED_MARKER),
        };
    }

    if DETACHED_MARKERS.iter().any(|m| output.stderr.contains(m)) {
        return PullOutcome::DetachedHead;
    }

    PullOutcome::Unknown
}

/// Extracts the abbreviated revision from `git rev-parse --verify HEAD` output.
///
/// Returns `None` unless the output contains a 32+ character hex run, so a
/// malformed or truncated id reports as unknown instead of being shortened
/// into something that looks valid.
#[must_use]
pub fn short_revision(rev_parse_stdout: &str) -> Option<String> {
    let trimmed = rev_parse_stdout.trim();
    if !OBJECT_ID_RE.is_match(trimmed) {
        return None;
    }
    Some(trimmed.chars().take(SHORT_REVISION_LEN).collect::<String>().to_lowercase())
}
