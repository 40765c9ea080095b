//! Colored reports, the parallel-mode progress bar, and the run summary.

use crate::config::Config;
use crate::constants::PROGRESS_TICK_MS;
use crate::repo::{UpdateOutcome, UpdateResult};
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

pub fn print_search_start(root: &Path) {
    println!(
        "{} {}",
        "Searching for git repositories in".cyan(),
        root.display().to_string().white().bold()
    );
}

pub fn print_no_repos() {
    println!("{}", "No git repositories found".yellow().bold());
}

pub fn print_found(count: usize) {
    println!("{}", format!("Found {count} git repositories").dimmed());
}

/// Prints one repository's full audit trail with a status header.
pub fn print_result(result: &UpdateResult) {
    println!(
        "\n{} {} {}",
        status_label(&result.outcome),
        result.path.display().to_string().white().bold(),
        format_duration(result.duration).dimmed()
    );
    for line in &result.log {
        println!("  {}", line.dimmed());
    }
}

fn status_label(outcome: &UpdateOutcome) -> ColoredString {
    match outcome {
        UpdateOutcome::Updated { .. } | UpdateOutcome::UpToDate { .. } => "OK".green().bold(),
        UpdateOutcome::DetachedFetched => "BLOCKED".yellow().bold(),
        UpdateOutcome::SkippedByUser => "SKIP".yellow().bold(),
        UpdateOutcome::RecoveryFailed | UpdateOutcome::GaveUp | UpdateOutcome::Failed { .. } => {
            "FAIL".red().bold()
        }
    }
}

/// Progress bar shown while parallel workers churn through the workspace.
/// Hidden in verbose mode, where per-step output would fight the bar for the
/// terminal.
pub struct WorkspaceProgress {
    bar: ProgressBar,
}

#[must_use]
pub fn create_workspace_progress(total: usize, config: &Config) -> WorkspaceProgress {
    let bar = if config.verbose {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{bar:40.cyan/blue} {pos}/{len} repositories {msg}")
                .unwrap()
                .progress_chars("█░"),
        );
        bar.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
        bar
    };
    WorkspaceProgress { bar }
}

impl WorkspaceProgress {
    pub fn mark_completed(&self, result: &UpdateResult) {
        self.bar.inc(1);
        let name = result
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("repository");
        let symbol = if result.is_success() {
            "✓".green()
        } else {
            "✗".red()
        };
        self.bar.set_message(format!("{symbol} {name}"));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Final tally, printed after every repository has reported.
pub fn print_summary(results: &[UpdateResult], duration: Duration) {
    let updated = results
        .iter()
        .filter(|r| matches!(r.outcome, UpdateOutcome::Updated { .. }))
        .count();
    let up_to_date = results
        .iter()
        .filter(|r| matches!(r.outcome, UpdateOutcome::UpToDate { .. }))
        .count();
    let blocked = results
        .iter()
        .filter(|r| {
            matches!(
                r.outcome,
                UpdateOutcome::DetachedFetched | UpdateOutcome::SkippedByUser
            )
        })
        .count();
    let failed = results.len() - updated - up_to_date - blocked;

    println!();
    if updated > 0 {
        println!("{}", format!("  {updated} updated").green());
    }
    if up_to_date > 0 {
        println!("{}", format!("  {up_to_date} already up to date").green());
    }
    if blocked > 0 {
        println!("{}", format!("  {blocked} skipped or blocked").yellow());
    }
    if failed > 0 {
        println!("{}", format!("  {failed} failed").red().bold());
    }
    println!(
        "{} {} {}",
        "Completed updating".white().bold(),
        format!("{} repositories", results.len()).white().bold(),
        format!("in {}", format_duration(duration)).dimmed()
    );
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f32())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_duration_rounds_to_two_decimals() {
        assert_eq!(format_duration(Duration::from_millis(1234)), "1.23s");
        assert_eq!(format_duration(Duration::from_millis(5678)), "5.68s");
        assert_eq!(format_duration(Duration::from_secs(42)), "42.00s");
    }

    #[test]
    fn test_status_labels_cover_every_outcome() {
        let cases = [
            (
                UpdateOutcome::Updated {
                    revision: "a1b2c3d".into(),
                },
                "OK",
            ),
            (
                UpdateOutcome::UpToDate {
                    revision: "a1b2c3d".into(),
                },
                "OK",
            ),
            (UpdateOutcome::DetachedFetched, "BLOCKED"),
            (UpdateOutcome::SkippedByUser, "SKIP"),
            (UpdateOutcome::RecoveryFailed, "FAIL"),
            (UpdateOutcome::GaveUp, "FAIL"),
            (
                UpdateOutcome::Failed {
                    error: "boom".into(),
                },
                "FAIL",
            ),
        ];
        for (outcome, expected) in cases {
            let label = status_label(&outcome);
            assert!(
                label.to_string().contains(expected),
                "{outcome:?} should render as {expected}"
            );
        }
    }

    #[test]
    fn test_print_summary_smoke() {
        // Can't capture stdout easily; just ensure nothing panics on the
        // interesting shapes.
        let result = UpdateResult {
            path: PathBuf::from("/test/repo"),
            outcome: UpdateOutcome::Updated {
                revision: "a1b2c3d".into(),
            },
            log: vec!["Checking updates...".into()],
            duration: Duration::from_millis(500),
        };
        print_summary(std::slice::from_ref(&result), Duration::from_secs(1));
        print_summary(&[], Duration::from_secs(0));
    }
}
