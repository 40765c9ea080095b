//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic numbers throughout the codebase.

/// Git directory name used to detect repositories.
pub const GIT_DIR: &str = ".git";

/// Default number of parallel workers when `--parallel` is set.
/// Higher than 1 CPU's worth because git operations are I/O-bound (network, disk).
pub const DEFAULT_MAX_WORKERS: usize = 5;

/// Maximum number of destructive recoveries (reset/clean) attempted for a
/// single repository before giving up. Bounds what would otherwise be an
/// unbounded retry-after-recovery cycle.
pub const MAX_RECOVERY_ATTEMPTS: usize = 2;

/// Length of the abbreviated revision shown in reports.
pub const SHORT_REVISION_LEN: usize = 7;

/// Placeholder shown when HEAD cannot be resolved to a well-formed object id.
pub const UNKNOWN_REVISION: &str = "-";

/// Progress bar tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;
