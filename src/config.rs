//! CLI definition and runtime configuration.

use crate::constants::DEFAULT_MAX_WORKERS;
use clap::Parser;
use std::path::PathBuf;

/// Update multiple git repositories at once.
#[derive(Parser, Debug)]
#[command(name = "gitdater", version, about = "Update multiple git repositories at once")]
pub struct Cli {
    /// Root directory to search for git repositories
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub directory: PathBuf,

    /// Update repositories in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Maximum number of parallel workers
    #[arg(short, long, default_value_t = DEFAULT_MAX_WORKERS, value_name = "N")]
    pub max_workers: usize,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Answer yes to all prompts
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Runtime configuration derived from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub parallel: bool,
    pub max_workers: usize,
    pub verbose: bool,
    pub assume_yes: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.directory,
            parallel: cli.parallel,
            // A zero-sized pool makes no sense; treat it as sequential.
            max_workers: cli.max_workers.max(1),
            verbose: cli.verbose,
            assume_yes: cli.yes,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            parallel: false,
            max_workers: DEFAULT_MAX_WORKERS,
            verbose: false,
            assume_yes: false,
        }
    }
}
