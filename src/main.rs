use clap::Parser;
use gitdater::config::{Cli, Config};
use gitdater::prompt::{AutoYes, Confirmer, InteractivePrompt};
use gitdater::{git, output, repo};
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let config = Config::from(Cli::parse());

    // Environment check before any repository is touched; a missing git
    // binary aborts the whole run with exit code 1.
    git::check_git_installed()?;

    let root = std::path::absolute(&config.root).unwrap_or_else(|_| config.root.clone());
    output::print_search_start(&root);

    let repos = repo::find_git_repos(&config.root);
    if repos.is_empty() {
        output::print_no_repos();
        return Ok(());
    }
    output::print_found(repos.len());

    let confirmer: &dyn Confirmer = if config.assume_yes {
        &AutoYes
    } else {
        &InteractivePrompt
    };

    let started = Instant::now();
    let results = if config.parallel {
        let progress = output::create_workspace_progress(repos.len(), &config);
        let results = repo::update_all(&repos, &config, confirmer, |result| {
            progress.mark_completed(result);
        })?;
        progress.finish();
        // Completion order was arbitrary; report in discovery order.
        for result in &results {
            output::print_result(result);
        }
        results
    } else {
        repo::update_all(&repos, &config, confirmer, |result| {
            output::print_result(result);
        })?
    };

    output::print_summary(&results, started.elapsed());

    // Individual repository failures are reported above, not propagated as
    // process exit status.
    Ok(())
}
