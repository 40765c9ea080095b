//! Interactive confirmation for destructive recovery.
//!
//! Prompts are serialized through a global mutex so two parallel workers can
//! never interleave their questions on the terminal. One repository's prompt
//! blocking while another repository's fetch proceeds in the background is
//! fine; two prompts at once are not.

use dialoguer::Confirm;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

static PROMPT_LOCK: Mutex<()> = Mutex::new(());

/// Yes/no gate in front of destructive recovery.
pub trait Confirmer: Sync {
    fn confirm(&self, repo: &Path) -> bool;
}

/// Answers yes without prompting. Selected by `--yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoYes;

impl Confirmer for AutoYes {
    fn confirm(&self, _repo: &Path) -> bool {
        true
    }
}

/// Blocking terminal prompt. Empty input defaults to yes; unparseable input
/// re-prompts until a valid answer arrives.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractivePrompt;

impl Confirmer for InteractivePrompt {
    fn confirm(&self, repo: &Path) -> bool {
        let _guard = PROMPT_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        if io::stdin().is_terminal() {
            confirm_via_dialog(repo).unwrap_or(false)
        } else {
            let stdin = io::stdin();
            confirm_from(&mut stdin.lock(), &mut io::stderr(), repo).unwrap_or(false)
        }
    }
}

fn confirm_via_dialog(repo: &Path) -> dialoguer::Result<bool> {
    eprintln!("\nRepository: {}", repo.display());
    eprintln!("Would you like to overwrite your changes and set your local copy to the latest commit?");
    Confirm::new()
        .with_prompt("ALL of your local changes will be deleted")
        .default(true)
        .wait_for_newline(true)
        .interact()
}

/// Parses one answer line: empty means yes, `y`/`n` case-insensitive,
/// anything else means ask again.
#[must_use]
pub fn parse_answer(input: &str) -> Option<bool> {
    let answer = input.trim();
    if answer.is_empty() {
        return Some(true);
    }
    if answer.eq_ignore_ascii_case("y") {
        return Some(true);
    }
    if answer.eq_ignore_ascii_case("n") {
        return Some(false);
    }
    None
}

/// Line-based confirmation loop over arbitrary reader/writer pairs.
///
/// Loops until a parseable answer is read. EOF declines, since a closed
/// stream can never produce one.
pub fn confirm_from<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    repo: &Path,
) -> io::Result<bool> {
    writeln!(out, "\nRepository: {}", repo.display())?;
    writeln!(
        out,
        "Would you like to overwrite your changes and set your local copy to the latest commit?"
    )?;

    loop {
        write!(out, "ALL of your local changes will be deleted [Y/n]: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match parse_answer(&line) {
            Some(answer) => return Ok(answer),
            None => writeln!(out, "Did not understand your answer! Try again.")?,
        }
    }
}
