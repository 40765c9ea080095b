//! Multi-repository git updater library.
//!
//! This crate provides functionality to update git repositories by:
//! - Discovering repository roots under a directory tree
//! - Pulling each repository (fetch + ff-only merge when HEAD is detached)
//! - Classifying git's text output into a recoverable/unrecoverable outcome
//! - Offering destructive recovery (reset/clean) with user confirmation
//!
//! Git is driven exclusively as a subprocess; all outcome classification is
//! substring/regex matching against its output, which is inherently fragile
//! across git versions and locales. That fragility is documented rather than
//! engineered around, because the CLI offers no structured alternative.

pub mod classify;
pub mod config;
pub mod constants;
pub mod git;
pub mod output;
pub mod prompt;
pub mod repo;
