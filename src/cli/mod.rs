//! CLI module
//!
//! Command-line interface for sampling review/metadata pairs.

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::{process_categories, RunSummary, Runner};
