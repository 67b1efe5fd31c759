//! `pct` subcommand implementations

pub mod analyze;
pub mod completions;
pub mod extract;
pub mod merge;
