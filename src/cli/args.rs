//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    analyze::AnalyzeArgs, completions::CompletionsArgs, extract::ExtractArgs, merge::MergeArgs,
};

#[derive(Parser)]
#[command(name = "pct")]
#[command(author, version, about = "Probe Card Toolkit")]
#[command(
    long_about = "Probe Card Toolkit: extract the embedded measurement block from instrument CSV exports, evaluate specification rules, and merge diameter/planarity logs with contact-resistance logs."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (includes the full measurement table)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the measurement block from instrument exports
    Extract(ExtractArgs),

    /// Evaluate specification rules and rankings per file
    Analyze(AnalyzeArgs),

    /// Merge a contact-resistance log into a diameter/planarity log
    Merge(MergeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for extracted tables
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable markdown table
    Table,
    /// Comma-separated values
    Csv,
    /// JSON (typed records plus schema kind)
    Json,
}
