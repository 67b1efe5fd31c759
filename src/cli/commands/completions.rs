//! `pct completions` command - emit a shell completion script
//!
//! Prints the script to stdout so it can be piped wherever the shell
//! expects it, e.g. `source <(pct completions bash)` in a profile or
//! `pct completions fish > ~/.config/fish/completions/pct.fish`.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "pct", &mut io::stdout());
    Ok(())
}
