//! `pct merge` command - reconcile a contact-resistance log into a
//! diameter/planarity log
//!
//! The two files must describe the same probe population in the same order;
//! alignment is by row position, not by Probe ID.

use chrono::Local;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::merge::merge_tables;
use crate::cli::helpers::session_key;
use crate::cli::GlobalOpts;
use crate::core::extract::extract_table;
use crate::core::table::MeasurementTable;

#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    /// Diameter/planarity file (base)
    pub base: PathBuf,

    /// Contact-resistance file (overlay)
    pub overlay: PathBuf,

    /// Output file or directory (default: merged CSV on stdout). A
    /// directory gets a timestamped `merged_output_*.csv` inside it.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: MergeArgs, global: &GlobalOpts) -> Result<()> {
    let base = load_table(&args.base)?;
    let overlay = load_table(&args.overlay)?;

    if global.verbose && base.len() != overlay.len() {
        eprintln!(
            "{} row counts differ ({} vs {}); merge is positional and will blank-fill",
            style("!").yellow(),
            base.len(),
            overlay.len()
        );
    }

    let merged = merge_tables(&base, &overlay);
    let csv = merged.to_csv();

    match args.output {
        Some(path) => {
            let out = if path.is_dir() {
                path.join(format!(
                    "merged_output_{}.csv",
                    Local::now().format("%Y%m%d_%H%M%S")
                ))
            } else {
                path
            };
            fs::write(&out, csv).into_diagnostic()?;
            if !global.quiet {
                println!(
                    "{} Merged {} + {} -> {} ({} record(s))",
                    style("✓").green(),
                    session_key(&args.base),
                    session_key(&args.overlay),
                    out.display(),
                    merged.len()
                );
            }
        }
        None => print!("{}", csv),
    }
    Ok(())
}

fn load_table(path: &Path) -> Result<MeasurementTable> {
    let bytes = fs::read(path)
        .map_err(|e| miette::miette!("cannot read `{}`: {}", path.display(), e))?;
    let grid = extract_table(&bytes, &session_key(path))?;
    Ok(MeasurementTable::build(grid))
}
