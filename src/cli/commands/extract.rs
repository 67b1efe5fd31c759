//! `pct extract` command - pull the measurement block out of instrument exports

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::{collect_inputs, file_stem, session_key};
use crate::cli::table::grid_table;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::decode::decode_bytes;
use crate::core::extract::extract_from_text;
use crate::core::session::SessionStore;
use crate::core::table::MeasurementTable;

#[derive(clap::Args, Debug)]
pub struct ExtractArgs {
    /// CSV files or directories to extract
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Write each extracted table as a CSV file into this directory
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExtractArgs, global: &GlobalOpts) -> Result<()> {
    let files = collect_inputs(&args.inputs);
    if files.is_empty() {
        return Err(miette::miette!("no input files found"));
    }

    if let Some(ref dir) = args.output {
        fs::create_dir_all(dir).into_diagnostic()?;
    }

    let mut store = SessionStore::new();
    let mut failures = 0usize;

    for path in &files {
        let key = session_key(path);
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{} {}: {}", style("✗").red(), key, e);
                failures += 1;
                continue;
            }
        };
        let decoded = decode_bytes(&bytes);
        if global.verbose {
            eprintln!(
                "{} decoded {} as {}{}",
                style("•").dim(),
                key,
                decoded.encoding,
                if decoded.had_errors {
                    " (with replacements)"
                } else {
                    ""
                }
            );
        }
        let grid = match extract_from_text(&decoded.text, &key) {
            Ok(grid) => grid,
            Err(e) => {
                eprintln!("{} {}", style("✗").red(), e);
                failures += 1;
                continue;
            }
        };
        let table = MeasurementTable::build(grid);

        match args.format {
            OutputFormat::Table => {
                if !global.quiet {
                    println!(
                        "{} {} ({} record(s), {})",
                        style("File:").bold(),
                        style(&key).cyan(),
                        table.len(),
                        kind_label(&table)
                    );
                }
                println!("{}", grid_table(&table.grid));
            }
            OutputFormat::Csv => print!("{}", table.grid.to_csv()),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&table).into_diagnostic()?
                );
            }
        }

        if let Some(ref dir) = args.output {
            let out = dir.join(format!("{}_Filtered_ProbeID.csv", file_stem(path)));
            fs::write(&out, table.grid.to_csv()).into_diagnostic()?;
            if !global.quiet {
                println!("{} Wrote {}", style("✓").green(), out.display());
            }
        }

        store.insert_table(key, table);
    }

    if !global.quiet && store.len() > 1 {
        println!("\n{} file(s) extracted", store.len());
    }

    if failures == files.len() {
        return Err(miette::miette!("all {} input file(s) failed", failures));
    }
    Ok(())
}

fn kind_label(table: &MeasurementTable) -> &'static str {
    if table.kind.is_contact() {
        "contact-resistance"
    } else {
        "diameter/planarity"
    }
}
