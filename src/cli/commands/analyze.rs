//! `pct analyze` command - evaluate specification rules per file
//!
//! One report per input file: diameter control limits, planarity (delta or
//! symmetric mode), X/Y positional error, V-Align, and the top-5 diameter
//! rankings. A file that fails extraction is reported and skipped; the rest
//! of the batch still runs.

use chrono::Local;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::spec::{
    evaluate, AnalysisResult, PlanarityMode, Thresholds, DEFAULT_LCL, DEFAULT_UCL,
    PLANARITY_BOUND, PLANARITY_DELTA_LIMIT, V_ALIGN_LIMIT, XY_ERROR_LIMIT,
};
use crate::cli::helpers::{collect_inputs, file_stem, session_key};
use crate::cli::table::{
    grid_table, records_grid, records_table, DIAMETER_FIELDS, PLANARITY_FIELDS, V_ALIGN_FIELDS,
    XY_ERROR_FIELDS,
};
use crate::cli::GlobalOpts;
use crate::core::extract::extract_table;
use crate::core::session::SessionStore;
use crate::core::table::MeasurementTable;

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// CSV files or directories to analyze
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Lower control limit for Diameter (µm)
    #[arg(long, default_value_t = DEFAULT_LCL)]
    pub lcl: f64,

    /// Upper control limit for Diameter (µm)
    #[arg(long, default_value_t = DEFAULT_UCL)]
    pub ucl: f64,

    /// Planarity specification mode
    #[arg(long, value_enum, default_value = "delta")]
    pub planarity: PlanarityArg,

    /// Emit results as a single JSON object keyed by filename
    #[arg(long)]
    pub json: bool,

    /// Write per-category CSV files into this directory
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// CLI surface of [`PlanarityMode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum PlanarityArg {
    /// max - min across all probes within 30 µm
    Delta,
    /// every probe within ±15 µm
    Pm15,
}

impl From<PlanarityArg> for PlanarityMode {
    fn from(arg: PlanarityArg) -> Self {
        match arg {
            PlanarityArg::Delta => PlanarityMode::Delta,
            PlanarityArg::Pm15 => PlanarityMode::SymmetricBound,
        }
    }
}

pub fn run(args: AnalyzeArgs, global: &GlobalOpts) -> Result<()> {
    let files = collect_inputs(&args.inputs);
    if files.is_empty() {
        return Err(miette::miette!("no input files found"));
    }

    let thresholds = Thresholds {
        lcl: args.lcl,
        ucl: args.ucl,
    };
    let mode: PlanarityMode = args.planarity.into();

    if let Some(ref dir) = args.output {
        fs::create_dir_all(dir).into_diagnostic()?;
    }

    let mut store = SessionStore::new();
    let mut failures = 0usize;

    for path in &files {
        let key = session_key(path);
        let table = match load_table(path, &key) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("{} {}", style("✗").red(), e);
                failures += 1;
                continue;
            }
        };
        let result = evaluate(&table, thresholds, mode);

        if !args.json {
            print_report(&key, &table, &result, global);
        }
        if let Some(ref dir) = args.output {
            let written = export_csvs(dir, &file_stem(path), &table, &result)?;
            if !global.quiet && !args.json {
                println!("{} Wrote {}", style("✓").green(), written.display());
            }
        }

        store.insert_table(key.clone(), table);
        store.insert_analysis(key, result);
    }

    if args.json {
        let mut map = serde_json::Map::new();
        for (name, analysis) in store.analyses() {
            map.insert(
                name.to_string(),
                serde_json::to_value(analysis).into_diagnostic()?,
            );
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::Object(map)).into_diagnostic()?
        );
    }

    if failures == files.len() {
        return Err(miette::miette!("all {} input file(s) failed", failures));
    }
    Ok(())
}

fn load_table(path: &Path, key: &str) -> Result<MeasurementTable> {
    let bytes = fs::read(path)
        .map_err(|e| miette::miette!("cannot read `{}`: {}", path.display(), e))?;
    let grid = extract_table(&bytes, key)?;
    Ok(MeasurementTable::build(grid))
}

fn print_report(
    key: &str,
    table: &MeasurementTable,
    result: &AnalysisResult,
    global: &GlobalOpts,
) {
    println!(
        "\n{} {} ({} record(s), {})",
        style("File:").bold(),
        style(key).cyan(),
        table.len(),
        if table.kind.is_contact() {
            "contact-resistance"
        } else {
            "diameter/planarity"
        }
    );

    if global.verbose {
        println!("{}", grid_table(&table.grid));
    }

    if !table.kind.is_contact() {
        print_diameter_section(result, global);
        print_planarity_section(result, global);
    }

    if !result.xy_error_out.is_empty() {
        println!(
            "{} X/Y error out of spec (±{} µm): {} probe(s)",
            style("✗").red(),
            XY_ERROR_LIMIT,
            result.xy_error_out.len()
        );
        println!("{}", records_table(&result.xy_error_out, &XY_ERROR_FIELDS));
    }

    if !result.v_align_out.is_empty() {
        println!(
            "{} V-Align out of spec (> +{} µm): {} probe(s)",
            style("✗").red(),
            V_ALIGN_LIMIT,
            result.v_align_out.len()
        );
        println!("{}", records_table(&result.v_align_out, &V_ALIGN_FIELDS));
    }
}

fn print_diameter_section(result: &AnalysisResult, global: &GlobalOpts) {
    let Thresholds { lcl, ucl } = result.thresholds;
    if result.diameter_out.is_empty() {
        println!(
            "{} Diameter: all pins within [{}, {}] µm",
            style("✓").green(),
            lcl,
            ucl
        );
    } else {
        println!(
            "{} Diameter: {} pin(s) out of range [{}, {}] µm",
            style("✗").red(),
            result.diameter_out.len(),
            lcl,
            ucl
        );
        println!("{}", records_table(&result.diameter_out, &DIAMETER_FIELDS));
    }

    if !global.quiet {
        println!("Top 5 largest diameters:");
        println!("{}", records_table(&result.ranking.largest, &DIAMETER_FIELDS));
        println!("Top 5 smallest diameters:");
        println!(
            "{}",
            records_table(&result.ranking.smallest, &DIAMETER_FIELDS)
        );
    }
}

fn print_planarity_section(result: &AnalysisResult, global: &GlobalOpts) {
    match result.planarity_mode {
        PlanarityMode::Delta => {
            if let Some(delta) = result.planarity_delta {
                if !global.quiet {
                    println!("Planarity delta = {:.2} µm", delta);
                }
                if result.planarity_out.is_empty() {
                    println!(
                        "{} Planarity within spec (delta ≤ {} µm)",
                        style("✓").green(),
                        PLANARITY_DELTA_LIMIT
                    );
                } else {
                    println!(
                        "{} Planarity exceeds spec (delta > {} µm)",
                        style("✗").red(),
                        PLANARITY_DELTA_LIMIT
                    );
                    println!(
                        "{}",
                        records_table(&result.planarity_out, &PLANARITY_FIELDS)
                    );
                }
            }
        }
        PlanarityMode::SymmetricBound => {
            if result.planarity_out.is_empty() {
                println!(
                    "{} Planarity within spec (all within ±{} µm)",
                    style("✓").green(),
                    PLANARITY_BOUND
                );
            } else {
                println!(
                    "{} Planarity out of spec (±{} µm): {} probe(s)",
                    style("✗").red(),
                    PLANARITY_BOUND,
                    result.planarity_out.len()
                );
                println!(
                    "{}",
                    records_table(&result.planarity_out, &PLANARITY_FIELDS)
                );
            }
        }
    }
}

/// Write one CSV per report category, mirroring the one-sheet-per-category
/// layout of the vendor's analysis workbook.
fn export_csvs(
    dir: &Path,
    stem: &str,
    table: &MeasurementTable,
    result: &AnalysisResult,
) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let out_dir = dir.join(format!("analyzed_{}_{}", stem, timestamp));
    fs::create_dir_all(&out_dir).into_diagnostic()?;

    fs::write(out_dir.join("All_Data.csv"), table.grid.to_csv()).into_diagnostic()?;
    fs::write(
        out_dir.join("XY_Error.csv"),
        records_grid(&result.xy_error_out, &XY_ERROR_FIELDS).to_csv(),
    )
    .into_diagnostic()?;
    fs::write(
        out_dir.join("V_Align_Out.csv"),
        records_grid(&result.v_align_out, &V_ALIGN_FIELDS).to_csv(),
    )
    .into_diagnostic()?;

    if !table.kind.is_contact() {
        fs::write(
            out_dir.join("Diameter_Out.csv"),
            records_grid(&result.diameter_out, &DIAMETER_FIELDS).to_csv(),
        )
        .into_diagnostic()?;
        fs::write(
            out_dir.join("Planarity_Out.csv"),
            records_grid(&result.planarity_out, &PLANARITY_FIELDS).to_csv(),
        )
        .into_diagnostic()?;
        fs::write(
            out_dir.join("Top_5_Max_Dia.csv"),
            records_grid(&result.ranking.largest, &DIAMETER_FIELDS).to_csv(),
        )
        .into_diagnostic()?;
        fs::write(
            out_dir.join("Top_5_Min_Dia.csv"),
            records_grid(&result.ranking.smallest, &DIAMETER_FIELDS).to_csv(),
        )
        .into_diagnostic()?;
    }

    Ok(out_dir)
}
