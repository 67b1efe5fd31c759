//! Table formatting for CLI output
//!
//! Renders grids and typed record subsets as markdown tables, and builds
//! column-selected grids for CSV export. Each report section shows only the
//! columns relevant to its rule, the way the instrument vendor's own report
//! sheets do.

use tabled::{builder::Builder, settings::Style};

use crate::core::grid::Grid;
use crate::core::table::{
    MeasurementRecord, COL_DIAMETER, COL_PLANARITY, COL_PROBE_ID, COL_PROBE_NAME, COL_V_ALIGN,
    COL_X_ERROR, COL_Y_ERROR,
};

/// A displayable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ProbeId,
    ProbeName,
    Diameter,
    Planarity,
    XError,
    YError,
    VAlign,
}

/// Columns for the X/Y positional-error section.
pub const XY_ERROR_FIELDS: [Field; 4] =
    [Field::ProbeId, Field::ProbeName, Field::XError, Field::YError];
/// Columns for the V-Align section.
pub const V_ALIGN_FIELDS: [Field; 3] = [Field::ProbeId, Field::ProbeName, Field::VAlign];
/// Columns for the diameter sections (violations and rankings).
pub const DIAMETER_FIELDS: [Field; 3] = [Field::ProbeId, Field::ProbeName, Field::Diameter];
/// Columns for the planarity sections.
pub const PLANARITY_FIELDS: [Field; 3] = [Field::ProbeId, Field::ProbeName, Field::Planarity];

impl Field {
    pub fn title(&self) -> &'static str {
        match self {
            Field::ProbeId => COL_PROBE_ID,
            Field::ProbeName => COL_PROBE_NAME,
            Field::Diameter => COL_DIAMETER,
            Field::Planarity => COL_PLANARITY,
            Field::XError => COL_X_ERROR,
            Field::YError => COL_Y_ERROR,
            Field::VAlign => COL_V_ALIGN,
        }
    }

    pub fn cell(&self, record: &MeasurementRecord) -> String {
        match self {
            Field::ProbeId => fmt_num(Some(record.probe_id)),
            Field::ProbeName => record.probe_name.clone().unwrap_or_default(),
            Field::Diameter => fmt_num(record.diameter),
            Field::Planarity => fmt_num(record.planarity),
            Field::XError => fmt_num(record.x_error),
            Field::YError => fmt_num(record.y_error),
            Field::VAlign => fmt_num(record.v_align),
        }
    }
}

fn fmt_num(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render a grid as a markdown table.
pub fn grid_table(grid: &Grid) -> String {
    let mut builder = Builder::default();
    builder.push_record(grid.columns.iter().cloned());
    for row in &grid.rows {
        builder.push_record(row.iter().cloned());
    }
    builder.build().with(Style::markdown()).to_string()
}

/// Render selected fields of typed records as a markdown table.
pub fn records_table(records: &[MeasurementRecord], fields: &[Field]) -> String {
    grid_table(&records_grid(records, fields))
}

/// Build a column-selected grid from typed records (used for CSV export).
pub fn records_grid(records: &[MeasurementRecord], fields: &[Field]) -> Grid {
    let mut grid = Grid::new(fields.iter().map(|f| f.title().to_string()).collect());
    for record in records {
        grid.rows
            .push(fields.iter().map(|f| f.cell(record)).collect());
    }
    grid
}
