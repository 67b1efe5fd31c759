//! Typed measurement table built from an extracted grid
//!
//! The builder turns the untyped grid into sorted, typed records: numeric
//! coercion (a cell that fails to parse becomes missing, never an error),
//! silent filtering of rows without the required fields, the legacy label
//! rename, a stable ascending sort by Probe ID and the schema kind tag.
//! The silent-filter policy is deliberate: testers emit summary/footer rows
//! inside the block and those must disappear without failing the file.

use serde::Serialize;
use std::cmp::Ordering;

use crate::core::grid::Grid;

pub const COL_PROBE_ID: &str = "Probe ID";
pub const COL_PROBE_NAME: &str = "Probe name";
pub const COL_DIAMETER: &str = "Diameter (µm)";
pub const COL_PLANARITY: &str = "Planarity (µm)";
pub const COL_X_ERROR: &str = "X Error (µm)";
pub const COL_Y_ERROR: &str = "Y Error (µm)";
pub const COL_V_ALIGN: &str = "V Align (µm)";

/// Legacy exports carry the probe name in a generic user-label column.
pub const COL_LEGACY_LABEL: &str = "User Defined Label 4";

/// Substring that classifies a table as contact-resistance sourced.
pub const CONTACT_RESISTANCE: &str = "Contact Resistance";
/// Substring that locates the leakage column.
pub const LEAKAGE: &str = "Leakage";

/// Schema classification, computed once at build time.
///
/// Contact tables carry the matched column name so later stages never
/// repeat the substring search; when several columns match, the first in
/// header order wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TableKind {
    Contact { column: String },
    Diameter,
}

impl TableKind {
    pub fn is_contact(&self) -> bool {
        matches!(self, TableKind::Contact { .. })
    }
}

/// One probe's measurements. Everything but the ID is optional; a missing
/// value means the column was absent or the cell failed numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRecord {
    pub probe_id: f64,
    pub probe_name: Option<String>,
    pub diameter: Option<f64>,
    pub planarity: Option<f64>,
    pub x_error: Option<f64>,
    pub y_error: Option<f64>,
    pub v_align: Option<f64>,
    pub contact_resistance: Option<f64>,
    pub leakage: Option<f64>,
}

/// Sorted, typed measurement table.
///
/// `records` and `grid.rows` stay index-aligned: row i of the grid is the
/// original string form of record i. Invariants: every record has a finite
/// Probe ID and the sequence is non-decreasing by Probe ID with original
/// order preserved on ties.
#[derive(Debug, Clone, Serialize)]
pub struct MeasurementTable {
    pub kind: TableKind,
    pub grid: Grid,
    pub records: Vec<MeasurementRecord>,
}

impl MeasurementTable {
    /// Build a table from an extracted (normalized) grid.
    pub fn build(mut grid: Grid) -> Self {
        if let Some(idx) = grid.column_index(COL_LEGACY_LABEL) {
            grid.columns[idx] = COL_PROBE_NAME.to_string();
        }

        let kind = match grid.columns.iter().find(|c| c.contains(CONTACT_RESISTANCE)) {
            Some(column) => TableKind::Contact {
                column: column.clone(),
            },
            None => TableKind::Diameter,
        };

        let probe_id_idx = grid.column_index(COL_PROBE_ID);
        let name_idx = grid.column_index(COL_PROBE_NAME);
        let diameter_idx = grid.column_index(COL_DIAMETER);
        let planarity_idx = grid.column_index(COL_PLANARITY);
        let x_error_idx = grid.column_index(COL_X_ERROR);
        let y_error_idx = grid.column_index(COL_Y_ERROR);
        let v_align_idx = grid.column_index(COL_V_ALIGN);
        let contact_idx = match &kind {
            TableKind::Contact { column } => grid.column_index(column),
            TableKind::Diameter => None,
        };
        let leakage_idx = grid.columns.iter().position(|c| c.contains(LEAKAGE));

        let mut kept: Vec<(MeasurementRecord, Vec<String>)> = Vec::new();
        for row in &grid.rows {
            let Some(probe_id) = coerce(row, probe_id_idx) else {
                continue;
            };
            let contact_resistance = coerce(row, contact_idx);
            if kind.is_contact() && contact_resistance.is_none() {
                continue;
            }

            let record = MeasurementRecord {
                probe_id,
                probe_name: name_idx
                    .and_then(|i| row.get(i))
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                diameter: coerce(row, diameter_idx),
                planarity: coerce(row, planarity_idx),
                x_error: coerce(row, x_error_idx),
                y_error: coerce(row, y_error_idx),
                v_align: coerce(row, v_align_idx),
                contact_resistance,
                leakage: coerce(row, leakage_idx),
            };
            kept.push((record, row.clone()));
        }

        // sort_by is stable, so equal IDs keep their original order
        kept.sort_by(|a, b| {
            a.0.probe_id
                .partial_cmp(&b.0.probe_id)
                .unwrap_or(Ordering::Equal)
        });

        let (records, rows): (Vec<_>, Vec<_>) = kept.into_iter().unzip();
        Self {
            kind,
            grid: Grid {
                columns: grid.columns,
                rows,
            },
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Numeric coercion: missing column, unparsable cell and non-finite values
/// all collapse to `None`.
fn coerce(row: &[String], idx: Option<usize>) -> Option<f64> {
    idx.and_then(|i| row.get(i))
        .and_then(|cell| cell.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
