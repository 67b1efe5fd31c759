//! Merge-and-replace reconciliation
//!
//! Combines a diameter/planarity table (base) with a contact-resistance
//! table (overlay) into one canonical grid. Alignment is positional: row i
//! of the overlay corresponds to row i of the base. That both tables
//! describe the same probe population in the same order is a precondition
//! on the caller, not something this module validates.
//!
//! Every sub-step is independently optional: an expected overlay column
//! that is absent is skipped silently, and the whole operation never fails.

use crate::core::grid::Grid;
use crate::core::table::{
    MeasurementTable, COL_PLANARITY, COL_V_ALIGN, COL_X_ERROR, COL_Y_ERROR, CONTACT_RESISTANCE,
    LEAKAGE,
};

/// Positional columns replaced wholesale from the overlay.
pub const REPLACE_COLUMNS: [&str; 3] = [COL_X_ERROR, COL_Y_ERROR, COL_V_ALIGN];

/// Reconcile two built tables. See [`merge_grids`].
pub fn merge_tables(base: &MeasurementTable, overlay: &MeasurementTable) -> Grid {
    merge_grids(&base.grid, &overlay.grid)
}

/// Reconcile two grids by column precedence:
///
/// 1. start from a copy of `base`;
/// 2. replace X Error / Y Error / V Align with the overlay's values
///    (adding the column when the base lacks it);
/// 3. replace-or-add the overlay column starting with `Contact Resistance`;
/// 4. always copy the overlay column containing `Leakage`;
/// 5. if the result has a `Planarity (µm)` column, move Contact Resistance
///    and then Leakage to sit immediately after it.
///
/// Overlay values pass through as given, with no re-typing or validation.
pub fn merge_grids(base: &Grid, overlay: &Grid) -> Grid {
    let mut merged = base.clone();

    for name in REPLACE_COLUMNS {
        if let Some(src) = overlay.column_index(name) {
            replace_or_push(&mut merged, name, &overlay.column_values(src));
        }
    }

    let contact_column = overlay
        .columns
        .iter()
        .find(|c| c.starts_with(CONTACT_RESISTANCE))
        .cloned();
    if let Some(ref name) = contact_column {
        if let Some(src) = overlay.column_index(name) {
            replace_or_push(&mut merged, name, &overlay.column_values(src));
        }
    }

    let leakage_column = overlay.columns.iter().find(|c| c.contains(LEAKAGE)).cloned();
    if let Some(ref name) = leakage_column {
        if let Some(src) = overlay.column_index(name) {
            replace_or_push(&mut merged, name, &overlay.column_values(src));
        }
    }

    if let Some(mut planarity_idx) = merged.column_index(COL_PLANARITY) {
        if let Some(idx) = contact_column.as_deref().and_then(|c| merged.column_index(c)) {
            if idx < planarity_idx {
                planarity_idx -= 1;
            }
            let name = merged.columns[idx].clone();
            let values = merged.remove_column(idx);
            merged.insert_column(planarity_idx + 1, name, &values);
            planarity_idx += 1;
        }
        if let Some(idx) = leakage_column.as_deref().and_then(|c| merged.column_index(c)) {
            if idx < planarity_idx {
                planarity_idx -= 1;
            }
            let name = merged.columns[idx].clone();
            let values = merged.remove_column(idx);
            merged.insert_column(planarity_idx + 1, name, &values);
        }
    }

    merged
}

fn replace_or_push(grid: &mut Grid, name: &str, values: &[String]) {
    match grid.column_index(name) {
        Some(idx) => grid.overwrite_column(idx, values),
        None => grid.push_column(name, values),
    }
}
