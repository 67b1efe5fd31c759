//! Specification rule evaluation
//!
//! A pure function of (table, thresholds, planarity mode): nothing here
//! mutates the input table, and every flagged subset is a cloned snapshot.
//! Re-evaluating with different thresholds produces a new result; it never
//! touches an old one. Missing values never satisfy a rule.

use serde::Serialize;

use crate::analysis::rank::{rank_diameters, DiameterRanking};
use crate::core::table::{MeasurementRecord, MeasurementTable, TableKind};

/// Absolute positional-error limit for X/Y (µm).
pub const XY_ERROR_LIMIT: f64 = 15.0;
/// One-sided vertical-alignment limit (µm); negative values never flag.
pub const V_ALIGN_LIMIT: f64 = 15.0;
/// Delta-mode planarity spread limit (µm), boundary inclusive.
pub const PLANARITY_DELTA_LIMIT: f64 = 30.0;
/// Symmetric-mode per-probe planarity bound (µm).
pub const PLANARITY_BOUND: f64 = 15.0;

pub const DEFAULT_LCL: f64 = 14.0;
pub const DEFAULT_UCL: f64 = 24.0;

/// Diameter control limits. The pair is taken as given: an inverted pair
/// (LCL above UCL) is accepted and simply flags every record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub lcl: f64,
    pub ucl: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            lcl: DEFAULT_LCL,
            ucl: DEFAULT_UCL,
        }
    }
}

/// Which planarity specification applies. Exactly one per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanarityMode {
    /// max(Planarity) - min(Planarity) must stay within 30 µm; when it does
    /// not, every record sitting at the observed max or min is flagged.
    Delta,
    /// Per-probe symmetric bound: |Planarity| within 15 µm.
    SymmetricBound,
}

/// Immutable snapshot of one evaluation: the sorted records, the violation
/// subsets, the rankings, and the parameters that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub kind: TableKind,
    pub records: Vec<MeasurementRecord>,
    pub xy_error_out: Vec<MeasurementRecord>,
    pub v_align_out: Vec<MeasurementRecord>,
    pub diameter_out: Vec<MeasurementRecord>,
    pub planarity_out: Vec<MeasurementRecord>,
    pub ranking: DiameterRanking,
    pub thresholds: Thresholds,
    pub planarity_mode: PlanarityMode,
    /// Observed max-minus-min planarity spread (Delta mode, when any
    /// planarity value exists).
    pub planarity_delta: Option<f64>,
}

/// Apply every applicable rule subset to `table`.
pub fn evaluate(
    table: &MeasurementTable,
    thresholds: Thresholds,
    planarity_mode: PlanarityMode,
) -> AnalysisResult {
    let records = &table.records;

    let xy_error_out: Vec<_> = records
        .iter()
        .filter(|r| {
            exceeds_abs(r.x_error, XY_ERROR_LIMIT) || exceeds_abs(r.y_error, XY_ERROR_LIMIT)
        })
        .cloned()
        .collect();

    let v_align_out: Vec<_> = records
        .iter()
        .filter(|r| matches!(r.v_align, Some(v) if v > V_ALIGN_LIMIT))
        .cloned()
        .collect();

    let diameter_out: Vec<_> = if table.kind.is_contact() {
        Vec::new()
    } else {
        records
            .iter()
            .filter(
                |r| matches!(r.diameter, Some(d) if d < thresholds.lcl || d > thresholds.ucl),
            )
            .cloned()
            .collect()
    };

    let (planarity_out, planarity_delta) = if table.kind.is_contact() {
        (Vec::new(), None)
    } else {
        match planarity_mode {
            PlanarityMode::Delta => planarity_delta_subset(records),
            PlanarityMode::SymmetricBound => (
                records
                    .iter()
                    .filter(
                        |r| matches!(r.planarity, Some(p) if p > PLANARITY_BOUND || p < -PLANARITY_BOUND),
                    )
                    .cloned()
                    .collect(),
                None,
            ),
        }
    };

    let ranking = if table.kind.is_contact() {
        DiameterRanking::default()
    } else {
        rank_diameters(records)
    };

    AnalysisResult {
        kind: table.kind.clone(),
        records: records.clone(),
        xy_error_out,
        v_align_out,
        diameter_out,
        planarity_out,
        ranking,
        thresholds,
        planarity_mode,
        planarity_delta,
    }
}

fn exceeds_abs(value: Option<f64>, limit: f64) -> bool {
    matches!(value, Some(v) if v.abs() > limit)
}

/// Delta mode: flag the records at the observed extremes, but only when
/// the spread exceeds the limit. The boundary is inclusive (a spread of
/// exactly 30 µm is in spec) and ties at either extreme all flag.
fn planarity_delta_subset(
    records: &[MeasurementRecord],
) -> (Vec<MeasurementRecord>, Option<f64>) {
    let values: Vec<f64> = records.iter().filter_map(|r| r.planarity).collect();
    if values.is_empty() {
        return (Vec::new(), None);
    }
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let delta = max - min;
    if delta <= PLANARITY_DELTA_LIMIT {
        return (Vec::new(), Some(delta));
    }
    let flagged = records
        .iter()
        .filter(|r| matches!(r.planarity, Some(p) if p == max || p == min))
        .cloned()
        .collect();
    (flagged, Some(delta))
}
