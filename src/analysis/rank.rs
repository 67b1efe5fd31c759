//! Top-N diameter ranking

use serde::Serialize;

use crate::core::table::MeasurementRecord;

/// How many records each ranking returns at most.
pub const RANK_DEPTH: usize = 5;

/// Largest/smallest diameters, each at most [`RANK_DEPTH`] records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiameterRanking {
    /// Descending by diameter; ties keep original relative order.
    pub largest: Vec<MeasurementRecord>,
    /// Ascending by diameter; same tie rule.
    pub smallest: Vec<MeasurementRecord>,
}

/// Rank `records` by diameter. Records with a missing diameter cannot rank
/// and are excluded. With fewer than [`RANK_DEPTH`] candidates both lists
/// simply contain all of them; there is no padding and no error.
pub fn rank_diameters(records: &[MeasurementRecord]) -> DiameterRanking {
    let candidates: Vec<&MeasurementRecord> =
        records.iter().filter(|r| r.diameter.is_some()).collect();

    let mut descending = candidates.clone();
    descending.sort_by(|a, b| {
        b.diameter
            .partial_cmp(&a.diameter)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ascending = candidates;
    ascending.sort_by(|a, b| {
        a.diameter
            .partial_cmp(&b.diameter)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    DiameterRanking {
        largest: descending
            .into_iter()
            .take(RANK_DEPTH)
            .cloned()
            .collect(),
        smallest: ascending.into_iter().take(RANK_DEPTH).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(probe_id: f64, diameter: Option<f64>) -> MeasurementRecord {
        MeasurementRecord {
            probe_id,
            probe_name: None,
            diameter,
            planarity: None,
            x_error: None,
            y_error: None,
            v_align: None,
            contact_resistance: None,
            leakage: None,
        }
    }

    #[test]
    fn test_top_five_each_way() {
        let records: Vec<_> = (1..=7)
            .map(|i| record(i as f64, Some(10.0 + i as f64)))
            .collect();
        let ranking = rank_diameters(&records);
        let largest: Vec<f64> = ranking.largest.iter().map(|r| r.probe_id).collect();
        let smallest: Vec<f64> = ranking.smallest.iter().map(|r| r.probe_id).collect();
        assert_eq!(largest, vec![7.0, 6.0, 5.0, 4.0, 3.0]);
        assert_eq!(smallest, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_fewer_than_five_returns_all() {
        let records = vec![record(1.0, Some(20.0)), record(2.0, Some(19.0))];
        let ranking = rank_diameters(&records);
        assert_eq!(ranking.largest.len(), 2);
        assert_eq!(ranking.smallest.len(), 2);
    }

    #[test]
    fn test_ties_keep_original_order() {
        let records = vec![
            record(1.0, Some(20.0)),
            record(2.0, Some(20.0)),
            record(3.0, Some(20.0)),
        ];
        let ranking = rank_diameters(&records);
        let order: Vec<f64> = ranking.largest.iter().map(|r| r.probe_id).collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_missing_diameter_excluded() {
        let records = vec![record(1.0, None), record(2.0, Some(18.0))];
        let ranking = rank_diameters(&records);
        assert_eq!(ranking.largest.len(), 1);
        assert_eq!(ranking.largest[0].probe_id, 2.0);
    }
}
