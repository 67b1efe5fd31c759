//! Filename-keyed session store
//!
//! The caller-owned accumulation point for a batch: built tables and their
//! evaluations, keyed by filename. Re-processing a file with the same name
//! overwrites the earlier entry in place (last write wins) without
//! disturbing the insertion order of the remaining entries. There is no
//! ambient global state anywhere in the crate; callers create, pass and
//! clear the store explicitly.

use crate::analysis::spec::AnalysisResult;
use crate::core::table::MeasurementTable;

#[derive(Debug, Default)]
pub struct SessionStore {
    tables: Vec<(String, MeasurementTable)>,
    analyses: Vec<(String, AnalysisResult)>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_table(&mut self, filename: impl Into<String>, table: MeasurementTable) {
        let filename = filename.into();
        match self.tables.iter_mut().find(|(name, _)| *name == filename) {
            Some(slot) => slot.1 = table,
            None => self.tables.push((filename, table)),
        }
    }

    pub fn insert_analysis(&mut self, filename: impl Into<String>, analysis: AnalysisResult) {
        let filename = filename.into();
        match self
            .analyses
            .iter_mut()
            .find(|(name, _)| *name == filename)
        {
            Some(slot) => slot.1 = analysis,
            None => self.analyses.push((filename, analysis)),
        }
    }

    pub fn table(&self, filename: &str) -> Option<&MeasurementTable> {
        self.tables
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, table)| table)
    }

    pub fn analysis(&self, filename: &str) -> Option<&AnalysisResult> {
        self.analyses
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, analysis)| analysis)
    }

    /// Tables in insertion order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &MeasurementTable)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    /// Analyses in insertion order.
    pub fn analyses(&self) -> impl Iterator<Item = (&str, &AnalysisResult)> {
        self.analyses
            .iter()
            .map(|(name, analysis)| (name.as_str(), analysis))
    }

    /// Drop one file's table and analysis. Unknown names are a no-op.
    pub fn remove(&mut self, filename: &str) {
        self.tables.retain(|(name, _)| name != filename);
        self.analyses.retain(|(name, _)| name != filename);
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.tables.clear();
        self.analyses.clear();
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Grid;
    use crate::core::table::COL_PROBE_ID;

    fn table(rows: &[&str]) -> MeasurementTable {
        MeasurementTable::build(Grid {
            columns: vec![COL_PROBE_ID.to_string()],
            rows: rows.iter().map(|r| vec![r.to_string()]).collect(),
        })
    }

    #[test]
    fn test_last_write_wins_keeps_position() {
        let mut store = SessionStore::new();
        store.insert_table("a.csv", table(&["1"]));
        store.insert_table("b.csv", table(&["2"]));
        store.insert_table("a.csv", table(&["3", "4"]));

        assert_eq!(store.len(), 2);
        let order: Vec<&str> = store.tables().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["a.csv", "b.csv"]);
        assert_eq!(store.table("a.csv").map(|t| t.len()), Some(2));
    }

    #[test]
    fn test_analysis_follows_its_table() {
        use crate::analysis::spec::{evaluate, PlanarityMode, Thresholds};

        let mut store = SessionStore::new();
        let t = table(&["1", "2"]);
        let result = evaluate(&t, Thresholds::default(), PlanarityMode::Delta);
        store.insert_table("a.csv", t);
        store.insert_analysis("a.csv", result);

        assert!(store.analysis("a.csv").is_some());
        store.remove("a.csv");
        assert!(store.analysis("a.csv").is_none());
        assert_eq!(store.analyses().count(), 0);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = SessionStore::new();
        store.insert_table("a.csv", table(&["1"]));
        store.insert_table("b.csv", table(&["2"]));

        store.remove("a.csv");
        assert!(store.table("a.csv").is_none());
        assert_eq!(store.len(), 1);

        store.remove("missing.csv");
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }
}
