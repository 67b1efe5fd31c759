//! Analysis module - specification rules, ranking and reconciliation

pub mod merge;
pub mod rank;
pub mod spec;

pub use merge::merge_tables;
pub use rank::{rank_diameters, DiameterRanking};
pub use spec::{evaluate, AnalysisResult, PlanarityMode, Thresholds};
