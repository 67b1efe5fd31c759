//! Core module - extraction pipeline and fundamental types

pub mod decode;
pub mod extract;
pub mod grid;
pub mod normalize;
pub mod session;
pub mod table;

pub use decode::DecodedText;
pub use extract::{extract_table, ExtractError};
pub use grid::Grid;
pub use session::SessionStore;
pub use table::{MeasurementRecord, MeasurementTable, TableKind};
