//! PCT: Probe Card Toolkit
//!
//! A Unix-style toolkit for working with probe-card test-log exports:
//! extract the embedded measurement block from an instrument CSV, evaluate
//! dimensional and electrical specification rules, and reconcile a
//! diameter/planarity log with a contact-resistance log.

pub mod analysis;
pub mod cli;
pub mod core;
