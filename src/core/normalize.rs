//! Unit-label canonicalization
//!
//! Instrument exports spell the micrometre unit three different ways
//! depending on the codepage the tester was running under: the correct
//! "µm", the ASCII fallback "um", and "ตm" (the micro sign decoded through
//! a legacy Thai codepage). Headers are canonicalized to "µm" exactly once,
//! before any field is looked up by name.

/// The canonical micrometre unit symbol.
pub const MICROMETRE: &str = "µm";

/// Replace every occurrence of the garbled unit tokens with `µm`.
///
/// Idempotent: "µm" contains neither token, so a second pass is a no-op.
pub fn normalize_unit_label(name: &str) -> String {
    name.replace("ตm", MICROMETRE).replace("um", MICROMETRE)
}

/// Normalize every header name in place.
pub fn normalize_columns(columns: &mut [String]) {
    for column in columns.iter_mut() {
        *column = normalize_unit_label(column);
    }
}
