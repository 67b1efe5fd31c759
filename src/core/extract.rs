//! Measurement-block extraction
//!
//! A tester export is not a clean CSV: the measurement table is embedded
//! somewhere inside preamble text (recipe parameters, operator notes,
//! station banners). The table starts at the first line whose first cell is
//! exactly `Probe ID` and runs until the first blank line. Only that first
//! block is ever extracted; anything after the terminator is ignored even
//! if another header marker appears later.

use miette::Diagnostic;
use thiserror::Error;

use crate::core::decode::decode_bytes;
use crate::core::grid::Grid;
use crate::core::normalize::normalize_columns;

/// Exact first-cell marker that opens the measurement block.
pub const HEADER_MARKER: &str = "Probe ID";

#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    #[error("no 'Probe ID' header row found in `{0}`")]
    #[diagnostic(
        code(pct::extract::header_not_found),
        help("the file does not look like a probe-card export; check that the measurement section was included")
    )]
    HeaderNotFound(String),

    #[error("failed to parse measurement block in `{filename}`")]
    #[diagnostic(code(pct::extract::parse_failure))]
    ParseFailure {
        filename: String,
        #[source]
        source: csv::Error,
    },
}

/// Decode `bytes` tolerantly, locate the measurement block and parse it.
///
/// Headers are unit-normalized before the grid is returned, so downstream
/// column lookups always see the canonical `µm` spelling.
pub fn extract_table(bytes: &[u8], filename: &str) -> Result<Grid, ExtractError> {
    let decoded = decode_bytes(bytes);
    extract_from_text(&decoded.text, filename)
}

/// Same as [`extract_table`] for already-decoded text.
pub fn extract_from_text(text: &str, filename: &str) -> Result<Grid, ExtractError> {
    let lines = split_lines(text);
    let start = lines
        .iter()
        .position(|line| first_cell(line) == HEADER_MARKER)
        .ok_or_else(|| ExtractError::HeaderNotFound(filename.to_string()))?;

    let mut block = Vec::new();
    for line in &lines[start..] {
        if is_blank_row(line) {
            break;
        }
        block.push(*line);
    }

    parse_block(&block, filename)
}

/// First comma-delimited cell of a line, trimmed.
fn first_cell(line: &str) -> &str {
    line.trim().split(',').next().unwrap_or("").trim()
}

/// A row is blank if it is empty or every comma-split cell trims to empty.
fn is_blank_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.split(',').all(|cell| cell.trim().is_empty())
}

/// Split on universal newline boundaries: `\r\n`, `\n`, and bare `\r`.
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn parse_block(lines: &[&str], filename: &str) -> Result<Grid, ExtractError> {
    let joined = lines.join("\n");
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(joined.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| ExtractError::ParseFailure {
            filename: filename.to_string(),
            source: e,
        })?
        .clone();
    let mut columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    normalize_columns(&mut columns);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| ExtractError::ParseFailure {
            filename: filename.to_string(),
            source: e,
        })?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    Ok(Grid { columns, rows })
}
