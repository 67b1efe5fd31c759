//! Ordered string table with column-level operations
//!
//! A `Grid` is the untyped shape shared by the extracted measurement block
//! and the merged output: a header row plus data rows, all strings. Column
//! operations preserve row alignment, and CSV serialization preserves the
//! final column order byte-for-byte.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Grid {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom. Short rows yield empty cells.
    pub fn column_values(&self, idx: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect()
    }

    /// Positionally overwrite a column. If `values` is shorter than the
    /// grid the remaining cells become empty; excess values are ignored.
    pub fn overwrite_column(&mut self, idx: usize, values: &[String]) {
        for (i, row) in self.rows.iter_mut().enumerate() {
            if let Some(cell) = row.get_mut(idx) {
                *cell = values.get(i).cloned().unwrap_or_default();
            }
        }
    }

    /// Append a new column at the right edge.
    pub fn push_column(&mut self, name: impl Into<String>, values: &[String]) {
        self.columns.push(name.into());
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.push(values.get(i).cloned().unwrap_or_default());
        }
    }

    /// Remove a column, returning its values.
    pub fn remove_column(&mut self, idx: usize) -> Vec<String> {
        self.columns.remove(idx);
        self.rows
            .iter_mut()
            .map(|row| {
                if idx < row.len() {
                    row.remove(idx)
                } else {
                    String::new()
                }
            })
            .collect()
    }

    /// Insert a column at `idx` (clamped to the current width).
    pub fn insert_column(&mut self, idx: usize, name: impl Into<String>, values: &[String]) {
        let idx = idx.min(self.columns.len());
        self.columns.insert(idx, name.into());
        for (i, row) in self.rows.iter_mut().enumerate() {
            let at = idx.min(row.len());
            row.insert(at, values.get(i).cloned().unwrap_or_default());
        }
    }

    /// Serialize as comma-separated text: header row first, one line per
    /// record, RFC 4180 quoting for cells containing commas, quotes or
    /// newlines.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_csv_line(&mut out, &self.columns);
        for row in &self.rows {
            push_csv_line(&mut out, row);
        }
        out
    }
}

fn push_csv_line(out: &mut String, cells: &[String]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_csv(cell));
    }
    out.push('\n');
}

/// Escape a string for CSV output per RFC 4180.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
