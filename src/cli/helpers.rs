//! Shared helper functions for CLI commands

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand file and directory arguments into a flat list of input files.
///
/// Directories are walked recursively for `.csv` files (case-insensitive
/// extension); plain file arguments are passed through untouched so a user
/// can point at an export with any extension.
pub fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let is_csv = entry
                    .path()
                    .extension()
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
                if is_csv {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files
}

/// Filename component used as the session key for a path.
pub fn session_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// File stem used to derive output names.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}
