//! Glob pattern expansion for CLI input paths.
//!
//! Expands arguments like `dumps/*.sql` into the matching `.sql` files. Plain
//! paths are passed through untouched so the pipeline can classify them.

use crate::processor::is_sql_file;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Check if a path string contains glob pattern characters.
pub fn is_glob_pattern(path: &str) -> bool {
    path.contains('*') || path.contains('?') || path.contains('[')
}

/// Expand one argument into the paths it stands for.
///
/// An existing path is always taken literally, even when its name contains
/// glob characters. A malformed pattern, or one without matches, expands to
/// itself; the pipeline then reports it as an invalid path and the rest of
/// the batch still runs.
pub fn expand_file_pattern(pattern: &Path) -> Vec<PathBuf> {
    let pattern_str = pattern.to_string_lossy();

    if pattern.exists() || !is_glob_pattern(&pattern_str) {
        return vec![pattern.to_path_buf()];
    }

    let entries = match glob::glob(&pattern_str) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(pattern = %pattern_str, error = %e, "invalid glob pattern");
            return vec![pattern.to_path_buf()];
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|path| path.is_file() && is_sql_file(path))
        .collect();

    if files.is_empty() {
        return vec![pattern.to_path_buf()];
    }

    files.sort();
    files
}

/// Expand every CLI argument, preserving argument order.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    inputs
        .iter()
        .flat_map(|input| expand_file_pattern(input))
        .collect()
}
