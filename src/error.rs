//! Error types shared by the library.

use std::path::PathBuf;
use thiserror::Error;

/// Failures scoped to a single input path or to the run's configuration.
///
/// A file without INSERT statements is not an error; it produces a
/// passthrough copy instead.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Neither supported encoding decodes the file, or it could not be read.
    #[error("cannot read {}: {cause}", .path.display())]
    UnreadableFile { path: PathBuf, cause: String },

    /// Not an existing `.sql` file or directory.
    #[error("invalid path or unsupported file type: {}", .path.display())]
    InvalidPath { path: PathBuf },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {cause}", .path.display())]
    Config { path: PathBuf, cause: String },
}

pub type Result<T> = std::result::Result<T, MergeError>;
