//! File-level pipeline: read, decode, merge, write.
//!
//! Every failure is scoped to one file. A batch always runs to the end and
//! reports one [`FileOutcome`] per input.

mod frontend;
mod report;

// Library API; the binary has no front end.
#[allow(unused_imports)]
pub use frontend::DropHandler;
pub use report::{ConsoleReporter, Reporter, StatusLog};

use crate::config::MergeOptions;
use crate::decoder::{self, SourceEncoding};
use crate::error::{MergeError, Result};
use crate::merger::StatementMerger;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What happened to one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Merged,
    Passthrough,
    Skipped,
}

/// Result of processing one input path.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub status: FileStatus,
    pub statements: usize,
    pub table: Option<String>,
    pub foreign_tables: Vec<String>,
    pub encoding: Option<SourceEncoding>,
    /// Size of the output text; nothing is written on a dry run.
    pub bytes: u64,
    pub dry_run: bool,
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn skipped(input: PathBuf, error: &MergeError) -> Self {
        Self {
            input,
            output: None,
            status: FileStatus::Skipped,
            statements: 0,
            table: None,
            foreign_tables: Vec::new(),
            encoding: None,
            bytes: 0,
            dry_run: false,
            error: Some(error.to_string()),
        }
    }

    /// One human-readable line describing this outcome.
    pub fn status_line(&self) -> String {
        let prefix = if self.dry_run { "[dry run] " } else { "" };
        let output = self
            .output
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        match self.status {
            FileStatus::Merged => {
                let mut line = format!(
                    "{}✓ Merged {} INSERT statements into `{}`: {} → {}",
                    prefix,
                    self.statements,
                    self.table.as_deref().unwrap_or_default(),
                    self.input.display(),
                    output
                );
                if !self.foreign_tables.is_empty() {
                    line.push_str(&format!(
                        " (rows from {} also merged)",
                        self.foreign_tables.join(", ")
                    ));
                }
                line
            }
            FileStatus::Passthrough => format!(
                "{}- No INSERT statements, copied unchanged: {} → {}",
                prefix,
                self.input.display(),
                output
            ),
            FileStatus::Skipped => format!(
                "✗ Skipped {}: {}",
                self.input.display(),
                self.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

/// Totals for a batch of inputs.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub merged: usize,
    pub passthrough: usize,
    pub skipped: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome.status {
            FileStatus::Merged => self.merged += 1,
            FileStatus::Passthrough => self.passthrough += 1,
            FileStatus::Skipped => self.skipped += 1,
        }
        self.outcomes.push(outcome);
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn has_skips(&self) -> bool {
        self.skipped > 0
    }
}

/// Whether the file name ends in `.sql`, ignoring case.
pub fn is_sql_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".sql"))
        .unwrap_or(false)
}

/// `dump.sql` → `dump_merged.sql` for the default suffix. Names without a
/// `.sql` ending get `<suffix>.sql` appended.
pub fn output_file_name(file_name: &str, suffix: &str) -> String {
    let stem = file_name
        .len()
        .checked_sub(4)
        .and_then(|split| {
            let ext = file_name.get(split..)?;
            ext.eq_ignore_ascii_case(".sql").then(|| &file_name[..split])
        })
        .unwrap_or(file_name);
    format!("{}{}.sql", stem, suffix)
}

/// Resolve an input path to the `.sql` files it names.
///
/// A `.sql` file names itself. A directory names its direct `.sql` children,
/// sorted by file name; subdirectories are ignored.
pub fn collect_sql_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if is_sql_file(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        return Err(MergeError::InvalidPath {
            path: path.to_path_buf(),
        });
    }

    if !path.is_dir() {
        return Err(MergeError::InvalidPath {
            path: path.to_path_buf(),
        });
    }

    let unreadable = |e: std::io::Error| MergeError::UnreadableFile {
        path: path.to_path_buf(),
        cause: e.to_string(),
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(unreadable)? {
        let entry_path = entry.map_err(unreadable)?.path();
        if entry_path.is_file() && is_sql_file(&entry_path) {
            files.push(entry_path);
        }
    }
    files.sort();
    Ok(files)
}

/// Runs the per-file pipeline with fixed options.
#[derive(Debug, Clone)]
pub struct Processor {
    options: MergeOptions,
    merger: StatementMerger,
}

impl Processor {
    pub fn new(options: MergeOptions) -> Self {
        let merger = StatementMerger::new().with_comment(options.comment.clone());
        Self { options, merger }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    pub fn output_path(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.options
            .output_dir
            .join(output_file_name(&name, &self.options.suffix))
    }

    /// Merge one file and write the result. Errors mean the file was skipped.
    pub fn merge_file(&self, path: &Path) -> Result<FileOutcome> {
        let unreadable = |cause: String| MergeError::UnreadableFile {
            path: path.to_path_buf(),
            cause,
        };

        let bytes = fs::read(path).map_err(|e| unreadable(e.to_string()))?;
        let doc = decoder::decode(bytes).map_err(|e| unreadable(e.to_string()))?;
        debug!(path = %path.display(), encoding = %doc.encoding(), "decoded input");

        let merged = self.merger.merge(doc.text());
        let output_path = self.output_path(path);

        if !self.options.dry_run {
            self.write_output(&output_path, &merged.text)?;
        }

        Ok(FileOutcome {
            input: path.to_path_buf(),
            output: Some(output_path),
            status: if merged.is_passthrough() {
                FileStatus::Passthrough
            } else {
                FileStatus::Merged
            },
            statements: merged.statements,
            table: merged.table.map(str::to_string),
            foreign_tables: merged.foreign_tables.iter().map(|t| t.to_string()).collect(),
            encoding: Some(doc.encoding()),
            bytes: merged.text.len() as u64,
            dry_run: self.options.dry_run,
            error: None,
        })
    }

    pub fn process_file(&self, path: &Path) -> FileOutcome {
        self.merge_file(path)
            .unwrap_or_else(|e| FileOutcome::skipped(path.to_path_buf(), &e))
    }

    /// Process one input path (file or directory), reporting every outcome.
    pub fn process_path<R: Reporter + ?Sized>(
        &self,
        path: &Path,
        reporter: &mut R,
        summary: &mut BatchSummary,
    ) {
        let files = match collect_sql_files(path) {
            Ok(files) => files,
            Err(e) => {
                let outcome = FileOutcome::skipped(path.to_path_buf(), &e);
                reporter.report(&outcome);
                summary.record(outcome);
                return;
            }
        };

        debug!(path = %path.display(), files = files.len(), "collected inputs");
        for file in files {
            let outcome = self.process_file(&file);
            reporter.report(&outcome);
            summary.record(outcome);
        }
    }

    pub fn process_paths<P, R>(&self, paths: &[P], reporter: &mut R) -> BatchSummary
    where
        P: AsRef<Path>,
        R: Reporter + ?Sized,
    {
        let mut summary = BatchSummary::new();
        for path in paths {
            self.process_path(path.as_ref(), reporter, &mut summary);
        }
        summary
    }

    fn write_output(&self, output_path: &Path, text: &str) -> Result<()> {
        fs::create_dir_all(&self.options.output_dir).map_err(|source| MergeError::Write {
            path: self.options.output_dir.clone(),
            source,
        })?;
        fs::write(output_path, text).map_err(|source| MergeError::Write {
            path: output_path.to_path_buf(),
            source,
        })
    }
}
