//! Collapses the INSERT statements of one document into a single multi-row
//! INSERT.
//!
//! The first statement decides the target table and column list. Every other
//! statement contributes its VALUES tuple in document order, whatever table it
//! named.

use crate::parser::{locate_statements, StatementMatch};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, warn};

/// Comment line written above the merged statement.
pub const DEFAULT_COMMENT: &str = "Merged INSERT statements";

static FK_CHECKS_ON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)SET FOREIGN_KEY_CHECKS\s*=\s*1\s*;").unwrap());

/// One multi-row INSERT built from a non-empty list of statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedStatement<'a> {
    table: &'a str,
    columns: &'a str,
    rows: Vec<&'a str>,
}

impl<'a> MergedStatement<'a> {
    /// Returns `None` when there is nothing to merge.
    pub fn from_matches(matches: &[StatementMatch<'a>]) -> Option<Self> {
        let first = matches.first()?;
        Some(Self {
            table: first.table,
            columns: first.columns.unwrap_or(""),
            rows: matches.iter().map(|m| m.values).collect(),
        })
    }

    pub fn table(&self) -> &'a str {
        self.table
    }

    pub fn columns(&self) -> &'a str {
        self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl fmt::Display for MergedStatement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "INSERT INTO `{}` {} VALUES", self.table, self.columns)?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(",\n")?;
            }
            write!(f, "({})", row)?;
        }
        f.write_str(";\n")
    }
}

/// Remove every match span from `text`, keeping all other bytes in order.
pub fn excise(text: &str, matches: &[StatementMatch<'_>]) -> String {
    let removed: usize = matches.iter().map(|m| m.end - m.start).sum();
    let mut out = String::with_capacity(text.len().saturating_sub(removed));
    let mut last_end = 0;
    for m in matches {
        out.push_str(&text[last_end..m.start]);
        last_end = m.end;
    }
    out.push_str(&text[last_end..]);
    out
}

/// Place `merged` before the first `SET FOREIGN_KEY_CHECKS = 1;`, or at the
/// end of `excised` when there is no such marker. Returns the new text and
/// whether the marker was found.
pub fn reinsert(excised: &str, merged: &str, comment: &str) -> (String, bool) {
    let header = format!("\n\n-- {}\n", comment);

    match FK_CHECKS_ON_RE.find(excised) {
        Some(marker) => {
            let before = excised[..marker.start()].trim_end();
            let after = &excised[marker.start()..];
            let mut out =
                String::with_capacity(before.len() + header.len() + merged.len() + 2 + after.len());
            out.push_str(before);
            out.push_str(&header);
            out.push_str(merged);
            out.push_str("\n\n");
            out.push_str(after);
            (out, true)
        }
        None => {
            let mut out = String::with_capacity(excised.len() + header.len() + merged.len());
            out.push_str(excised);
            out.push_str(&header);
            out.push_str(merged);
            (out, false)
        }
    }
}

/// Result of merging one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutput<'a> {
    /// Borrowed (the input itself) on passthrough.
    pub text: Cow<'a, str>,
    pub statements: usize,
    /// Table the merged statement targets.
    pub table: Option<&'a str>,
    /// Distinct tables other than `table` whose rows were folded in.
    pub foreign_tables: Vec<&'a str>,
    pub marker_found: bool,
}

impl MergeOutput<'_> {
    pub fn is_passthrough(&self) -> bool {
        self.statements == 0
    }
}

/// Merges the INSERT statements of a document.
#[derive(Debug, Clone)]
pub struct StatementMerger {
    comment: String,
}

impl Default for StatementMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementMerger {
    pub fn new() -> Self {
        Self {
            comment: DEFAULT_COMMENT.to_string(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn merge<'a>(&self, text: &'a str) -> MergeOutput<'a> {
        let matches = locate_statements(text);
        let Some(merged) = MergedStatement::from_matches(&matches) else {
            debug!("no INSERT statements found, passing through");
            return MergeOutput {
                text: Cow::Borrowed(text),
                statements: 0,
                table: None,
                foreign_tables: Vec::new(),
                marker_found: false,
            };
        };

        let foreign_tables = foreign_tables(merged.table(), &matches);
        if !foreign_tables.is_empty() {
            warn!(
                table = merged.table(),
                others = ?foreign_tables,
                "rows from other tables are merged into the first table's statement"
            );
        }

        let excised = excise(text, &matches);
        let (out, marker_found) = reinsert(&excised, &merged.to_string(), &self.comment);
        debug!(
            statements = matches.len(),
            table = merged.table(),
            marker_found,
            "merged INSERT statements"
        );

        MergeOutput {
            text: Cow::Owned(out),
            statements: matches.len(),
            table: Some(merged.table()),
            foreign_tables,
            marker_found,
        }
    }
}

fn foreign_tables<'a>(target: &str, matches: &[StatementMatch<'a>]) -> Vec<&'a str> {
    let mut seen: Vec<&'a str> = Vec::new();
    for m in matches {
        if m.table != target && !seen.contains(&m.table) {
            seen.push(m.table);
        }
    }
    seen
}
