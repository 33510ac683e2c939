//! INSERT statement locator.
//!
//! This is pattern matching, not SQL parsing: a statement is
//! `INSERT INTO [schema.]table [(columns)] VALUES (...);` and the VALUES
//! payload ends at the first `);` that follows it.

use once_cell::sync::Lazy;
use regex::{CaptureMatches, Captures, Regex};

static INSERT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?is)INSERT INTO\s+",
        r"(?:(?:`(?P<schema>[^`]+)`|(?P<schema_bare>\w+))\.)?",
        r"(?:`(?P<table>[^`]+)`|(?P<table_bare>\w+))\s*",
        r"(?P<columns>\([^;]+?\))?\s*VALUES\s*\((?P<values>.*?)\);",
    ))
    .unwrap()
});

/// One located INSERT statement, borrowing from the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementMatch<'a> {
    /// Byte offset of `INSERT`.
    pub start: usize,
    /// Byte offset just past the terminating `);`.
    pub end: usize,
    pub schema: Option<&'a str>,
    pub table: &'a str,
    /// Verbatim column list including its parentheses.
    pub columns: Option<&'a str>,
    /// Text between `VALUES (` and the first `);`.
    pub values: &'a str,
}

impl<'a> StatementMatch<'a> {
    fn from_captures(caps: &Captures<'a>) -> Option<Self> {
        let whole = caps.get(0)?;
        // Quoted identifiers win over bare words.
        let schema = caps
            .name("schema")
            .or_else(|| caps.name("schema_bare"))
            .map(|m| m.as_str());
        let table = caps.name("table").or_else(|| caps.name("table_bare"))?;

        Some(Self {
            start: whole.start(),
            end: whole.end(),
            schema,
            table: table.as_str(),
            columns: caps.name("columns").map(|m| m.as_str()),
            values: caps.name("values")?.as_str(),
        })
    }

    /// `schema.table` when schema-qualified, else just the table.
    pub fn qualified_name(&self) -> String {
        match self.schema {
            Some(schema) => format!("{}.{}", schema, self.table),
            None => self.table.to_string(),
        }
    }

    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Lazy, single-pass iterator over the INSERT statements of a text, in
/// document order. Matches never overlap.
pub struct StatementLocator<'a> {
    inner: CaptureMatches<'static, 'a>,
}

impl<'a> StatementLocator<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            inner: INSERT_RE.captures_iter(text),
        }
    }
}

impl<'a> Iterator for StatementLocator<'a> {
    type Item = StatementMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let caps = self.inner.next()?;
            if let Some(stmt) = StatementMatch::from_captures(&caps) {
                return Some(stmt);
            }
        }
    }
}

/// Collect every INSERT statement in `text`. An empty result means the text
/// has nothing to merge.
pub fn locate_statements(text: &str) -> Vec<StatementMatch<'_>> {
    StatementLocator::new(text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_backtick_table_with_columns() {
        let sql = "INSERT INTO `users` (`id`, `name`) VALUES (1, 'a');";
        let stmts = locate_statements(sql);
        assert_eq!(stmts.len(), 1);
        let s = &stmts[0];
        assert_eq!(s.table, "users");
        assert_eq!(s.schema, None);
        assert_eq!(s.columns, Some("(`id`, `name`)"));
        assert_eq!(s.values, "1, 'a'");
        assert_eq!(s.span(), 0..sql.len());
    }

    #[test]
    fn test_locate_bare_table_without_columns() {
        let stmts = locate_statements("insert into orders values (7,'x');");
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].table, "orders");
        assert_eq!(stmts[0].columns, None);
        assert_eq!(stmts[0].values, "7,'x'");
    }

    #[test]
    fn test_locate_schema_qualified() {
        let stmts =
            locate_statements("INSERT INTO `shop`.`items` VALUES (1);\nINSERT INTO app.logs VALUES (2);");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].schema, Some("shop"));
        assert_eq!(stmts[0].table, "items");
        assert_eq!(stmts[0].qualified_name(), "shop.items");
        assert_eq!(stmts[1].schema, Some("app"));
        assert_eq!(stmts[1].table, "logs");
    }

    #[test]
    fn test_locate_multiline_values() {
        let sql = "INSERT INTO `t` (a, b)\nVALUES\n(\n  1,\n  'two'\n);\n";
        let stmts = locate_statements(sql);
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].values, "\n  1,\n  'two'\n");
    }

    #[test]
    fn test_locate_stops_at_first_close_paren_semicolon() {
        // Known limitation: `);` inside a literal ends the statement early.
        let sql = "INSERT INTO t VALUES ('a);b');";
        let stmts = locate_statements(sql);
        assert_eq!(stmts.len(), 1);
        assert_eq!(stmts[0].values, "'a");
    }

    #[test]
    fn test_locate_preserves_document_order_and_offsets() {
        let sql = "-- head\nINSERT INTO t VALUES (1);\nSELECT 1;\nINSERT INTO t VALUES (2);\n";
        let stmts = locate_statements(sql);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].values, "1");
        assert_eq!(stmts[1].values, "2");
        assert!(stmts[0].end <= stmts[1].start);
        assert_eq!(&sql[stmts[0].span()], "INSERT INTO t VALUES (1);");
        assert_eq!(&sql[stmts[1].span()], "INSERT INTO t VALUES (2);");
    }

    #[test]
    fn test_locate_no_statements() {
        assert!(locate_statements("CREATE TABLE t (id INT);\nSELECT 1;").is_empty());
        assert!(locate_statements("").is_empty());
    }

    #[test]
    fn test_locator_is_lazy_iterator() {
        let sql = "INSERT INTO a VALUES (1);INSERT INTO b VALUES (2);INSERT INTO c VALUES (3);";
        let mut locator = StatementLocator::new(sql);
        assert_eq!(locator.next().map(|s| s.table), Some("a"));
        assert_eq!(locator.next().map(|s| s.table), Some("b"));
        assert_eq!(locator.next().map(|s| s.table), Some("c"));
        assert!(locator.next().is_none());
    }
}
