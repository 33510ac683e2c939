//! Collapse the single-row INSERT statements of SQL dump files into one
//! multi-row INSERT per file.
//!
//! ```
//! use sql_insert_merger::merger::StatementMerger;
//!
//! let sql = "INSERT INTO `t` (a,b) VALUES (1,2);\nINSERT INTO `t` (a,b) VALUES (3,4);\n";
//! let out = StatementMerger::new().merge(sql);
//! assert_eq!(out.statements, 2);
//! assert!(out.text.contains("INSERT INTO `t` (a,b) VALUES\n(1,2),\n(3,4);\n"));
//! ```

pub mod config;
pub mod decoder;
pub mod error;
pub mod merger;
pub mod parser;
pub mod processor;

pub use error::MergeError;
