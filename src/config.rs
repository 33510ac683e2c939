//! Run options and the optional YAML config file.

use crate::error::{MergeError, Result};
use crate::merger::DEFAULT_COMMENT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Output folder used when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "merged_sql";

/// Appended to the file stem of every output file.
pub const DEFAULT_SUFFIX: &str = "_merged";

/// Options for processing a batch of files.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub output_dir: PathBuf,
    pub comment: String,
    pub suffix: String,
    pub dry_run: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            comment: DEFAULT_COMMENT.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
            dry_run: false,
        }
    }
}

impl MergeOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// YAML config file. Every field is optional; CLI flags take precedence.
///
/// ```yaml
/// output_dir: build/merged
/// comment: Collapsed rows
/// suffix: _bulk
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeYamlConfig {
    pub output_dir: Option<PathBuf>,
    pub comment: Option<String>,
    pub suffix: Option<String>,
}

impl MergeYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| MergeError::Config {
            path: path.to_path_buf(),
            cause: e.to_string(),
        })?;
        Self::from_yaml(&content).map_err(|cause| MergeError::Config {
            path: path.to_path_buf(),
            cause,
        })
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content).map_err(|e| e.to_string())
    }

    /// Overlay the values present in this file onto `options`.
    pub fn apply(&self, mut options: MergeOptions) -> MergeOptions {
        if let Some(dir) = &self.output_dir {
            options.output_dir = dir.clone();
        }
        if let Some(comment) = &self.comment {
            options.comment = comment.clone();
        }
        if let Some(suffix) = &self.suffix {
            options.suffix = suffix.clone();
        }
        options
    }
}
