//! Event handler for interactive front ends that accept dropped files.

use super::{BatchSummary, Processor, StatusLog};
use crate::config::MergeOptions;
use std::path::Path;

/// Runs the file pipeline for every batch of dropped paths and keeps the
/// status lines in an observable log.
#[derive(Debug, Clone)]
pub struct DropHandler {
    processor: Processor,
    log: StatusLog,
}

impl DropHandler {
    pub fn new(options: MergeOptions) -> Self {
        Self {
            processor: Processor::new(options),
            log: StatusLog::new(),
        }
    }

    /// Handle one drop event. Lines are appended to the log, never replaced.
    pub fn on_drop<P: AsRef<Path>>(&mut self, paths: &[P]) -> BatchSummary {
        self.processor.process_paths(paths, &mut self.log)
    }

    pub fn log(&self) -> &StatusLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut StatusLog {
        &mut self.log
    }
}
