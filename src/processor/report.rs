//! Status reporting seam for the per-file pipeline.

use super::FileOutcome;

/// Receives one outcome per processed input.
pub trait Reporter {
    fn report(&mut self, outcome: &FileOutcome);
}

/// Prints each status line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, outcome: &FileOutcome) {
        println!("{}", outcome.status_line());
    }
}

/// Collects status lines in memory, in the order they were reported.
#[derive(Debug, Default, Clone)]
pub struct StatusLog {
    lines: Vec<String>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Reporter for StatusLog {
    fn report(&mut self, outcome: &FileOutcome) {
        self.push(outcome.status_line());
    }
}
