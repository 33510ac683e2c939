use super::glob_util::expand_inputs;
use crate::config::{MergeOptions, MergeYamlConfig};
use crate::decoder::SourceEncoding;
use crate::processor::{
    BatchSummary, ConsoleReporter, FileOutcome, FileStatus, Processor, Reporter,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// JSON output for a merge run
#[derive(Serialize)]
struct MergeJsonOutput {
    output_dir: String,
    dry_run: bool,
    statistics: MergeStatistics,
    files: Vec<FileJsonResult>,
}

#[derive(Serialize)]
struct MergeStatistics {
    total_files: usize,
    merged: usize,
    passthrough: usize,
    skipped: usize,
    statements_merged: usize,
    bytes_written: u64,
    elapsed_secs: f64,
}

#[derive(Serialize)]
struct FileJsonResult {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    status: FileStatus,
    statements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    foreign_tables: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    encoding: Option<SourceEncoding>,
    bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&FileOutcome> for FileJsonResult {
    fn from(outcome: &FileOutcome) -> Self {
        Self {
            file: outcome.input.display().to_string(),
            output: outcome.output.as_ref().map(|p| p.display().to_string()),
            status: outcome.status,
            statements: outcome.statements,
            table: outcome.table.clone(),
            foreign_tables: outcome.foreign_tables.clone(),
            encoding: outcome.encoding,
            bytes: outcome.bytes,
            error: outcome.error.clone(),
        }
    }
}

/// Swallows status lines; the JSON document carries them instead.
struct QuietReporter;

impl Reporter for QuietReporter {
    fn report(&mut self, _outcome: &FileOutcome) {}
}

/// Prints status lines above a spinner counting processed files.
struct ProgressReporter {
    pb: ProgressBar,
}

impl Reporter for ProgressReporter {
    fn report(&mut self, outcome: &FileOutcome) {
        self.pb.println(outcome.status_line());
        self.pb.set_message(outcome.input.display().to_string());
        self.pb.inc(1);
    }
}

pub fn run(
    paths: Vec<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    comment: Option<String>,
    dry_run: bool,
    json: bool,
    progress: bool,
) -> anyhow::Result<()> {
    let mut options = MergeOptions::default();
    if let Some(ref config_path) = config {
        options = MergeYamlConfig::load(config_path)?.apply(options);
    }
    if let Some(dir) = output {
        options = options.with_output_dir(dir);
    }
    if let Some(comment) = comment {
        options = options.with_comment(comment);
    }
    options = options.with_dry_run(dry_run);

    let inputs = expand_inputs(&paths);

    if !json {
        if dry_run {
            println!("Dry run: merging INSERT statements from {} input(s)", inputs.len());
        } else {
            println!("Merging INSERT statements from {} input(s)", inputs.len());
            println!("Output directory: {}", options.output_dir.display());
        }
        println!();
    }

    let processor = Processor::new(options);
    let start_time = Instant::now();

    let summary = if json {
        processor.process_paths(&inputs, &mut QuietReporter)
    } else if progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} files {msg}")?
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        let mut reporter = ProgressReporter { pb };
        let summary = processor.process_paths(&inputs, &mut reporter);
        reporter.pb.finish_and_clear();
        summary
    } else {
        processor.process_paths(&inputs, &mut ConsoleReporter)
    };

    let elapsed = start_time.elapsed();

    if json {
        print_json(&processor, &summary, elapsed.as_secs_f64())?;
    } else {
        print_summary(&summary, dry_run, elapsed);
    }

    Ok(())
}

fn print_json(processor: &Processor, summary: &BatchSummary, elapsed_secs: f64) -> anyhow::Result<()> {
    let options = processor.options();
    let written = summary
        .outcomes
        .iter()
        .filter(|o| o.status != FileStatus::Skipped && !o.dry_run);

    let output_json = MergeJsonOutput {
        output_dir: options.output_dir.display().to_string(),
        dry_run: options.dry_run,
        statistics: MergeStatistics {
            total_files: summary.total(),
            merged: summary.merged,
            passthrough: summary.passthrough,
            skipped: summary.skipped,
            statements_merged: summary.outcomes.iter().map(|o| o.statements).sum(),
            bytes_written: written.map(|o| o.bytes).sum(),
            elapsed_secs,
        },
        files: summary.outcomes.iter().map(FileJsonResult::from).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output_json)?);
    Ok(())
}

fn print_summary(summary: &BatchSummary, dry_run: bool, elapsed: Duration) {
    if dry_run {
        println!("\n✓ Dry run completed! No files written.");
    } else {
        println!("\n✓ Merge completed!");
    }

    println!("\nStatistics:");
    println!("  Files processed: {}", summary.total());
    println!("  Merged: {}", summary.merged);
    println!("  Unchanged: {}", summary.passthrough);
    println!("  Skipped: {}", summary.skipped);
    println!("  Elapsed time: {:.3?}", elapsed);

    if summary.has_skips() {
        println!("\nSkipped inputs:");
        for outcome in summary
            .outcomes
            .iter()
            .filter(|o| o.status == FileStatus::Skipped)
        {
            println!(
                "  - {}: {}",
                outcome.input.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
