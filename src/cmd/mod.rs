mod glob_util;
mod merge;

use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sql-insert-merger")]
#[command(version)]
#[command(
    about = "Collapse single-row INSERT statements in SQL dump files into one multi-row INSERT",
    long_about = None
)]
pub struct Cli {
    /// SQL file, directory of .sql files, or glob pattern (e.g., dumps/*.sql)
    #[arg(required_unless_present = "completions")]
    pub paths: Vec<PathBuf>,

    /// Output directory for merged files [default: merged_sql]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// YAML config file (output_dir, comment, suffix)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Comment line written above the merged statement
    #[arg(long)]
    pub comment: Option<String>,

    /// Preview without writing files (dry run)
    #[arg(long)]
    pub dry_run: bool,

    /// Output results as JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,

    /// Show progress during processing
    #[arg(short, long)]
    pub progress: bool,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(shell) = cli.completions {
        generate(
            shell,
            &mut Cli::command(),
            "sql-insert-merger",
            &mut io::stdout(),
        );
        return Ok(());
    }

    init_tracing(cli.verbose);

    merge::run(
        cli.paths,
        cli.output,
        cli.config,
        cli.comment,
        cli.dry_run,
        cli.json,
        cli.progress,
    )
}

/// Diagnostics go to stderr so they never mix with status lines or JSON.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,sql_insert_merger=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
