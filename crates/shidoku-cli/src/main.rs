//! shidoku: enumerate every 4x4 Sudoku grid and report its symmetry classes.
//!
//! With no arguments the full pipeline runs and the class counts are printed.

mod output;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use shidoku_core::{Grid, Pipeline, PipelineConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "shidoku")]
#[command(version, about = "Symmetry classes of 4x4 Sudoku grids", long_about = None)]
struct Cli {
    /// Check validity, closure and key invariance over every grid
    #[arg(long)]
    verify: bool,

    /// Trace the full canonicalization of one relabel representative
    #[arg(
        long,
        value_name = "INDEX",
        num_args = 0..=1,
        default_missing_value = "0"
    )]
    trace: Option<usize>,

    /// Maximum trace rows printed in text mode (the winner is always shown)
    #[arg(long, value_name = "N", default_value_t = 24)]
    trace_limit: usize,

    /// Canonicalize a single 16-digit grid instead of running the pipeline
    #[arg(long, value_name = "GRID")]
    classify: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = PipelineConfig {
        verify_invariants: cli.verify,
        trace_representative: cli.trace,
    };
    let pipeline = Pipeline::with_config(config);

    if let Some(raw) = &cli.classify {
        let grid: Grid = raw
            .parse()
            .with_context(|| format!("failed to parse grid '{}'", raw))?;
        let classification = pipeline.classify(&grid)?;
        match cli.format {
            Format::Text => output::print_classification(&classification),
            Format::Json => println!("{}", serde_json::to_string_pretty(&classification)?),
        }
        return Ok(());
    }

    info!(config = ?pipeline.config(), "starting pipeline");
    let report = pipeline.run().context("pipeline run failed")?;
    match cli.format {
        Format::Text => output::print_report(&report, cli.trace_limit),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
