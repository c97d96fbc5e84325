//! CLI argument definitions.

use crate::cli::validators::parse_reference_temp;
use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Poultry health screening from thermal images.
#[derive(Debug, Parser)]
#[command(name = "thermocluck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Image files or directories to analyze.
    pub inputs: Vec<PathBuf>,

    /// Common options for analysis.
    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Browse stored analysis results.
    History {
        /// History action to perform.
        #[command(subcommand)]
        action: HistoryAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// History subcommand actions.
#[derive(Debug, Clone, Subcommand)]
pub enum HistoryAction {
    /// List stored results, newest first.
    List {
        /// Show at most this many records.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Find results whose date or label contains a keyword.
    Search {
        /// Text to look for, e.g. "2025-03" or "Healthy".
        keyword: String,
    },
    /// Delete a stored result.
    Delete {
        /// Record id.
        id: i64,
    },
    /// Show result counts by label.
    Stats,
}

/// Arguments for the analyze command.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Detection file to use for the (single) input image.
    #[arg(long, env = "THERMOCLUCK_DETECTIONS")]
    pub detections: Option<PathBuf>,

    /// Directory holding `<stem>.detections.csv` files (default: next to each image).
    #[arg(long, env = "THERMOCLUCK_DETECTIONS_DIR")]
    pub detections_dir: Option<PathBuf>,

    /// Reference temperature in °C for field synthesis.
    #[arg(long, value_parser = parse_reference_temp, env = "THERMOCLUCK_REFERENCE_TEMP")]
    pub reference_temp: Option<f64>,

    /// Per-pixel temperature CSV to use instead of a synthesized field.
    #[arg(long)]
    pub radiometric: Option<PathBuf>,

    /// Result formats (comma-separated: json,csv).
    #[arg(short, long, value_delimiter = ',', env = "THERMOCLUCK_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Output directory (default: same as input).
    #[arg(short, long, env = "THERMOCLUCK_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Do not write annotated images.
    #[arg(long)]
    pub no_annotate: bool,

    /// Do not write heat pattern images.
    #[arg(long)]
    pub no_heatmap: bool,

    /// Do not save results to the database.
    #[arg(long)]
    pub no_store: bool,

    /// Result database path.
    #[arg(long, global = true, env = "THERMOCLUCK_DB")]
    pub db: Option<PathBuf>,

    /// Stop on first error.
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable the progress bar.
    #[arg(long)]
    pub no_progress: bool,
}
