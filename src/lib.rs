//! Thermocluck - poultry health screening from thermal images.
//!
//! Detected head, body and leg regions are mapped onto a temperature field
//! and classified as `Healthy`, `Fever Only`, `Suspected Bird Flu` or
//! `Detection Failed`.

#![warn(missing_docs)]

pub mod annotate;
pub mod cli;
pub mod config;
pub mod constants;
pub mod detect;
pub mod error;
pub mod health;
pub mod output;
pub mod pipeline;
pub mod regions;
pub mod store;
pub mod thermal;

use clap::{CommandFactory, Parser};
use cli::{AnalyzeArgs, Cli, Command, ConfigAction, HistoryAction};
use config::{
    Config, config_file_path, default_db_path, load_default_config, save_default_config,
    validate_config,
};
use detect::{Detector, SidecarDetector};
use output::BatchSummary;
use pipeline::{Analyzer, ProcessOptions, collect_input_files, process_file};
use std::path::{Path, PathBuf};
use store::{ResultStore, SqliteResultStore};
use thermal::{FixedReference, NoReference, ReferenceSource, load_radiometric_csv};
use tracing::{error, info, warn};

pub use error::{Error, Result};

/// Main entry point for the thermocluck CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.analyze.verbose, cli.analyze.quiet);

    let config = load_default_config()?;
    validate_config(&config)?;

    if let Some(command) = cli.command {
        return handle_command(command, &cli.analyze, &config);
    }

    if cli.inputs.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    analyze_files(&cli.inputs, &cli.analyze, &config)
}

/// Analyze input images with the given options.
fn analyze_files(inputs: &[PathBuf], args: &AnalyzeArgs, config: &Config) -> Result<()> {
    use crate::output::progress;
    use std::time::Instant;

    let total_start = Instant::now();

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidImageFiles);
    }
    info!("Found {} image file(s) to process", files.len());

    if files.len() > 1 {
        for (flag, given) in [
            ("--detections", args.detections.is_some()),
            ("--radiometric", args.radiometric.is_some()),
        ] {
            if given {
                return Err(Error::Usage {
                    message: format!(
                        "{flag} applies to a single image, but {} were given",
                        files.len()
                    ),
                });
            }
        }
    }

    let analyzer = Analyzer::new(build_detector(args, config), build_reference(args, config));

    let radiometric = args
        .radiometric
        .as_deref()
        .map(load_radiometric_csv)
        .transpose()?;

    let options = ProcessOptions {
        output_dir: args
            .output_dir
            .clone()
            .or_else(|| config.defaults.output_dir.clone()),
        formats: args
            .format
            .clone()
            .unwrap_or_else(|| config.defaults.formats.clone()),
        annotate: config.defaults.annotate && !args.no_annotate,
        heatmap: config.defaults.heatmap && !args.no_heatmap,
    };

    let mut store = if config.store.enabled && !args.no_store {
        let path = resolve_db_path(args, config)?;
        info!("Saving results to {}", path.display());
        Some(SqliteResultStore::open(&path)?)
    } else {
        None
    };

    let progress_enabled = !args.quiet && !args.no_progress;
    let file_progress = progress::create_file_progress(files.len(), progress_enabled);

    let mut summary = BatchSummary::default();

    for file in &files {
        let name = file.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        progress::set_current(file_progress.as_ref(), &name);

        match process_file(
            file,
            &analyzer,
            radiometric.as_ref(),
            &options,
            store.as_mut().map(|s| s as &mut dyn ResultStore),
        ) {
            Ok(result) => summary.record(result.label()),
            Err(e) => {
                error!("Failed to process {}: {}", file.display(), e);
                summary.errors += 1;
                if args.fail_fast {
                    progress::finish_progress(file_progress, "Failed");
                    return Err(e);
                }
            }
        }
        progress::inc_progress(file_progress.as_ref());
    }

    progress::finish_progress(file_progress, "Complete");

    info!(
        "Complete: {summary} in {:.2}s",
        total_start.elapsed().as_secs_f64()
    );

    if summary.suspected > 0 {
        warn!(
            "{} image(s) flagged as suspected avian influenza",
            summary.suspected
        );
    }

    Ok(())
}

fn build_detector(args: &AnalyzeArgs, config: &Config) -> Box<dyn Detector> {
    if let Some(path) = &args.detections {
        return Box::new(SidecarDetector::with_file(path.clone()));
    }
    let dir = args
        .detections_dir
        .clone()
        .or_else(|| config.detector.detections_dir.clone());
    Box::new(SidecarDetector::new(dir, config.detector.suffix.clone()))
}

fn build_reference(args: &AnalyzeArgs, config: &Config) -> Box<dyn ReferenceSource> {
    match args.reference_temp.or(config.reference.temperature) {
        Some(t) => {
            info!("Using reference temperature {t:.1}°C");
            Box::new(FixedReference(t))
        }
        None => Box::new(NoReference),
    }
}

fn resolve_db_path(args: &AnalyzeArgs, config: &Config) -> Result<PathBuf> {
    match args.db.clone().or_else(|| config.store.path.clone()) {
        Some(path) => Ok(path),
        None => default_db_path(),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn handle_command(command: Command, args: &AnalyzeArgs, config: &Config) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
        Command::History { action } => {
            let path = resolve_db_path(args, config)?;
            handle_history_command(action, &path)
        }
    }
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            let contents = toml::to_string_pretty(&config)
                .map_err(|e| Error::ConfigSerialize { source: e })?;
            println!("{contents}");
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", config_file_path()?.display());
            Ok(())
        }
    }
}

fn handle_history_command(action: HistoryAction, db_path: &Path) -> Result<()> {
    let mut store = SqliteResultStore::open(db_path)?;

    match action {
        HistoryAction::List { limit } => {
            let records = store.list_all()?;
            let shown = limit.unwrap_or(records.len());
            print_records(&records[..shown.min(records.len())]);
        }
        HistoryAction::Search { keyword } => {
            let records = store.search(&keyword)?;
            if records.is_empty() {
                println!("No results matching '{keyword}'.");
            } else {
                print_records(&records);
            }
        }
        HistoryAction::Delete { id } => {
            if store.delete(id)? {
                println!("Deleted result #{id}.");
            } else {
                return Err(Error::Usage {
                    message: format!("no result with id {id}"),
                });
            }
        }
        HistoryAction::Stats => {
            let s = store.summary()?;
            println!("Total:              {}", s.total);
            println!("Healthy:            {}", s.healthy);
            println!("Fever Only:         {}", s.fever_only);
            println!("Suspected Bird Flu: {}", s.suspected);
            println!("Detection Failed:   {}", s.detection_failed);
            if s.other > 0 {
                println!("Other:              {}", s.other);
            }
        }
    }
    Ok(())
}

fn print_records(records: &[store::AnalysisRecord]) {
    if records.is_empty() {
        println!("No stored results.");
        return;
    }
    println!(
        "{:>6}  {:<19}  {:<18}  {:>8}  File",
        "ID", "Date", "Result", "Temp"
    );
    for r in records {
        println!(
            "{:>6}  {:<19}  {:<18}  {:>6.2}°C  {}",
            r.id, r.date, r.result, r.temperature, r.filename
        );
    }
}
