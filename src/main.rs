#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::uninlined_format_args)]

mod analysis;
mod cli;
mod config;
mod csv_reader;
mod error;
mod source;
mod structs;

use clap::Parser;
use cli::{AnalyzeArgs, Args, Commands};
use config::Config;
use source::{DataSource, FileSource, UrlSource};
use std::path::Path;
use std::time::Duration;
use structs::{RecordFilter, RentalError, RentalRecord, Result};
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: could not set up logging: {e}");
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Some(Commands::Analyze(analyze)) => run_analyze(&analyze),
        Some(Commands::InitConfig { path, force }) => run_init_config(&path, force),
        None => {
            eprintln!("No subcommand provided. Use 'rentstat analyze' or 'rentstat init-config'.");
            eprintln!("Run 'rentstat --help' for usage information.");
            std::process::exit(1);
        }
    }
}

/// Load once, analyze, write output files
fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let mut config = Config::resolve(args.config.as_deref())?;
    config.merge_with_args(args)?;
    debug!("Effective config: {:?}", config);

    let source: Box<dyn DataSource> = match &args.csv {
        Some(path) => {
            if !path.exists() {
                return Err(RentalError::Config(format!(
                    "CSV file not found: {}",
                    path.display()
                )));
            }
            Box::new(FileSource::new(path.clone()))
        }
        None => Box::new(UrlSource::new(
            config.source.url.clone(),
            Duration::from_secs(config.source.timeout_seconds),
        )),
    };
    let location = source.describe();

    let table = source.load(config.delimiter()?)?;
    info!(
        "Loaded {} rows x {} columns from {location}",
        table.row_count(),
        table.col_count()
    );

    let records = RentalRecord::from_csv(&table, &config)?;
    info!(
        "Classified {} records ({:?} rule)",
        records.len(),
        config.analysis.classifier
    );

    let pipeline_config = analysis::pipeline::AnalysisConfig {
        filter: RecordFilter::from_config(&config.filter, &config.source.date_format)?,
        day_type_order: config.day_type_order(),
    };
    let report = analysis::pipeline::run_pipeline(&records, &pipeline_config)?;

    analysis::output::write_all(&args.output_dir, &location, &report)?;

    for line in analysis::output::console_lines(&report) {
        println!("{line}");
    }

    info!("Output written to {}", args.output_dir.display());
    for name in [
        "summary.txt",
        "day_types.csv",
        "seasons.csv",
        "weather.csv",
        "scatter.csv",
        "records.csv",
        "stats.json",
    ] {
        debug!("  - {name}");
    }

    Ok(())
}

/// Write a default configuration file
fn run_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(RentalError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    std::fs::write(path, Config::default_toml()?)?;
    println!("Created {} with default settings.", path.display());
    Ok(())
}
