//! Command-line interface definitions.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// rentstat - bike-rental dataset analysis
#[derive(Parser, Debug)]
#[command(name = "rentstat")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the dataset, run every analysis, write output files
    Analyze(AnalyzeArgs),

    /// Write a configuration file with default settings
    InitConfig {
        /// Where to write the file
        #[arg(long, default_value = crate::config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ClapArgs, Debug, Default)]
pub struct AnalyzeArgs {
    /// Local CSV/TSV file to analyze (instead of downloading)
    #[arg(short, long, conflicts_with = "url")]
    pub csv: Option<PathBuf>,

    /// Dataset URL (overrides the configured one)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Configuration file (default: ./rentstat.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Treat input as TSV instead of CSV
    #[arg(long)]
    pub tsv: bool,

    /// Day-type rule: `flag` (working-day column) or `weekday-name`
    #[arg(long)]
    pub classifier: Option<String>,

    /// First date to include (inclusive)
    #[arg(long)]
    pub start: Option<String>,

    /// Last date to include (inclusive)
    #[arg(long)]
    pub end: Option<String>,

    /// Years to include, comma-separated ("none" selects nothing)
    #[arg(long)]
    pub years: Option<String>,

    /// Seasons to include, comma-separated ("none" selects nothing)
    #[arg(long)]
    pub seasons: Option<String>,

    /// Day-types to include: working, non-working ("none" selects nothing)
    #[arg(long)]
    pub day_types: Option<String>,

    /// Output directory for result files
    #[arg(short, long, default_value = "./rental_output")]
    pub output_dir: PathBuf,
}

impl Args {
    /// Returns the log level based on verbosity settings.
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
