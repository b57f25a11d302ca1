//! CLI argument definitions using clap.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Tabsight: statistical insights and curated charts for tabular data
#[derive(Parser)]
#[command(name = "tabsight")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a data file and write an insight report
    Analyze {
        /// Path to the data file (CSV/TSV/JSON, or any document)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the report (default: <file>.insights.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Sniff the delimiter instead of assuming comma
        #[arg(long)]
        detect_delimiter: bool,

        /// Split the data into N shards, analyze them in parallel and merge
        #[arg(long, value_name = "N")]
        shards: Option<usize>,

        /// Add a template narrative to the report
        #[arg(long)]
        narrate: bool,
    },

    /// Analyze several shard files in parallel and merge their insights
    Aggregate {
        /// Shard files, in shard order
        #[arg(value_name = "SHARD_FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output path for the merged report
        #[arg(short, long, default_value = "aggregate.insights.json")]
        output: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Re-curate charts from saved insights
    Charts {
        /// Saved insights (a report or a bare insights document)
        #[arg(value_name = "INSIGHTS_JSON")]
        file: PathBuf,

        /// Output path for the charts (default: <file>.charts.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Externally generated charts to accept instead of curating
        #[arg(long = "override", value_name = "CHARTS_JSON")]
        override_charts: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
