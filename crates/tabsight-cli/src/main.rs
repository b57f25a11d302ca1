//! Tabsight CLI - statistical insights and curated charts for tabular data.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            file,
            output,
            json,
            config,
            detect_delimiter,
            shards,
            narrate,
        } => commands::analyze::run(commands::analyze::AnalyzeArgs {
            file,
            output,
            json,
            config,
            detect_delimiter,
            shards,
            narrate,
        }),

        Commands::Aggregate {
            files,
            output,
            config,
        } => commands::aggregate::run(files, output, config),

        Commands::Charts {
            file,
            output,
            override_charts,
            config,
        } => commands::charts::run(file, output, override_charts, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG wins over -v.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
