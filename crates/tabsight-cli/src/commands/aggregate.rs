//! Aggregate command - analyze shard files in parallel and merge them.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use tabsight::{AnalysisReport, DataTable, SourceMetadata, Tabsight};
use tracing::info;

use super::{load_config, print_summary, CommandResult};

pub fn run(files: Vec<PathBuf>, output: PathBuf, config: Option<PathBuf>) -> CommandResult {
    let tabsight = Tabsight::with_config(load_config(config.as_deref())?);

    let mut shards = Vec::with_capacity(files.len());
    for file in &files {
        let text = fs::read_to_string(file)
            .map_err(|e| format!("Failed to read shard {}: {}", file.display(), e))?;
        info!(shard = %file.display(), bytes = text.len(), "Read shard");
        shards.push(text);
    }

    println!(
        "{} {} shards",
        "Aggregating".cyan().bold(),
        shards.len().to_string().white()
    );

    let insights = tabsight.analyze_shards(&shards)?;
    let charts = tabsight.curate(&insights);

    let mut source = SourceMetadata::inline("shards", &DataTable::empty());
    source.row_count = insights.num_samples;
    source.column_count = insights.columns.len();

    let report = AnalysisReport {
        source,
        insights,
        charts,
        narrative: None,
    };
    report.save(&output)?;

    println!();
    print_summary(&report.insights, &report.charts);
    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output.display().to_string().white()
    );

    Ok(())
}
