//! CLI command implementations.

pub mod aggregate;
pub mod analyze;
pub mod charts;

use std::path::{Path, PathBuf};

use colored::Colorize;
use tabsight::{ChartsData, DataInsights, TabsightConfig};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Load configuration from a file, or use defaults.
pub fn load_config(path: Option<&Path>) -> Result<TabsightConfig, tabsight::TabsightError> {
    match path {
        Some(path) => TabsightConfig::load(path),
        None => Ok(TabsightConfig::default()),
    }
}

/// `<dir>/<stem>.<suffix>` next to the input file.
pub fn sibling_path(file: &Path, suffix: &str) -> PathBuf {
    let mut p = file.to_path_buf();
    let stem = p.file_stem().unwrap_or_default().to_string_lossy().into_owned();
    p.set_file_name(format!("{}.{}", stem, suffix));
    p
}

/// Print the human-readable summary shared by every command.
pub fn print_summary(insights: &DataInsights, charts: &ChartsData) {
    println!(
        "{} rows, {} columns ({} numeric, {} categorical)",
        insights.num_samples.to_string().white().bold(),
        insights.columns.len(),
        insights.numeric_columns.len().to_string().cyan(),
        insights.categorical_columns.len().to_string().cyan()
    );

    if insights.is_key_value_structure {
        println!(
            "Key-value structure: {} -> {} ({} pairs)",
            insights.key_column.as_deref().unwrap_or("?").yellow(),
            insights.value_column.as_deref().unwrap_or("?").yellow(),
            insights.key_value_pairs.len()
        );
    }

    println!();
    println!("{}", "Charts:".yellow().bold());
    println!(
        "  correlations  {:4}  ({} strong)",
        charts.correlation_matrix.len(),
        charts.summary.strong_correlations.to_string().green()
    );
    println!("  trends        {:4}", charts.trends.len());
    println!("  cluster pts   {:4}", charts.clusters.len());
    println!(
        "  outliers      {:4}",
        charts.summary.outliers_count.to_string().red()
    );
    match &charts.key_value_bar_chart {
        Some(bars) => println!("  bars          {:4}", bars.len()),
        None => println!("  bars          {}", "none".dimmed()),
    }

    if charts.is_empty() {
        println!();
        println!("{}", "Nothing worth charting in this data.".dimmed());
    }
}
