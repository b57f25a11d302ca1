//! Example: Analyze a data file with Tabsight.
//!
//! Usage:
//!   cargo run --example analyze -- <file_path>
//!
//! Example:
//!   cargo run --example analyze -- sales.csv

use std::env;
use std::path::Path;

use tabsight::{ColumnStatistic, Tabsight, TemplateNarrator};

fn main() -> tabsight::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <file_path>");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example analyze -- sales.csv");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Tabsight Analysis: {}", file_path);
    println!("{}", separator);
    println!();

    let tabsight = Tabsight::new().with_narrator(TemplateNarrator::new());
    let report = tabsight.analyze_file(path)?;

    println!("## Source Metadata");
    println!("  File: {}", report.source.file);
    println!("  Format: {}", report.source.format);
    println!("  Rows: {}", report.source.row_count);
    println!("  Columns: {}", report.source.column_count);
    println!();

    let insights = &report.insights;
    println!("## Columns ({} total)", insights.columns.len());
    println!();
    for (name, stat) in &insights.statistics {
        match stat {
            ColumnStatistic::Numeric(s) => println!(
                "  {:20} numeric      n={:<6} mean={:<10.3} median={:<10.3} std={:.3}",
                name, s.count, s.mean, s.median, s.std
            ),
            ColumnStatistic::Categorical(s) => {
                let top: Vec<String> = s
                    .top_values
                    .iter()
                    .map(|(value, count)| format!("{}={}", value, count))
                    .collect();
                println!(
                    "  {:20} categorical  n={:<6} unique={:<5} top: {}",
                    name,
                    s.count,
                    s.unique,
                    top.join(", ")
                );
            }
        }
    }
    println!();

    let charts = &report.charts;
    println!("## Charts");
    println!();

    if let Some(bars) = &charts.key_value_bar_chart {
        println!("### Named metrics ({}):", bars.len());
        for bar in bars {
            println!("  {:20} {}", bar.label, bar.value);
        }
        println!();
    }

    if !charts.correlation_matrix.is_empty() {
        println!("### Correlations ({}):", charts.correlation_matrix.len());
        for pair in &charts.correlation_matrix {
            println!("  {} ~ {}: {:+.3}", pair.x, pair.y, pair.value);
        }
        println!();
    }

    for trend in &charts.trends {
        println!(
            "### Trend: {} over {} ({}, {:+.2}%, {} points)",
            trend.metric,
            trend.over,
            trend.direction,
            trend.change,
            trend.points.len()
        );
        println!();
    }

    if !charts.outliers.is_empty() {
        println!("### Outliers ({}):", charts.outliers.len());
        for outlier in &charts.outliers {
            println!(
                "  row {:<6} {:20} {} ({:.1} std devs)",
                outlier.row, outlier.column, outlier.value, outlier.deviation
            );
        }
        println!();
    }

    if !charts.clusters.is_empty() {
        println!("### Clusters: {} points", charts.clusters.len());
        println!();
    }

    if let Some(narrative) = &report.narrative {
        println!("## Narrative");
        println!("  {}", narrative.headline);
        for line in &narrative.insights {
            println!("  - {}", line);
        }
        println!();
    }

    println!("## Summary");
    println!("  Strong correlations: {}", charts.summary.strong_correlations);
    println!("  Outliers: {}", charts.summary.outliers_count);
    println!("  Trends: {}", charts.summary.trends_count);
    println!("  Clusters: {}", charts.summary.clusters_count);
    println!();

    println!("{}", separator);

    Ok(())
}
