//! Charts command - re-curate charts from saved insights.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use tabsight::{AnalysisReport, ChartsData, DataInsights, Tabsight};

use super::{load_config, print_summary, sibling_path, CommandResult};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    override_charts: Option<PathBuf>,
    config: Option<PathBuf>,
) -> CommandResult {
    let tabsight = Tabsight::with_config(load_config(config.as_deref())?);

    let text = fs::read_to_string(&file)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;

    // Accept either a full report or a bare insights document.
    let insights: DataInsights = match serde_json::from_str::<AnalysisReport>(&text) {
        Ok(report) => report.insights,
        Err(_) => serde_json::from_str(&text)?,
    };

    let charts = match override_charts {
        Some(path) => {
            let external = ChartsData::load(&path)?;
            if !tabsight.config().curation.trust_external_charts {
                println!(
                    "{} {}",
                    "Re-curating override".yellow().bold(),
                    path.display()
                );
            }
            tabsight.accept_charts(external)
        }
        None => tabsight.curate(&insights),
    };

    let output_path = output.unwrap_or_else(|| sibling_path(&file, "charts.json"));
    charts.save(&output_path)?;

    print_summary(&insights, &charts);
    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
