//! Analyze command - analyze a data file and write an insight report.

use std::path::PathBuf;

use colored::Colorize;
use tabsight::{Tabsight, TemplateNarrator};

use super::{load_config, print_summary, sibling_path, CommandResult};

pub struct AnalyzeArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub json: bool,
    pub config: Option<PathBuf>,
    pub detect_delimiter: bool,
    pub shards: Option<usize>,
    pub narrate: bool,
}

pub fn run(args: AnalyzeArgs) -> CommandResult {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    let mut config = load_config(args.config.as_deref())?;
    if args.detect_delimiter {
        config.parser.detect_delimiter = true;
    }

    let mut tabsight = Tabsight::with_config(config);
    if args.narrate {
        tabsight = tabsight.with_narrator(TemplateNarrator::new());
    }

    if !args.json {
        println!(
            "{} {}",
            "Analyzing".cyan().bold(),
            args.file.display().to_string().white()
        );
    }

    let report = match args.shards {
        Some(shards) => tabsight.analyze_file_sharded(&args.file, shards)?,
        None => tabsight.analyze_file(&args.file)?,
    };

    let output_path = args
        .output
        .unwrap_or_else(|| sibling_path(&args.file, "insights.json"));
    report.save(&output_path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    print_summary(&report.insights, &report.charts);

    if let Some(narrative) = &report.narrative {
        println!();
        println!("{}", narrative.headline.white().bold());
        for line in &narrative.insights {
            println!("  - {}", line);
        }
    }

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
