//! Tabsight: statistical insight extraction and chart curation for tabular data.
//!
//! Tabsight turns a table of raw string cells into a statistical summary
//! ([`DataInsights`]) and then curates that summary into a rendering-safe
//! chart structure ([`ChartsData`]).
//!
//! # Core Principles
//!
//! - **Total**: malformed or empty input yields empty-but-valid insights, never an error
//! - **Honest charts**: trends only over genuine time columns, never row position
//! - **Shardable**: per-shard insights merge into one summary
//!
//! # Example
//!
//! ```no_run
//! use tabsight::Tabsight;
//!
//! let tabsight = Tabsight::new();
//! let report = tabsight.analyze_file("metrics.csv").unwrap();
//!
//! println!("Rows: {}", report.insights.num_samples);
//! println!("Strong correlations: {}", report.charts.summary.strong_correlations);
//! ```

pub mod aggregation;
pub mod analysis;
pub mod charts;
pub mod error;
pub mod input;
pub mod insight;
pub mod narrative;

mod persistence;
mod tabsight;

pub use crate::tabsight::{AnalysisReport, Tabsight, TabsightConfig};
pub use aggregation::{AggregationConfig, InsightAggregator};
pub use analysis::{AnalyzerConfig, InsightAnalyzer};
pub use charts::{ChartCurator, ChartsData, CurationConfig};
pub use error::{Result, TabsightError};
pub use input::{DataTable, Parser, ParserConfig, Record, SourceMetadata};
pub use insight::{ColumnStatistic, DataInsights};
pub use narrative::{Narrative, NarrativeGenerator, NarrativeRequest, TemplateNarrator};
