//! Main Tabsight struct and public API.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::aggregation::{AggregationConfig, InsightAggregator};
use crate::analysis::{AnalyzerConfig, InsightAnalyzer};
use crate::charts::{ChartCurator, ChartsData, CurationConfig};
use crate::error::{Result, TabsightError};
use crate::input::{
    binary_record, image_dimensions, parse_json, shard_table, DataTable, DocumentSummary,
    ImageSummary, Parser, ParserConfig, Record, SourceMetadata,
};
use crate::insight::DataInsights;
use crate::narrative::{Narrative, NarrativeGenerator, NarrativeRequest};
use crate::persistence::save_json;

/// Configuration for Tabsight analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsightConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Insight extraction configuration.
    pub analyzer: AnalyzerConfig,
    /// Shard aggregation configuration.
    pub aggregation: AggregationConfig,
    /// Chart curation configuration.
    pub curation: CurationConfig,
    /// Original rows handed to the narrative generator.
    pub narrative_sample_rows: usize,
}

impl Default for TabsightConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            analyzer: AnalyzerConfig::default(),
            aggregation: AggregationConfig::default(),
            curation: CurationConfig::default(),
            narrative_sample_rows: 5,
        }
    }
}

impl TabsightConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| TabsightError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| {
            TabsightError::Config(format!("Invalid config '{}': {}", path.display(), e))
        })
    }
}

/// Result of analyzing one input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Where the data came from.
    pub source: SourceMetadata,
    /// Raw statistical summary.
    pub insights: DataInsights,
    /// Curated charts (or an accepted override).
    pub charts: ChartsData,
    /// Prose summary, when a generator is configured and succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<Narrative>,
}

impl AnalysisReport {
    /// Save the report as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_json(self, path.as_ref(), "report")
    }
}

/// The main Tabsight analysis engine.
pub struct Tabsight {
    config: TabsightConfig,
    parser: Parser,
    analyzer: InsightAnalyzer,
    aggregator: InsightAggregator,
    curator: ChartCurator,
    narrator: Option<Arc<dyn NarrativeGenerator>>,
}

impl Tabsight {
    /// Create a new Tabsight instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(TabsightConfig::default())
    }

    /// Create a Tabsight instance with custom configuration.
    pub fn with_config(config: TabsightConfig) -> Self {
        Self {
            parser: Parser::with_config(config.parser.clone()),
            analyzer: InsightAnalyzer::with_config(config.analyzer.clone()),
            aggregator: InsightAggregator::with_config(config.aggregation.clone()),
            curator: ChartCurator::with_config(config.curation.clone()),
            narrator: None,
            config,
        }
    }

    /// Add a narrative generator.
    ///
    /// Without one, reports carry no narrative. A generator that fails is
    /// logged and skipped; the report is still produced.
    pub fn with_narrator(mut self, narrator: impl NarrativeGenerator + 'static) -> Self {
        self.narrator = Some(Arc::new(narrator));
        self
    }

    pub fn config(&self) -> &TabsightConfig {
        &self.config
    }

    /// Extract insights from a parsed table.
    pub fn analyze_table(&self, table: &DataTable) -> DataInsights {
        self.analyzer.analyze(table)
    }

    /// Curate insights into charts.
    pub fn curate(&self, insights: &DataInsights) -> ChartsData {
        self.curator.curate(insights)
    }

    /// Validate charts produced outside the curator.
    pub fn accept_charts(&self, external: ChartsData) -> ChartsData {
        self.curator.accept_override(external)
    }

    /// Analyze delimited text.
    pub fn analyze_text(&self, text: &str) -> AnalysisReport {
        let table = self.parser.parse_str(text);
        let source = SourceMetadata::inline("csv", &table);
        self.report(source, &table, self.analyzer.analyze(&table))
    }

    /// Analyze records supplied by an upstream extraction layer.
    pub fn analyze_records(&self, records: &[Record]) -> AnalysisReport {
        let table = DataTable::from_records(records);
        let source = SourceMetadata::inline("records", &table);
        self.report(source, &table, self.analyzer.analyze(&table))
    }

    /// Analyze a file, dispatching on its extension.
    ///
    /// `csv` and `tsv` are parsed as delimited text, `txt` too when it yields
    /// at least two columns, `json` as records. PNG and GIF images become an
    /// image record. Any other UTF-8 file is summarized as a document, and
    /// anything else as an opaque binary record.
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> Result<AnalysisReport> {
        let (table, source) = self.load(path.as_ref())?;
        let insights = self.analyzer.analyze(&table);
        Ok(self.report(source, &table, insights))
    }

    /// Read, hash and extract a file.
    fn load(&self, path: &Path) -> Result<(DataTable, SourceMetadata)> {
        let contents = fs::read(path).map_err(|e| TabsightError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let size_bytes = contents.len() as u64;
        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let (table, format) = self.extract(&extension, &contents, size_bytes);
        info!(
            path = %path.display(),
            format = %format,
            rows = table.row_count(),
            columns = table.column_count(),
            "Loaded input"
        );

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );
        Ok((table, source))
    }

    /// Turn file contents into a table plus a format name.
    fn extract(&self, extension: &str, contents: &[u8], size_bytes: u64) -> (DataTable, String) {
        match extension {
            "csv" => (self.parser.parse_bytes(contents), "csv".to_string()),
            "tsv" | "tab" => {
                let parser = Parser::with_config(ParserConfig {
                    delimiter: b'\t',
                    detect_delimiter: false,
                    ..self.config.parser.clone()
                });
                (parser.parse_bytes(contents), "tsv".to_string())
            }
            "json" => (
                parse_json(&String::from_utf8_lossy(contents)),
                "json".to_string(),
            ),
            "png" | "gif" | "jpg" | "jpeg" | "bmp" | "webp" => {
                let format = if extension == "jpg" { "jpeg" } else { extension };
                let table = match image_dimensions(contents) {
                    Some((width, height)) => ImageSummary {
                        format: format.to_string(),
                        width,
                        height,
                        size_bytes,
                    }
                    .to_table(),
                    None => binary_record(&format!("image/{}", format), size_bytes),
                };
                (table, format!("image/{}", format))
            }
            _ => match std::str::from_utf8(contents) {
                Ok(text) => {
                    if extension == "txt" {
                        let table = self.parser.parse_bytes(contents);
                        if table.column_count() >= 2 {
                            return (table, "csv".to_string());
                        }
                    }
                    let kind = if extension.is_empty() { "text" } else { extension };
                    let summary = DocumentSummary::from_text(kind, text, size_bytes);
                    (summary.to_table(), format!("document/{}", kind))
                }
                Err(_) => {
                    debug!(extension, "Treating input as opaque binary");
                    (
                        binary_record("application/octet-stream", size_bytes),
                        "binary".to_string(),
                    )
                }
            },
        }
    }

    /// Analyze pre-split shards in parallel and merge them in order.
    ///
    /// Each shard is delimited text with its own header row.
    pub fn analyze_shards(&self, shards: &[String]) -> Result<DataInsights> {
        let partials: Vec<DataInsights> = shards
            .par_iter()
            .map(|text| self.analyzer.analyze(&self.parser.parse_str(text)))
            .collect();

        debug!(shards = partials.len(), "Analyzed shards");
        self.aggregator.aggregate(&partials)
    }

    /// Split a table into `shards` parts, analyze them in parallel, and merge.
    pub fn analyze_sharded(&self, table: &DataTable, shards: usize) -> Result<AnalysisReport> {
        let texts = shard_table(table, shards)?;
        let insights = self.analyze_shards(&texts)?;
        let source = SourceMetadata::inline("csv", table);
        Ok(self.report(source, table, insights))
    }

    /// Analyze a file split into `shards` parts.
    pub fn analyze_file_sharded(
        &self,
        path: impl AsRef<Path>,
        shards: usize,
    ) -> Result<AnalysisReport> {
        let (table, source) = self.load(path.as_ref())?;
        let mut report = self.analyze_sharded(&table, shards)?;
        report.source = source;
        Ok(report)
    }

    /// Merge already-computed shard insights.
    pub fn aggregate(&self, shards: &[DataInsights]) -> Result<DataInsights> {
        self.aggregator.aggregate(shards)
    }

    /// Curate, then let the narrator (if any) describe and optionally
    /// override the charts.
    fn report(&self, source: SourceMetadata, table: &DataTable, insights: DataInsights) -> AnalysisReport {
        let charts = self.curator.curate(&insights);
        let (charts, narrative) = self.narrate(&insights, charts, table);

        AnalysisReport {
            source,
            insights,
            charts,
            narrative,
        }
    }

    fn narrate(
        &self,
        insights: &DataInsights,
        charts: ChartsData,
        table: &DataTable,
    ) -> (ChartsData, Option<Narrative>) {
        let Some(narrator) = &self.narrator else {
            return (charts, None);
        };

        let request = NarrativeRequest::new(insights, &charts)
            .with_samples(table.sample_records(self.config.narrative_sample_rows));

        match narrator.generate(&request) {
            Ok(mut narrative) => {
                debug!(generator = narrator.name(), "Generated narrative");
                let charts = match narrative.charts.take() {
                    Some(external) => self.curator.accept_override(external),
                    None => charts,
                };
                (charts, Some(narrative))
            }
            Err(e) => {
                warn!(generator = narrator.name(), error = %e, "Narrative generation failed");
                (charts, None)
            }
        }
    }
}

impl Default for Tabsight {
    fn default() -> Self {
        Self::new()
    }
}
