//! The insight analyzer: runs every engine over one table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::DataTable;
use crate::insight::{ClusterPoint, ColumnStatistic, DataInsights};

use super::clustering::assign_clusters;
use super::correlation::correlate;
use super::key_value::KeyValueDetector;
use super::outlier::{detect_outliers, OutlierLimits};
use super::statistical::StatisticalAnalyzer;
use super::trend::detect_trend;
use super::values::{aligned_pairs, NumericColumn, NumericMode};

/// Configuration for insight extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Share of usable values that must parse for a column to be numeric.
    pub numeric_ratio: f64,
    /// Frequent values kept per categorical column.
    pub top_values: usize,
    /// Aligned rows required before two columns are correlated.
    pub min_correlation_pairs: usize,
    /// Decimal places kept on correlation coefficients.
    pub correlation_decimals: i32,
    /// Number of diagonal centroids.
    pub cluster_count: usize,
    /// Points required before clustering is attempted.
    pub min_cluster_points: usize,
    /// Cap on stored trend points.
    pub max_trend_points: usize,
    /// Standard deviations from the mean at which a value is an outlier.
    pub outlier_z_threshold: f64,
    /// Rows scanned per column for outliers.
    pub outlier_scan_rows: usize,
    /// Global cap on outlier records.
    pub max_outliers: usize,
    /// Minimum distinct ratio of a key column.
    pub key_distinct_ratio: f64,
    /// A key column must be less numeric than this.
    pub key_max_numeric_ratio: f64,
    /// Minimum numeric ratio of a value column.
    pub value_min_numeric_ratio: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            numeric_ratio: 0.5,
            top_values: 5,
            min_correlation_pairs: 3,
            correlation_decimals: 3,
            cluster_count: 3,
            min_cluster_points: 3,
            max_trend_points: 50,
            outlier_z_threshold: 2.0,
            outlier_scan_rows: 100,
            max_outliers: 10,
            key_distinct_ratio: 0.8,
            key_max_numeric_ratio: 0.5,
            value_min_numeric_ratio: 0.5,
        }
    }
}

/// Extracts [`DataInsights`] from a table.
///
/// Analysis is pure and total: any table, including an empty one, yields a
/// fully populated value.
#[derive(Debug, Clone)]
pub struct InsightAnalyzer {
    statistical: StatisticalAnalyzer,
    key_value: KeyValueDetector,
    config: AnalyzerConfig,
}

impl InsightAnalyzer {
    /// Create an analyzer with default settings.
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            statistical: StatisticalAnalyzer::new(config.numeric_ratio, config.top_values),
            key_value: KeyValueDetector::new(
                config.key_distinct_ratio,
                config.key_max_numeric_ratio,
                config.value_min_numeric_ratio,
            ),
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a table.
    pub fn analyze(&self, table: &DataTable) -> DataInsights {
        if table.is_empty() {
            return DataInsights::empty();
        }

        let key_value = self.key_value.detect(table);
        let mode = if key_value.is_some() {
            NumericMode::KeyValue
        } else {
            NumericMode::Standard
        };

        let mut statistics: IndexMap<String, ColumnStatistic> = IndexMap::new();
        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();
        let mut numeric: Vec<NumericColumn> = Vec::new();

        for (index, name) in table.headers.iter().enumerate() {
            let Some(stat) = self.statistical.analyze_column(table, index, mode) else {
                debug!(column = %name, "Skipping column without usable values");
                continue;
            };

            if stat.is_numeric() {
                numeric_columns.push(name.clone());
                numeric.push(NumericColumn::parse(table, index, mode));
            } else {
                categorical_columns.push(name.clone());
            }
            statistics.insert(name.clone(), stat);
        }

        let correlations = correlate(
            &numeric,
            self.config.min_correlation_pairs,
            self.config.correlation_decimals,
        );

        // Named metrics are a snapshot, not a sample: no scatter, no time axis.
        let (clusters, trends) = if key_value.is_some() {
            (Vec::new(), Vec::new())
        } else {
            (
                self.cluster(&numeric),
                detect_trend(table, &numeric, self.config.max_trend_points)
                    .into_iter()
                    .collect(),
            )
        };

        let outliers = detect_outliers(
            &numeric,
            &statistics,
            OutlierLimits {
                z_threshold: self.config.outlier_z_threshold,
                scan_rows: self.config.outlier_scan_rows,
                max_records: self.config.max_outliers,
            },
        );

        debug!(
            rows = table.row_count(),
            numeric = numeric_columns.len(),
            categorical = categorical_columns.len(),
            correlations = correlations.len(),
            clusters = clusters.len(),
            trends = trends.len(),
            outliers = outliers.len(),
            key_value = key_value.is_some(),
            "Analyzed table"
        );

        let (key_column, value_column, key_value_pairs) = match key_value {
            Some(detection) => (
                Some(detection.key_column),
                Some(detection.value_column),
                detection.pairs,
            ),
            None => (None, None, Vec::new()),
        };

        DataInsights {
            num_samples: table.row_count(),
            columns: table.headers.clone(),
            numeric_columns,
            categorical_columns,
            statistics,
            correlations,
            clusters,
            trends,
            outliers,
            is_key_value_structure: key_column.is_some(),
            key_column,
            value_column,
            key_value_pairs,
        }
    }

    /// Cluster the first two numeric columns.
    fn cluster(&self, numeric: &[NumericColumn]) -> Vec<ClusterPoint> {
        let [x, y, ..] = numeric else {
            return Vec::new();
        };

        let points = aligned_pairs(x, y);
        if points.len() < self.config.min_cluster_points {
            return Vec::new();
        }

        assign_clusters(&points, self.config.cluster_count.min(points.len()))
    }
}

impl Default for InsightAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
