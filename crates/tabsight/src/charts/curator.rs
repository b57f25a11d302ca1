//! Chart curation policy.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::insight::{ClusterPoint, DataInsights};

use super::types::{ChartSummary, ChartTrend, ChartsData, KeyValueBar};

/// Configuration for chart curation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    /// Correlations with |value| at or below this are noise.
    pub noise_threshold: f64,
    /// Correlations with |value| above this count as strong.
    pub strong_threshold: f64,
    /// Distinct labels required to keep the cluster chart.
    pub min_cluster_labels: usize,
    /// Points required to keep the cluster chart.
    pub min_cluster_points: usize,
    /// Key-value labels containing any of these are synthetic and dropped.
    pub synthetic_label_patterns: Vec<String>,
    /// Accept externally generated charts verbatim instead of re-curating.
    pub trust_external_charts: bool,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            noise_threshold: 0.1,
            strong_threshold: 0.5,
            min_cluster_labels: 2,
            min_cluster_points: 5,
            synthetic_label_patterns: ["outlier", "row_", "cluster", "sample_", "index_", "point_"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            trust_external_charts: false,
        }
    }
}

/// Filters insights down to what is safe to render.
#[derive(Debug, Clone, Default)]
pub struct ChartCurator {
    config: CurationConfig,
}

impl ChartCurator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CurationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CurationConfig {
        &self.config
    }

    /// Curate insights into chart data. Total and deterministic.
    pub fn curate(&self, insights: &DataInsights) -> ChartsData {
        let correlation_matrix: Vec<_> = insights
            .correlations
            .iter()
            .filter(|pair| pair.value.abs() > self.config.noise_threshold)
            .cloned()
            .collect();

        let trends: Vec<ChartTrend> = insights
            .trends
            .iter()
            .filter(|trend| !is_row_index(&trend.over))
            .map(ChartTrend::from)
            .collect();

        let clusters = self.curate_clusters(insights);
        let key_value_bar_chart = self.curate_bars(insights);

        let summary = ChartSummary {
            strong_correlations: correlation_matrix
                .iter()
                .filter(|pair| pair.value.abs() > self.config.strong_threshold)
                .count(),
            outliers_count: insights.outliers.len(),
            trends_count: trends.len(),
            clusters_count: clusters.len(),
        };

        debug!(
            correlations = correlation_matrix.len(),
            strong = summary.strong_correlations,
            trends = trends.len(),
            clusters = clusters.len(),
            bars = key_value_bar_chart.as_ref().map_or(0, Vec::len),
            "Curated charts"
        );

        ChartsData {
            correlation_matrix,
            trends,
            clusters,
            outliers: insights.outliers.clone(),
            key_value_bar_chart,
            summary,
        }
    }

    /// Accept charts produced outside the curator, e.g. by a narrative
    /// generator.
    ///
    /// Unless `trust_external_charts` is set, the charts are converted back
    /// to insights and curated again, so the same filters apply.
    pub fn accept_override(&self, external: ChartsData) -> ChartsData {
        if self.config.trust_external_charts {
            debug!("Accepting external charts verbatim");
            return external;
        }

        let curated = self.curate(&external.to_insights());
        let dropped = [
            (external.correlation_matrix.len(), curated.correlation_matrix.len()),
            (external.trends.len(), curated.trends.len()),
            (external.clusters.len(), curated.clusters.len()),
            (bar_count(&external), bar_count(&curated)),
        ]
        .iter()
        .map(|(before, after)| before.saturating_sub(*after))
        .sum::<usize>();
        if dropped > 0 {
            warn!(dropped, "External charts contained entries rejected by curation");
        }
        curated
    }

    fn curate_clusters(&self, insights: &DataInsights) -> Vec<ClusterPoint> {
        if insights.cluster_labels().len() >= self.config.min_cluster_labels
            && insights.clusters.len() >= self.config.min_cluster_points
        {
            insights.clusters.clone()
        } else {
            Vec::new()
        }
    }

    fn curate_bars(&self, insights: &DataInsights) -> Option<Vec<KeyValueBar>> {
        if !insights.is_key_value_structure {
            return None;
        }

        let bars: Vec<KeyValueBar> = insights
            .key_value_pairs
            .iter()
            .filter(|pair| !self.is_synthetic(&pair.key))
            .map(|pair| KeyValueBar {
                label: pair.key.clone(),
                value: pair.value,
            })
            .collect();

        (!bars.is_empty()).then_some(bars)
    }

    fn is_synthetic(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        self.config
            .synthetic_label_patterns
            .iter()
            .any(|pattern| lower.contains(pattern.as_str()))
    }
}

/// "row index", "row_index" and "Row-Index" all name a positional axis.
fn is_row_index(column: &str) -> bool {
    column
        .to_lowercase()
        .replace(['_', '-'], " ")
        .contains("row index")
}

fn bar_count(charts: &ChartsData) -> usize {
    charts.key_value_bar_chart.as_ref().map_or(0, Vec::len)
}
