//! Rendering-safe chart structure.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::insight::{
    ClusterPoint, CorrelationPair, DataInsights, KeyValuePair, OutlierRecord, TrendDirection,
    TrendPoint, TrendSeries,
};
use crate::persistence::{load_json, save_json};

/// A trend ready for a line chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTrend {
    pub metric: String,
    pub over: String,
    pub direction: TrendDirection,
    pub change: f64,
    pub points: Vec<TrendPoint>,
}

impl From<&TrendSeries> for ChartTrend {
    fn from(series: &TrendSeries) -> Self {
        Self {
            metric: series.metric.clone(),
            over: series.over.clone(),
            direction: series.direction,
            change: series.change,
            points: series.data_points.clone(),
        }
    }
}

/// One bar of a key-value chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueBar {
    pub label: String,
    pub value: f64,
}

/// Summary counts shown alongside the charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSummary {
    /// Correlations with |value| above the strong threshold, counted after
    /// noise filtering.
    pub strong_correlations: usize,
    pub outliers_count: usize,
    #[serde(default)]
    pub trends_count: usize,
    #[serde(default)]
    pub clusters_count: usize,
}

/// Curated chart data.
///
/// Every list is always present, possibly empty; "no chart" is a valid state.
/// The key-value bar chart serializes as `null` when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartsData {
    #[serde(default)]
    pub correlation_matrix: Vec<CorrelationPair>,
    #[serde(default)]
    pub trends: Vec<ChartTrend>,
    #[serde(default)]
    pub clusters: Vec<ClusterPoint>,
    #[serde(default)]
    pub outliers: Vec<OutlierRecord>,
    #[serde(default)]
    pub key_value_bar_chart: Option<Vec<KeyValueBar>>,
    #[serde(default)]
    pub summary: ChartSummary,
}

impl ChartsData {
    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.correlation_matrix.is_empty()
            && self.trends.is_empty()
            && self.clusters.is_empty()
            && self.outliers.is_empty()
            && self.key_value_bar_chart.is_none()
    }

    /// Convert back into the chart-relevant part of a [`DataInsights`].
    ///
    /// Sample counts and column statistics are not carried by charts and come
    /// back empty. Curating the result again yields the same chart sets.
    pub fn to_insights(&self) -> DataInsights {
        let key_value_pairs: Vec<KeyValuePair> = self
            .key_value_bar_chart
            .iter()
            .flatten()
            .map(|bar| KeyValuePair {
                key: bar.label.clone(),
                value: bar.value,
            })
            .collect();

        DataInsights {
            correlations: self.correlation_matrix.clone(),
            trends: self
                .trends
                .iter()
                .map(|trend| TrendSeries {
                    metric: trend.metric.clone(),
                    over: trend.over.clone(),
                    direction: trend.direction,
                    change: trend.change,
                    data_points: trend.points.clone(),
                })
                .collect(),
            clusters: self.clusters.clone(),
            outliers: self.outliers.clone(),
            is_key_value_structure: !key_value_pairs.is_empty(),
            key_value_pairs,
            ..DataInsights::default()
        }
    }

    /// Save charts as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_json(self, path.as_ref(), "charts")
    }

    /// Load charts, e.g. an externally generated override.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path.as_ref(), "charts")
    }
}
