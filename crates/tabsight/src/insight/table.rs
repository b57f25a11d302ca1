//! Dataset-level insight structure.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::column::ColumnStatistic;

/// Pearson correlation between two numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub x: String,
    pub y: String,
    /// Coefficient in [-1, 1], rounded to three decimals.
    pub value: f64,
}

impl CorrelationPair {
    /// True when this pair relates the two named columns, in either order.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.x == a && self.y == b) || (self.x == b && self.y == a)
    }
}

/// One input point and the cluster it was assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterPoint {
    pub x: f64,
    pub y: f64,
    /// Cluster label: "A", "B", "C", ...
    pub cluster: String,
}

/// A value far from its column mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierRecord {
    pub column: String,
    /// Zero-based row index (offset by shard when aggregated).
    pub row: usize,
    pub value: f64,
    /// |value - mean| / std.
    pub deviation: f64,
}

/// Direction of a trend between its first and last points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl TrendDirection {
    /// Increasing only when the last value is strictly greater than the first.
    pub fn between(first: f64, last: f64) -> Self {
        if last > first {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
        }
    }
}

/// One point of a trend series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub value: f64,
}

/// A metric followed over a genuine time column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    /// Numeric column being followed.
    pub metric: String,
    /// Time column name.
    pub over: String,
    pub direction: TrendDirection,
    /// Percent change from first to last point, two decimals; 0 when the
    /// first value is 0.
    pub change: f64,
    pub data_points: Vec<TrendPoint>,
}

impl TrendSeries {
    /// Build a series from date-sorted points, deriving direction and change.
    ///
    /// Returns `None` for fewer than two points.
    pub fn from_points(
        metric: impl Into<String>,
        over: impl Into<String>,
        data_points: Vec<TrendPoint>,
    ) -> Option<Self> {
        let (first, last) = match data_points.as_slice() {
            [first, .., last] => (first.value, last.value),
            _ => return None,
        };

        Some(Self {
            metric: metric.into(),
            over: over.into(),
            direction: TrendDirection::between(first, last),
            change: percent_change(first, last),
            data_points,
        })
    }

    /// The (metric, over) pair identifying this series across shards.
    pub fn key(&self) -> (&str, &str) {
        (&self.metric, &self.over)
    }
}

/// Percent change rounded to two decimals.
pub(crate) fn percent_change(first: f64, last: f64) -> f64 {
    if first == 0.0 {
        0.0
    } else {
        let change = (last - first) / first * 100.0;
        if change.is_finite() { round_to(change, 2) } else { 0.0 }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value
    }
}

/// A named metric from a key-value structured dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: f64,
}

/// Raw statistical summary of one dataset or shard.
///
/// Constructed fresh per input and never mutated once returned; merging
/// shards produces a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataInsights {
    pub num_samples: usize,
    /// Every column of the input, in header order.
    pub columns: Vec<String>,
    #[serde(default)]
    pub numeric_columns: Vec<String>,
    #[serde(default)]
    pub categorical_columns: Vec<String>,
    /// Statistics for columns that had at least one usable value.
    #[serde(default)]
    pub statistics: IndexMap<String, ColumnStatistic>,
    #[serde(default)]
    pub correlations: Vec<CorrelationPair>,
    #[serde(default)]
    pub clusters: Vec<ClusterPoint>,
    #[serde(default)]
    pub trends: Vec<TrendSeries>,
    #[serde(default)]
    pub outliers: Vec<OutlierRecord>,
    #[serde(rename = "isKeyValueStructure", default)]
    pub is_key_value_structure: bool,
    #[serde(rename = "keyColumn", default)]
    pub key_column: Option<String>,
    #[serde(rename = "valueColumn", default)]
    pub value_column: Option<String>,
    #[serde(rename = "keyValuePairs", default)]
    pub key_value_pairs: Vec<KeyValuePair>,
}

impl DataInsights {
    /// The zero-value insight: no samples, every list empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no samples were analyzed.
    pub fn is_empty(&self) -> bool {
        self.num_samples == 0
    }

    /// Find the correlation between two columns, in either order.
    pub fn correlation(&self, a: &str, b: &str) -> Option<f64> {
        self.correlations
            .iter()
            .find(|pair| pair.connects(a, b))
            .map(|pair| pair.value)
    }

    /// Distinct cluster labels, in first-seen order.
    pub fn cluster_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for point in &self.clusters {
            if !labels.contains(&point.cluster.as_str()) {
                labels.push(&point.cluster);
            }
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[f64]) -> Vec<TrendPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| TrendPoint {
                date: format!("2024-01-{:02}", i + 1),
                value,
            })
            .collect()
    }

    #[test]
    fn test_trend_from_points() {
        let series = TrendSeries::from_points("cost", "date", points(&[50.0, 60.0, 75.0])).unwrap();
        assert_eq!(series.direction, TrendDirection::Increasing);
        assert_eq!(series.change, 50.0);

        let flat = TrendSeries::from_points("cost", "date", points(&[5.0, 5.0])).unwrap();
        assert_eq!(flat.direction, TrendDirection::Decreasing);

        assert!(TrendSeries::from_points("cost", "date", points(&[1.0])).is_none());
    }

    #[test]
    fn test_percent_change_from_zero() {
        assert_eq!(percent_change(0.0, 10.0), 0.0);
        assert_eq!(percent_change(3.0, 1.0), -66.67);
        assert_eq!(percent_change(-1e308, 1e308), 0.0);
        assert_eq!(round_to(1e307, 2), 1e307);
    }

    #[test]
    fn test_empty_serializes_every_list() {
        let json = serde_json::to_value(DataInsights::empty()).unwrap();
        assert_eq!(json["num_samples"], 0);
        assert_eq!(json["correlations"], serde_json::json!([]));
        assert_eq!(json["isKeyValueStructure"], false);
        assert!(json["keyColumn"].is_null());
    }
}
