//! Per-column statistics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Summary statistics for one column, tagged by classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnStatistic {
    Numeric(NumericStatistics),
    Categorical(CategoricalStatistics),
}

impl ColumnStatistic {
    /// Returns true for numeric columns.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnStatistic::Numeric(_))
    }

    /// Number of values that contributed to the statistic.
    pub fn count(&self) -> usize {
        match self {
            ColumnStatistic::Numeric(stats) => stats.count,
            ColumnStatistic::Categorical(stats) => stats.count,
        }
    }

    pub fn as_numeric(&self) -> Option<&NumericStatistics> {
        match self {
            ColumnStatistic::Numeric(stats) => Some(stats),
            ColumnStatistic::Categorical(_) => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&CategoricalStatistics> {
        match self {
            ColumnStatistic::Categorical(stats) => Some(stats),
            ColumnStatistic::Numeric(_) => None,
        }
    }
}

/// Statistics for numeric columns.
///
/// `std` is the population standard deviation (divides by N). `median` is the
/// lower middle element for even-length columns; the two middle values are
/// not averaged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    /// Number of values that parsed as numbers.
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub std: f64,
}

impl NumericStatistics {
    /// Calculate the z-score for a value.
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            0.0
        } else {
            (value - self.mean) / self.std
        }
    }
}

/// Statistics for categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStatistics {
    /// Number of usable (non-empty, non-null) values.
    pub count: usize,
    /// Number of distinct values.
    pub unique: usize,
    /// Up to five most frequent values, most frequent first; ties keep
    /// first-appearance order.
    pub top_values: IndexMap<String, usize>,
}
