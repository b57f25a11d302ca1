//! Column classification and summary statistics.

use indexmap::IndexMap;

use crate::input::DataTable;
use crate::insight::{CategoricalStatistics, ColumnStatistic, NumericStatistics};

use super::values::{parse_numeric, usable, NumericMode};

// =============================================================================
// STREAMING STATISTICS
// =============================================================================
// Welford's online algorithm for computing mean and variance in a single pass.

/// Streaming accumulator for mean, population variance and range.
#[derive(Debug, Clone)]
struct StreamingStats {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
    min: f64,
    max: f64,
}

impl StreamingStats {
    fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Population variance; zero for fewer than two values.
    fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    fn std(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Compute numeric statistics over parsed values.
///
/// The median is the lower middle element of the sorted values.
pub fn compute_numeric_stats(values: &[f64]) -> NumericStatistics {
    if values.is_empty() {
        return NumericStatistics {
            count: 0,
            mean: 0.0,
            min: 0.0,
            max: 0.0,
            median: 0.0,
            std: 0.0,
        };
    }

    let mut stats = StreamingStats::new();
    for &value in values {
        stats.add(value);
    }
    let (mean, std) = if stats.mean.is_finite() && stats.std().is_finite() {
        (stats.mean, stats.std())
    } else {
        scaled_moments(values)
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = sorted[(sorted.len() - 1) / 2];

    NumericStatistics {
        count: stats.count,
        mean,
        min: stats.min,
        max: stats.max,
        median,
        std,
    }
}

/// Mean and std for values whose differences overflow `f64`.
///
/// Runs the accumulator on values scaled into [-1, 1]; both results are
/// bounded by the largest magnitude, so scaling back stays finite.
fn scaled_moments(values: &[f64]) -> (f64, f64) {
    let scale = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return (0.0, 0.0);
    }

    let mut stats = StreamingStats::new();
    for &value in values {
        stats.add(value / scale);
    }

    let mean = stats.mean * scale;
    let std = stats.std() * scale;
    (
        if mean.is_finite() { mean } else { 0.0 },
        if std.is_finite() { std } else { 0.0 },
    )
}

/// Classifies columns and computes their statistics.
#[derive(Debug, Clone)]
pub struct StatisticalAnalyzer {
    /// Share of usable values that must parse for a column to be numeric.
    numeric_ratio: f64,
    /// How many frequent values to keep for categorical columns.
    top_values: usize,
}

impl StatisticalAnalyzer {
    pub fn new(numeric_ratio: f64, top_values: usize) -> Self {
        Self {
            numeric_ratio,
            top_values,
        }
    }

    /// Analyze one column.
    ///
    /// Returns `None` when the column has no usable values; such columns are
    /// absent from every output.
    pub fn analyze_column(
        &self,
        table: &DataTable,
        col_index: usize,
        mode: NumericMode,
    ) -> Option<ColumnStatistic> {
        let values: Vec<&str> = table.column_values(col_index).filter_map(usable).collect();
        self.analyze_values(&values, mode)
    }

    /// Classify already-cleaned values and summarize them.
    pub fn analyze_values(&self, values: &[&str], mode: NumericMode) -> Option<ColumnStatistic> {
        if values.is_empty() {
            return None;
        }

        let numeric: Vec<f64> = values
            .iter()
            .filter_map(|v| parse_numeric(v, mode))
            .collect();

        let required = (values.len() as f64 * self.numeric_ratio).max(1.0);
        if numeric.len() as f64 >= required {
            Some(ColumnStatistic::Numeric(compute_numeric_stats(&numeric)))
        } else {
            Some(ColumnStatistic::Categorical(self.categorical_stats(values)))
        }
    }

    fn categorical_stats(&self, values: &[&str]) -> CategoricalStatistics {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for &value in values {
            *counts.entry(value).or_insert(0) += 1;
        }
        let unique = counts.len();

        // Stable sort keeps first-appearance order among ties.
        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        CategoricalStatistics {
            count: values.len(),
            unique,
            top_values: ranked
                .into_iter()
                .take(self.top_values)
                .map(|(value, count)| (value.to_string(), count))
                .collect(),
        }
    }
}

impl Default for StatisticalAnalyzer {
    fn default() -> Self {
        Self::new(0.5, 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> DataTable {
        DataTable::new(
            headers.into_iter().map(String::from).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
    }

    fn analyze(values: &[&str]) -> Option<ColumnStatistic> {
        StatisticalAnalyzer::default().analyze_values(values, NumericMode::Standard)
    }

    #[test]
    fn test_numeric_statistics() {
        let stats = compute_numeric_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);

        assert_eq!(stats.count, 8);
        assert!((stats.mean - 5.0).abs() < 1e-9);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert!((stats.std - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_magnitudes_stay_finite() {
        let stats = compute_numeric_stats(&[1e308, -1e308, 5.0]);

        assert!(stats.mean.is_finite());
        assert!(stats.std.is_finite());
        assert!((stats.mean - 5.0 / 3.0).abs() < 1e-6);
        assert!((stats.std / 1e308 - (2.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert_eq!(stats.min, -1e308);
        assert_eq!(stats.max, 1e308);
    }

    #[test]
    fn test_median_takes_lower_middle() {
        assert_eq!(compute_numeric_stats(&[4.0, 1.0, 3.0, 2.0]).median, 2.0);
        assert_eq!(compute_numeric_stats(&[5.0, 1.0, 3.0]).median, 3.0);
    }

    #[test]
    fn test_single_value_has_zero_std() {
        let stats = compute_numeric_stats(&[42.0]);
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.median, 42.0);
    }

    #[test]
    fn test_half_numeric_is_numeric() {
        let stat = analyze(&["1", "2", "x", "y"]).unwrap();
        let numeric = stat.as_numeric().unwrap();
        assert_eq!(numeric.count, 2);
        assert_eq!(numeric.mean, 1.5);
    }

    #[test]
    fn test_mostly_text_is_categorical() {
        let stat = analyze(&["red", "blue", "red", "7", "green", "red", "blue"]).unwrap();
        let cat = stat.as_categorical().unwrap();

        assert_eq!(cat.count, 7);
        assert_eq!(cat.unique, 4);
        let top: Vec<(&String, &usize)> = cat.top_values.iter().collect();
        assert_eq!(top[0], (&"red".to_string(), &3));
        assert_eq!(top[1], (&"blue".to_string(), &2));
        // Ties keep first-appearance order.
        assert_eq!(top[2].0, "7");
        assert_eq!(top[3].0, "green");
    }

    #[test]
    fn test_top_values_capped_at_five() {
        let stat = analyze(&["a", "b", "c", "d", "e", "f", "g"]).unwrap();
        assert_eq!(stat.as_categorical().unwrap().top_values.len(), 5);
    }

    #[test]
    fn test_null_only_column_skipped() {
        let table = make_table(vec!["v"], vec![vec!["null"], vec![""], vec!["NaN"]]);
        let analyzer = StatisticalAnalyzer::default();
        assert!(analyzer.analyze_column(&table, 0, NumericMode::Standard).is_none());
    }

    #[test]
    fn test_formatted_currency_column() {
        let table = make_table(
            vec!["price"],
            vec![vec!["$1,000"], vec!["$2,000"], vec!["n/a"]],
        );
        let stat = StatisticalAnalyzer::default()
            .analyze_column(&table, 0, NumericMode::Standard)
            .unwrap();
        let numeric = stat.as_numeric().unwrap();
        assert_eq!(numeric.count, 2);
        assert_eq!(numeric.mean, 1500.0);
    }
}
