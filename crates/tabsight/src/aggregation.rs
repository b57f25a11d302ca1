//! Merge per-shard insights into one.
//!
//! Merging is a best-effort summarization, not an exact reduction. Numeric
//! means, medians and standard deviations are averaged across shards without
//! weighting by shard size, so they are exact only for equal-size shards.
//! Minimum, maximum and counts combine exactly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TabsightError};
use crate::insight::{
    round_to, CategoricalStatistics, ColumnStatistic, CorrelationPair, DataInsights,
    NumericStatistics, OutlierRecord, TrendSeries,
};

/// Configuration for shard aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Outlier rows of shard `i` are offset by `i * outlier_row_offset`.
    pub outlier_row_offset: usize,
    /// Cap on merged outlier records.
    pub max_outliers: usize,
    /// Cap on points in a merged trend series.
    pub max_trend_points: usize,
    /// Frequent values kept per merged categorical column.
    pub top_values: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            outlier_row_offset: 1000,
            max_outliers: 20,
            max_trend_points: 50,
            top_values: 5,
        }
    }
}

/// Merges an ordered list of shard insights.
#[derive(Debug, Clone, Default)]
pub struct InsightAggregator {
    config: AggregationConfig,
}

impl InsightAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AggregationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Merge shards in order. Order only affects outlier row offsets and the
    /// first-seen order of columns and pairs.
    ///
    /// Returns [`TabsightError::Precondition`] when a shard describes a column
    /// that is missing from its own column list.
    pub fn aggregate(&self, shards: &[DataInsights]) -> Result<DataInsights> {
        for (index, shard) in shards.iter().enumerate() {
            check_shard(index, shard)?;
        }

        match shards {
            [] => return Ok(DataInsights::empty()),
            [single] => return Ok(single.clone()),
            _ => {}
        }

        let mut columns: Vec<String> = Vec::new();
        for shard in shards {
            extend_unique(&mut columns, &shard.columns);
        }

        let statistics = self.merge_statistics(shards);

        let mut numeric_columns = Vec::new();
        let mut categorical_columns = Vec::new();
        for shard in shards {
            extend_unique(&mut numeric_columns, &shard.numeric_columns);
            extend_unique(&mut categorical_columns, &shard.categorical_columns);
        }
        // A column classified differently across shards keeps its first kind.
        numeric_columns.retain(|c| statistics.get(c).is_none_or(ColumnStatistic::is_numeric));
        categorical_columns.retain(|c| statistics.get(c).is_none_or(|s| !s.is_numeric()));

        let key_value = agreed_key_value(shards);

        let merged = DataInsights {
            num_samples: shards.iter().map(|s| s.num_samples).sum(),
            columns,
            numeric_columns,
            categorical_columns,
            statistics,
            correlations: merge_correlations(shards),
            clusters: shards.iter().flat_map(|s| s.clusters.iter().cloned()).collect(),
            trends: self.merge_trends(shards),
            outliers: self.merge_outliers(shards),
            is_key_value_structure: key_value.is_some(),
            key_column: key_value.map(|(k, _)| k.to_string()),
            value_column: key_value.map(|(_, v)| v.to_string()),
            key_value_pairs: if key_value.is_some() {
                shards.iter().flat_map(|s| s.key_value_pairs.iter().cloned()).collect()
            } else {
                Vec::new()
            },
        };

        debug!(
            shards = shards.len(),
            samples = merged.num_samples,
            columns = merged.columns.len(),
            outliers = merged.outliers.len(),
            "Aggregated shard insights"
        );

        Ok(merged)
    }

    fn merge_statistics(&self, shards: &[DataInsights]) -> IndexMap<String, ColumnStatistic> {
        let mut merging: IndexMap<&str, StatisticMerge> = IndexMap::new();

        for shard in shards {
            for (column, stat) in &shard.statistics {
                match merging.get_mut(column.as_str()) {
                    Some(merge) => merge.add(stat),
                    None => {
                        merging.insert(column, StatisticMerge::start(stat));
                    }
                }
            }
        }

        merging
            .into_iter()
            .map(|(column, merge)| (column.to_string(), merge.finish(self.config.top_values)))
            .collect()
    }

    fn merge_trends(&self, shards: &[DataInsights]) -> Vec<TrendSeries> {
        let mut grouped: IndexMap<(String, String), Vec<_>> = IndexMap::new();
        for trend in shards.iter().flat_map(|s| &s.trends) {
            let (metric, over) = trend.key();
            grouped
                .entry((metric.to_string(), over.to_string()))
                .or_default()
                .extend(trend.data_points.iter().cloned());
        }

        grouped
            .into_iter()
            .filter_map(|((metric, over), mut points)| {
                points.sort_by(|a, b| a.date.cmp(&b.date));
                let mut series = TrendSeries::from_points(metric, over, points)?;
                series.data_points.truncate(self.config.max_trend_points);
                Some(series)
            })
            .collect()
    }

    fn merge_outliers(&self, shards: &[DataInsights]) -> Vec<OutlierRecord> {
        shards
            .iter()
            .enumerate()
            .flat_map(|(index, shard)| {
                let offset = index * self.config.outlier_row_offset;
                shard.outliers.iter().map(move |outlier| {
                    let mut outlier = outlier.clone();
                    outlier.row += offset;
                    outlier
                })
            })
            .take(self.config.max_outliers)
            .collect()
    }
}

/// Reject shards whose statistics or column lists name unknown columns.
fn check_shard(index: usize, shard: &DataInsights) -> Result<()> {
    let named = shard
        .statistics
        .keys()
        .chain(&shard.numeric_columns)
        .chain(&shard.categorical_columns);

    for column in named {
        if !shard.columns.contains(column) {
            return Err(TabsightError::Precondition(format!(
                "shard {} describes column '{}' which is not in its column list",
                index, column
            )));
        }
    }
    Ok(())
}

fn extend_unique(target: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

/// Key and value columns, when every shard is key-value and they all agree.
fn agreed_key_value(shards: &[DataInsights]) -> Option<(&str, &str)> {
    let mut agreed: Option<(&str, &str)> = None;
    for shard in shards {
        if !shard.is_key_value_structure {
            return None;
        }
        let pair = (shard.key_column.as_deref()?, shard.value_column.as_deref()?);
        match agreed {
            None => agreed = Some(pair),
            Some(existing) if existing != pair => return None,
            Some(_) => {}
        }
    }
    agreed
}

/// Average duplicate pairs, treating (x, y) and (y, x) as the same key.
fn merge_correlations(shards: &[DataInsights]) -> Vec<CorrelationPair> {
    let mut merged: Vec<(CorrelationPair, f64, usize)> = Vec::new();

    for pair in shards.iter().flat_map(|s| &s.correlations) {
        match merged.iter_mut().find(|(p, _, _)| p.connects(&pair.x, &pair.y)) {
            Some((_, sum, n)) => {
                *sum += pair.value;
                *n += 1;
            }
            None => merged.push((pair.clone(), pair.value, 1)),
        }
    }

    merged
        .into_iter()
        .map(|(mut pair, sum, n)| {
            pair.value = round_to(sum / n as f64, 3).clamp(-1.0, 1.0);
            pair
        })
        .collect()
}

/// Running merge of one column's statistics.
enum StatisticMerge {
    Numeric {
        count: usize,
        min: f64,
        max: f64,
        means: Vec<f64>,
        medians: Vec<f64>,
        stds: Vec<f64>,
    },
    Categorical {
        count: usize,
        unique: usize,
        frequencies: IndexMap<String, usize>,
    },
}

impl StatisticMerge {
    fn start(stat: &ColumnStatistic) -> Self {
        match stat {
            ColumnStatistic::Numeric(s) => StatisticMerge::Numeric {
                count: s.count,
                min: s.min,
                max: s.max,
                means: vec![s.mean],
                medians: vec![s.median],
                stds: vec![s.std],
            },
            ColumnStatistic::Categorical(s) => StatisticMerge::Categorical {
                count: s.count,
                unique: s.unique,
                frequencies: s.top_values.clone(),
            },
        }
    }

    /// Fold in another shard. Mismatched kinds are ignored.
    fn add(&mut self, stat: &ColumnStatistic) {
        match (self, stat) {
            (
                StatisticMerge::Numeric {
                    count,
                    min,
                    max,
                    means,
                    medians,
                    stds,
                },
                ColumnStatistic::Numeric(s),
            ) => {
                *count += s.count;
                *min = min.min(s.min);
                *max = max.max(s.max);
                means.push(s.mean);
                medians.push(s.median);
                stds.push(s.std);
            }
            (
                StatisticMerge::Categorical {
                    count,
                    unique,
                    frequencies,
                },
                ColumnStatistic::Categorical(s),
            ) => {
                *count += s.count;
                *unique = (*unique).max(s.unique);
                for (value, n) in &s.top_values {
                    *frequencies.entry(value.clone()).or_insert(0) += n;
                }
            }
            _ => {}
        }
    }

    fn finish(self, top_values: usize) -> ColumnStatistic {
        match self {
            StatisticMerge::Numeric {
                count,
                min,
                max,
                means,
                medians,
                stds,
            } => ColumnStatistic::Numeric(NumericStatistics {
                count,
                mean: average(&means),
                min,
                max,
                median: average(&medians),
                std: average(&stds),
            }),
            StatisticMerge::Categorical {
                count,
                unique,
                frequencies,
            } => {
                let unique = unique.max(frequencies.len());
                let mut ranked: Vec<(String, usize)> = frequencies.into_iter().collect();
                ranked.sort_by(|a, b| b.1.cmp(&a.1));
                ranked.truncate(top_values);
                ColumnStatistic::Categorical(CategoricalStatistics {
                    count,
                    unique,
                    top_values: ranked.into_iter().collect(),
                })
            }
        }
    }
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean.is_finite() {
        mean
    } else {
        values.iter().map(|v| v / n).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insight::TrendPoint;

    fn numeric(count: usize, mean: f64, min: f64, max: f64) -> ColumnStatistic {
        ColumnStatistic::Numeric(NumericStatistics {
            count,
            mean,
            min,
            max,
            median: mean,
            std: 1.0,
        })
    }

    fn shard(samples: usize) -> DataInsights {
        DataInsights {
            num_samples: samples,
            columns: vec!["v".into()],
            numeric_columns: vec!["v".into()],
            ..DataInsights::default()
        }
    }

    #[test]
    fn test_empty_and_single() {
        let aggregator = InsightAggregator::new();
        assert_eq!(aggregator.aggregate(&[]).unwrap(), DataInsights::empty());

        let one = shard(4);
        assert_eq!(aggregator.aggregate(std::slice::from_ref(&one)).unwrap(), one);
    }

    #[test]
    fn test_numeric_merge_is_unweighted() {
        let mut a = shard(2);
        a.statistics.insert("v".into(), numeric(2, 10.0, 5.0, 15.0));
        let mut b = shard(8);
        b.statistics.insert("v".into(), numeric(8, 20.0, 1.0, 30.0));

        let merged = InsightAggregator::new().aggregate(&[a, b]).unwrap();
        let stats = merged.statistics["v"].as_numeric().unwrap();

        assert_eq!(stats.count, 10);
        assert_eq!(stats.mean, 15.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 30.0);
    }

    #[test]
    fn test_numeric_merge_near_max_stays_finite() {
        let mut a = shard(3);
        a.statistics.insert("v".into(), numeric(3, 1.5e308, 1e308, 1.7e308));
        let mut b = shard(3);
        b.statistics.insert("v".into(), numeric(3, 1.5e308, 1e308, 1.7e308));

        let merged = InsightAggregator::new().aggregate(&[a, b]).unwrap();
        let stats = merged.statistics["v"].as_numeric().unwrap();

        assert!(stats.mean.is_finite());
        assert!((stats.mean / 1.5e308 - 1.0).abs() < 1e-12);
        assert!(stats.median.is_finite());
    }

    #[test]
    fn test_categorical_counts_summed() {
        let categorical = |pairs: &[(&str, usize)], unique| {
            ColumnStatistic::Categorical(CategoricalStatistics {
                count: pairs.iter().map(|p| p.1).sum(),
                unique,
                top_values: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            })
        };
        let mut a = shard(3);
        a.columns = vec!["c".into()];
        a.numeric_columns.clear();
        a.categorical_columns = vec!["c".into()];
        let mut b = a.clone();
        a.statistics.insert("c".into(), categorical(&[("x", 2), ("y", 1)], 2));
        b.statistics.insert("c".into(), categorical(&[("y", 3)], 1));

        let merged = InsightAggregator::new().aggregate(&[a, b]).unwrap();
        let stats = merged.statistics["c"].as_categorical().unwrap();

        assert_eq!(stats.count, 6);
        assert_eq!(stats.unique, 2);
        assert_eq!(stats.top_values.get_index(0), Some((&"y".to_string(), &4)));
    }

    #[test]
    fn test_correlations_averaged_across_orientation() {
        let mut a = shard(5);
        a.correlations.push(CorrelationPair {
            x: "a".into(),
            y: "b".into(),
            value: 0.8,
        });
        let mut b = shard(5);
        b.correlations.push(CorrelationPair {
            x: "b".into(),
            y: "a".into(),
            value: 0.6,
        });

        let merged = InsightAggregator::new().aggregate(&[a, b]).unwrap();
        assert_eq!(merged.correlations.len(), 1);
        assert_eq!(merged.correlation("a", "b"), Some(0.7));
    }

    #[test]
    fn test_outliers_offset_and_capped() {
        let outlier = |row| OutlierRecord {
            column: "v".into(),
            row,
            value: 99.0,
            deviation: 3.0,
        };
        let mut a = shard(5);
        a.outliers = (0..15).map(outlier).collect();
        let mut b = shard(5);
        b.outliers = (0..15).map(outlier).collect();

        let merged = InsightAggregator::new().aggregate(&[a, b]).unwrap();
        assert_eq!(merged.num_samples, 10);
        assert_eq!(merged.outliers.len(), 20);
        assert_eq!(merged.outliers[15].row, 1000);
    }

    #[test]
    fn test_trends_concatenated_and_recomputed() {
        let series = |points: &[(&str, f64)]| {
            TrendSeries::from_points(
                "amount",
                "date",
                points
                    .iter()
                    .map(|(d, v)| TrendPoint {
                        date: d.to_string(),
                        value: *v,
                    })
                    .collect(),
            )
            .unwrap()
        };
        let mut a = shard(2);
        a.trends.push(series(&[("2024-01-03", 30.0), ("2024-01-04", 40.0)]));
        let mut b = shard(2);
        b.trends.push(series(&[("2024-01-01", 10.0), ("2024-01-02", 20.0)]));

        let merged = InsightAggregator::new().aggregate(&[a, b]).unwrap();
        assert_eq!(merged.trends.len(), 1);
        assert_eq!(merged.trends[0].data_points.len(), 4);
        assert_eq!(merged.trends[0].data_points[0].date, "2024-01-01");
        assert_eq!(merged.trends[0].change, 300.0);
    }

    #[test]
    fn test_unknown_column_rejected() {
        let mut bad = shard(1);
        bad.statistics.insert("ghost".into(), numeric(1, 1.0, 1.0, 1.0));

        let err = InsightAggregator::new().aggregate(&[shard(1), bad]).unwrap_err();
        assert!(matches!(err, TabsightError::Precondition(_)));
    }

    #[test]
    fn test_kind_conflict_keeps_first() {
        let mut a = shard(3);
        a.statistics.insert("v".into(), numeric(3, 1.0, 0.0, 2.0));
        let mut b = shard(3);
        b.numeric_columns.clear();
        b.categorical_columns = vec!["v".into()];
        b.statistics.insert(
            "v".into(),
            ColumnStatistic::Categorical(CategoricalStatistics {
                count: 3,
                unique: 3,
                top_values: IndexMap::new(),
            }),
        );

        let merged = InsightAggregator::new().aggregate(&[a, b]).unwrap();
        assert!(merged.statistics["v"].is_numeric());
        assert_eq!(merged.numeric_columns, vec!["v"]);
        assert!(merged.categorical_columns.is_empty());
    }
}
