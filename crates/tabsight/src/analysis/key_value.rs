//! Detection of two-column datasets that are named metrics rather than samples.

use std::collections::HashSet;

use tracing::debug;

use crate::input::DataTable;
use crate::insight::KeyValuePair;

use super::values::{parse_numeric, usable, NumericMode};

/// Result of a positive key-value detection.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueDetection {
    pub key_column: String,
    pub value_column: String,
    pub pairs: Vec<KeyValuePair>,
}

/// Shape of one column as seen by the detector.
#[derive(Debug, Clone, Copy)]
struct ColumnShape {
    distinct_ratio: f64,
    numeric_ratio: f64,
}

impl ColumnShape {
    fn measure(table: &DataTable, index: usize) -> Self {
        let values: Vec<&str> = table.column_values(index).filter_map(usable).collect();
        if values.is_empty() {
            return Self {
                distinct_ratio: 0.0,
                numeric_ratio: 0.0,
            };
        }

        let distinct: HashSet<&str> = values.iter().copied().collect();
        let numeric = values
            .iter()
            .filter(|v| parse_numeric(v, NumericMode::KeyValue).is_some())
            .count();

        Self {
            distinct_ratio: distinct.len() as f64 / values.len() as f64,
            numeric_ratio: numeric as f64 / values.len() as f64,
        }
    }
}

/// Decides whether a two-column table is a set of named metrics.
#[derive(Debug, Clone)]
pub struct KeyValueDetector {
    /// Minimum distinct ratio of the key column.
    key_distinct_ratio: f64,
    /// The key column must be less numeric than this.
    key_max_numeric_ratio: f64,
    /// Minimum numeric ratio of the value column.
    value_min_numeric_ratio: f64,
}

impl KeyValueDetector {
    pub fn new(
        key_distinct_ratio: f64,
        key_max_numeric_ratio: f64,
        value_min_numeric_ratio: f64,
    ) -> Self {
        Self {
            key_distinct_ratio,
            key_max_numeric_ratio,
            value_min_numeric_ratio,
        }
    }

    /// Detect a key-value structure.
    ///
    /// Only tables with exactly two columns qualify. The key column must look
    /// like a set of names (mostly distinct, mostly non-numeric) and the value
    /// column must be mostly numeric. The first column is tried as key before
    /// the second.
    pub fn detect(&self, table: &DataTable) -> Option<KeyValueDetection> {
        if table.column_count() != 2 || table.row_count() == 0 {
            return None;
        }

        let shapes = [ColumnShape::measure(table, 0), ColumnShape::measure(table, 1)];

        let (key, value) = if self.is_key(shapes[0]) && self.is_value(shapes[1]) {
            (0, 1)
        } else if self.is_key(shapes[1]) && self.is_value(shapes[0]) {
            (1, 0)
        } else {
            return None;
        };

        let pairs: Vec<KeyValuePair> = table
            .rows
            .iter()
            .filter_map(|row| {
                let name = usable(&row[key])?;
                let value = parse_numeric(&row[value], NumericMode::KeyValue)?;
                Some(KeyValuePair {
                    key: name.to_string(),
                    value,
                })
            })
            .collect();

        if pairs.is_empty() {
            return None;
        }

        debug!(
            key_column = %table.headers[key],
            value_column = %table.headers[value],
            pairs = pairs.len(),
            "Detected key-value structure"
        );

        Some(KeyValueDetection {
            key_column: table.headers[key].clone(),
            value_column: table.headers[value].clone(),
            pairs,
        })
    }

    fn is_key(&self, shape: ColumnShape) -> bool {
        shape.distinct_ratio >= self.key_distinct_ratio
            && shape.numeric_ratio < self.key_max_numeric_ratio
    }

    fn is_value(&self, shape: ColumnShape) -> bool {
        shape.numeric_ratio >= self.value_min_numeric_ratio
    }
}

impl Default for KeyValueDetector {
    fn default() -> Self {
        Self::new(0.8, 0.5, 0.5)
    }
}
