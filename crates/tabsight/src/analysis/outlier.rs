//! Z-score outlier flagging.

use indexmap::IndexMap;

use crate::insight::{ColumnStatistic, OutlierRecord};

use super::values::NumericColumn;

/// Bounds for outlier scanning.
#[derive(Debug, Clone, Copy)]
pub struct OutlierLimits {
    /// Flag values at least this many standard deviations from the mean.
    pub z_threshold: f64,
    /// Only the first rows of each column are scanned.
    pub scan_rows: usize,
    /// Global cap on records, first found first kept.
    pub max_records: usize,
}

/// Flag values far from their column mean.
///
/// Columns are visited in order and rows top-down, so the cap keeps the
/// earliest findings. Columns with zero spread are skipped.
pub fn detect_outliers(
    columns: &[NumericColumn],
    statistics: &IndexMap<String, ColumnStatistic>,
    limits: OutlierLimits,
) -> Vec<OutlierRecord> {
    let mut outliers = Vec::new();

    for column in columns {
        let Some(stats) = statistics.get(&column.name).and_then(ColumnStatistic::as_numeric) else {
            continue;
        };
        if stats.std <= 0.0 {
            continue;
        }

        for (row, value) in column.values.iter().take(limits.scan_rows).enumerate() {
            if outliers.len() >= limits.max_records {
                return outliers;
            }
            let Some(value) = *value else {
                continue;
            };

            let deviation = stats.z_score(value).abs();
            if deviation.is_finite() && deviation >= limits.z_threshold {
                outliers.push(OutlierRecord {
                    column: column.name.clone(),
                    row,
                    value,
                    deviation,
                });
            }
        }
    }

    outliers.truncate(limits.max_records);
    outliers
}
