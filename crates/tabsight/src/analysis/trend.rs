//! Trends over a genuine time column.
//!
//! A trend is only produced when a column *named* like a timestamp exists.
//! Row position is never used as a time axis.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::input::DataTable;
use crate::insight::{TrendPoint, TrendSeries};

use super::values::{usable, NumericColumn};

/// Substrings marking a column as time-like.
const TIME_HINTS: &[&str] = &[
    "date", "time", "at", "granted", "expires", "hour", "timestamp", "created", "updated",
];

/// Substrings marking a numeric column as a good trend metric.
const METRIC_HINTS: &[&str] = &[
    "rate", "total", "success", "amount", "cost", "time", "value", "count", "sum",
];

static ISO_DATETIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})[T ]\d{2}:\d{2}").unwrap());

/// First column whose name contains a time hint.
pub fn find_time_column(headers: &[String]) -> Option<&str> {
    headers
        .iter()
        .find(|h| {
            let lower = h.to_lowercase();
            TIME_HINTS.iter().any(|hint| lower.contains(hint))
        })
        .map(String::as_str)
}

/// Pick the metric to follow: the first column with a metric hint, else the
/// first column. The time column itself is never its own metric.
fn pick_metric<'a>(numeric: &'a [NumericColumn], time_column: &str) -> Option<&'a NumericColumn> {
    let candidates: Vec<&NumericColumn> =
        numeric.iter().filter(|c| c.name != time_column).collect();

    candidates
        .iter()
        .find(|c| {
            let lower = c.name.to_lowercase();
            METRIC_HINTS.iter().any(|hint| lower.contains(hint))
        })
        .or_else(|| candidates.first())
        .copied()
}

/// Reduce an ISO timestamp to its date portion; other values pass through.
pub fn normalize_date(value: &str) -> String {
    if let Some(caps) = ISO_DATETIME.captures(value) {
        let date = &caps[1];
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
            return date.to_string();
        }
    }
    value.to_string()
}

/// Detect a trend for the table.
///
/// Points are sorted lexicographically by date string (stable for equal
/// dates). Direction and percent change compare the first and last points of
/// the full series; the stored points are then capped at `max_points`.
pub fn detect_trend(
    table: &DataTable,
    numeric: &[NumericColumn],
    max_points: usize,
) -> Option<TrendSeries> {
    let time_column = find_time_column(&table.headers)?;
    let time_index = table.column_index(time_column)?;
    let metric = pick_metric(numeric, time_column)?;

    let mut points: Vec<TrendPoint> = table
        .column_values(time_index)
        .zip(&metric.values)
        .filter_map(|(time, value)| {
            let time = usable(time)?;
            Some(TrendPoint {
                date: normalize_date(time),
                value: (*value)?,
            })
        })
        .collect();

    points.sort_by(|a, b| a.date.cmp(&b.date));

    let mut series = TrendSeries::from_points(&metric.name, time_column, points)?;
    series.data_points.truncate(max_points);

    debug!(
        metric = %series.metric,
        over = %series.over,
        direction = %series.direction,
        points = series.data_points.len(),
        "Detected trend"
    );

    Some(series)
}
