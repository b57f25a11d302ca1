//! Statistical extraction: column statistics, correlations, clusters,
//! trends, outliers and key-value detection.

mod analyzer;
mod clustering;
mod correlation;
mod key_value;
mod outlier;
mod statistical;
mod trend;
mod values;

pub use analyzer::{AnalyzerConfig, InsightAnalyzer};
pub use clustering::{assign_clusters, cluster_label};
pub use correlation::{correlate, pearson};
pub use key_value::{KeyValueDetection, KeyValueDetector};
pub use outlier::{detect_outliers, OutlierLimits};
pub use statistical::{compute_numeric_stats, StatisticalAnalyzer};
pub use trend::{detect_trend, find_time_column, normalize_date};
pub use values::{parse_numeric, usable, NumericColumn, NumericMode};
