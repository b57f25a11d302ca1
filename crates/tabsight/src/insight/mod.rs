//! Insight types: the raw statistical summary of a dataset.

mod column;
mod table;

pub use column::{CategoricalStatistics, ColumnStatistic, NumericStatistics};
pub use table::{
    ClusterPoint, CorrelationPair, DataInsights, KeyValuePair, OutlierRecord, TrendDirection,
    TrendPoint, TrendSeries,
};

pub(crate) use table::round_to;
