//! Chart curation: raw insights in, rendering-safe charts out.

mod curator;
mod types;

pub use curator::{ChartCurator, CurationConfig};
pub use types::{ChartSummary, ChartTrend, ChartsData, KeyValueBar};
