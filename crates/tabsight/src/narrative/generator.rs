//! Narrative generator trait and types.

use serde::{Deserialize, Serialize};

use crate::charts::ChartsData;
use crate::error::Result;
use crate::input::Record;
use crate::insight::DataInsights;

/// Everything a generator may look at.
#[derive(Debug, Clone, Serialize)]
pub struct NarrativeRequest<'a> {
    /// Raw insights for the whole dataset.
    pub insights: &'a DataInsights,

    /// Curated charts.
    pub charts: &'a ChartsData,

    /// A few original rows, for grounding.
    pub sample_rows: Vec<Record>,
}

impl<'a> NarrativeRequest<'a> {
    /// Create a request without sample rows.
    pub fn new(insights: &'a DataInsights, charts: &'a ChartsData) -> Self {
        Self {
            insights,
            charts,
            sample_rows: Vec::new(),
        }
    }

    /// Attach sample rows.
    pub fn with_samples(mut self, rows: Vec<Record>) -> Self {
        self.sample_rows = rows;
        self
    }

    /// Compact JSON payload, e.g. for a prompt.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A written summary of one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Narrative {
    /// One-line summary.
    pub headline: String,

    /// Individual findings, most important first.
    #[serde(default)]
    pub insights: Vec<String>,

    /// Charts the generator wants shown instead of the curated ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts: Option<ChartsData>,
}

/// Trait for narrative generators.
///
/// Implementations must be thread-safe (Send + Sync) to allow
/// sharing across analyses.
pub trait NarrativeGenerator: Send + Sync {
    /// Describe the analysis in prose.
    ///
    /// A returned `charts` override is passed through
    /// [`ChartCurator::accept_override`](crate::charts::ChartCurator::accept_override)
    /// before it replaces the curated charts.
    fn generate(&self, request: &NarrativeRequest<'_>) -> Result<Narrative>;

    /// Get the name of this generator (for logging/debugging).
    fn name(&self) -> &str;
}
