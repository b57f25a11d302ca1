//! Deterministic narrative built from the numbers alone.

use crate::error::Result;
use crate::insight::TrendDirection;

use super::generator::{Narrative, NarrativeGenerator, NarrativeRequest};

/// Narrator that writes fixed sentences from insights and charts.
///
/// Useful offline and in tests; it never overrides charts.
pub struct TemplateNarrator {
    max_insights: usize,
}

impl TemplateNarrator {
    pub fn new() -> Self {
        Self { max_insights: 5 }
    }

    /// Cap the number of findings.
    pub fn with_max_insights(max_insights: usize) -> Self {
        Self { max_insights }
    }
}

impl Default for TemplateNarrator {
    fn default() -> Self {
        Self::new()
    }
}

impl NarrativeGenerator for TemplateNarrator {
    fn generate(&self, request: &NarrativeRequest<'_>) -> Result<Narrative> {
        let insights = request.insights;
        let charts = request.charts;

        if insights.is_empty() {
            return Ok(Narrative {
                headline: "No analyzable data found".to_string(),
                ..Narrative::default()
            });
        }

        let mut findings = Vec::new();

        let headline = if insights.is_key_value_structure {
            let key = insights.key_column.as_deref().unwrap_or("key");
            let bars = charts.key_value_bar_chart.as_deref().unwrap_or_default();
            if let Some(top) = bars.iter().max_by(|a, b| a.value.total_cmp(&b.value)) {
                findings.push(format!("'{}' has the highest value ({})", top.label, top.value));
            }
            format!("{} named metrics by '{}'", insights.key_value_pairs.len(), key)
        } else {
            format!(
                "{} rows across {} columns ({} numeric, {} categorical)",
                insights.num_samples,
                insights.columns.len(),
                insights.numeric_columns.len(),
                insights.categorical_columns.len()
            )
        };

        let mut strong: Vec<_> = charts
            .correlation_matrix
            .iter()
            .filter(|pair| pair.value.abs() > 0.5)
            .collect();
        strong.sort_by(|a, b| b.value.abs().total_cmp(&a.value.abs()));
        for pair in strong {
            let sign = if pair.value > 0.0 { "positively" } else { "negatively" };
            findings.push(format!(
                "'{}' and '{}' are strongly {} correlated (r = {:.3})",
                pair.x, pair.y, sign, pair.value
            ));
        }

        for trend in &charts.trends {
            let verb = match trend.direction {
                TrendDirection::Increasing => "rose",
                TrendDirection::Decreasing => "fell",
            };
            findings.push(format!(
                "'{}' {} by {:.2}% over '{}'",
                trend.metric,
                verb,
                trend.change.abs(),
                trend.over
            ));
        }

        if let Some(first) = charts.outliers.first() {
            findings.push(format!(
                "{} outlier value(s) found, the first in '{}' at row {}",
                charts.outliers.len(),
                first.column,
                first.row
            ));
        }

        if !charts.clusters.is_empty() {
            let mut labels: Vec<&str> = charts.clusters.iter().map(|c| c.cluster.as_str()).collect();
            labels.sort_unstable();
            labels.dedup();
            findings.push(format!(
                "{} points fall into {} groups",
                charts.clusters.len(),
                labels.len()
            ));
        }

        findings.truncate(self.max_insights);

        Ok(Narrative {
            headline,
            insights: findings,
            charts: None,
        })
    }

    fn name(&self) -> &str {
        "template"
    }
}
