//! Property-based tests for the insight engine.
//!
//! These tests use proptest to generate random inputs and verify that
//! analysis and curation maintain their invariants under all conditions.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p tabsight --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p tabsight --test property_tests
//! ```

use proptest::prelude::*;

use tabsight::analysis::{assign_clusters, pearson};
use tabsight::{ChartCurator, DataInsights, InsightAggregator, InsightAnalyzer, Parser};

// =============================================================================
// Test Strategies
// =============================================================================

/// A single cell: mostly numbers, sometimes blanks, null tokens or words.
fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => (-1000.0f64..1000.0).prop_map(|v| format!("{:.2}", v)),
        1 => Just(String::new()),
        1 => prop_oneof![Just("null"), Just("NaN"), Just("none")].prop_map(String::from),
        1 => "[a-z]{1,5}",
        1 => (0u32..100_000).prop_map(|v| format!("${}", v)),
    ]
}

/// CSV text with 1-4 columns and 0-60 rows.
fn csv_text() -> impl Strategy<Value = String> {
    (1usize..=4).prop_flat_map(|cols| {
        prop::collection::vec(prop::collection::vec(cell(), cols), 0..60).prop_map(move |rows| {
            let headers: Vec<String> = (0..cols).map(|i| format!("col{}", i)).collect();
            let mut text = headers.join(",");
            text.push('\n');
            for row in rows {
                text.push_str(&row.join(","));
                text.push('\n');
            }
            text
        })
    })
}

/// CSV text with a real date column.
fn dated_csv() -> impl Strategy<Value = String> {
    prop::collection::vec((1u32..=28, 1u32..=12, -500.0f64..500.0), 2..40).prop_map(|rows| {
        let mut text = String::from("event_date,amount,other\n");
        for (i, (day, month, amount)) in rows.into_iter().enumerate() {
            text.push_str(&format!("2024-{:02}-{:02},{:.1},{}\n", month, day, amount, i));
        }
        text
    })
}

fn points() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 0..80)
}

fn analyze(text: &str) -> DataInsights {
    InsightAnalyzer::new().analyze(&Parser::new().parse_str(text))
}

fn check_invariants(insights: &DataInsights) {
    for column in insights.statistics.keys() {
        assert!(insights.columns.contains(column));
    }
    for pair in &insights.correlations {
        assert!((-1.0..=1.0).contains(&pair.value), "correlation {}", pair.value);
    }
    for outlier in &insights.outliers {
        assert!(outlier.deviation >= 2.0, "deviation {}", outlier.deviation);
    }
    assert!(insights.outliers.len() <= 10);
    for trend in &insights.trends {
        assert!(trend.data_points.len() <= 50);
        assert!(trend.data_points.len() >= 2);
    }
}

// =============================================================================
// Analysis properties
// =============================================================================

proptest! {
    #[test]
    fn analysis_never_panics_on_bytes(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let table = Parser::new().parse_bytes(&bytes);
        let insights = InsightAnalyzer::new().analyze(&table);
        check_invariants(&insights);
    }

    #[test]
    fn analysis_invariants_hold(text in csv_text()) {
        let insights = analyze(&text);
        check_invariants(&insights);
        prop_assert_eq!(insights.columns.len() > 0, insights.num_samples > 0);
    }

    #[test]
    fn analysis_is_deterministic(text in csv_text()) {
        prop_assert_eq!(analyze(&text), analyze(&text));
    }

    #[test]
    fn trends_are_sorted_by_date(text in dated_csv()) {
        let insights = analyze(&text);
        check_invariants(&insights);
        prop_assert_eq!(insights.trends.len(), 1);
        let dates: Vec<&str> = insights.trends[0].data_points.iter().map(|p| p.date.as_str()).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        prop_assert_eq!(dates, sorted);
    }

    #[test]
    fn key_value_tables_have_no_trends_or_clusters(text in csv_text()) {
        let insights = analyze(&text);
        if insights.is_key_value_structure {
            prop_assert!(insights.trends.is_empty());
            prop_assert!(insights.clusters.is_empty());
            prop_assert!(insights.key_column.is_some());
        } else {
            prop_assert!(insights.key_value_pairs.is_empty());
        }
    }
}

// =============================================================================
// Engine properties
// =============================================================================

proptest! {
    #[test]
    fn correlation_is_symmetric(pairs in points()) {
        let swapped: Vec<(f64, f64)> = pairs.iter().map(|&(x, y)| (y, x)).collect();
        match (pearson(&pairs), pearson(&swapped)) {
            (Some(a), Some(b)) => {
                prop_assert!((a - b).abs() < 1e-12);
                prop_assert!(a.abs() <= 1.0 + 1e-9);
            }
            (None, None) => {}
            (a, b) => prop_assert!(false, "asymmetric: {:?} vs {:?}", a, b),
        }
    }

    #[test]
    fn clustering_preserves_points(pts in points(), k in 1usize..6) {
        let clusters = assign_clusters(&pts, k);
        prop_assert_eq!(clusters.len(), pts.len());

        let mut labels: Vec<&str> = clusters.iter().map(|c| c.cluster.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        prop_assert!(labels.len() <= k.max(1));

        for (point, cluster) in pts.iter().zip(&clusters) {
            prop_assert_eq!(point.0, cluster.x);
            prop_assert_eq!(point.1, cluster.y);
        }
    }
}

// =============================================================================
// Curation and aggregation properties
// =============================================================================

proptest! {
    #[test]
    fn curation_is_idempotent(text in csv_text()) {
        let curator = ChartCurator::new();
        let first = curator.curate(&analyze(&text));
        let second = curator.curate(&first.to_insights());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn curated_summary_matches_lists(text in csv_text()) {
        let charts = ChartCurator::new().curate(&analyze(&text));
        prop_assert!(charts.correlation_matrix.iter().all(|p| p.value.abs() > 0.1));
        prop_assert!(charts.summary.strong_correlations <= charts.correlation_matrix.len());
        prop_assert_eq!(charts.summary.outliers_count, charts.outliers.len());
        if let Some(bars) = &charts.key_value_bar_chart {
            prop_assert!(!bars.is_empty());
        }
    }

    #[test]
    fn aggregation_sums_samples(texts in prop::collection::vec(csv_text(), 0..5)) {
        let shards: Vec<DataInsights> = texts.iter().map(|t| analyze(t)).collect();
        let merged = InsightAggregator::new().aggregate(&shards).unwrap();

        let expected: usize = shards.iter().map(|s| s.num_samples).sum();
        prop_assert_eq!(merged.num_samples, expected);
        prop_assert!(merged.outliers.len() <= 20);
        for column in merged.statistics.keys() {
            prop_assert!(merged.columns.contains(column));
        }
    }
}
