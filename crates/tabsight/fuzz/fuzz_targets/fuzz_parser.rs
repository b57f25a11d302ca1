//! Fuzz target for the parse, analyze and curate pipeline.
//!
//! Arbitrary bytes must never panic anywhere along the way, and curation
//! must stay idempotent on whatever the analyzer produces.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabsight::{ChartCurator, InsightAnalyzer, Parser};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let table = Parser::new().parse_bytes(data);
    let insights = InsightAnalyzer::new().analyze(&table);

    let curator = ChartCurator::new();
    let charts = curator.curate(&insights);
    assert_eq!(curator.curate(&charts.to_insights()), charts);
});
