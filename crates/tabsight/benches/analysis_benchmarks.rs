//! Analysis pipeline performance benchmarks.
//!
//! Measures parsing, single-pass analysis, shard aggregation and curation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use tempfile::NamedTempFile;

use tabsight::input::shard_table;
use tabsight::{ChartCurator, DataInsights, InsightAggregator, InsightAnalyzer, Parser, Tabsight};

/// Generate a realistic sales export: a date, two correlated measures, a
/// noisy measure and a category.
fn generate_sales_data(rows: usize) -> String {
    let mut rng = StdRng::seed_from_u64(42);
    let regions = ["north", "south", "east", "west"];
    let mut data = String::from("order_date,units,revenue_total,discount,region\n");

    for row in 0..rows {
        let units: u32 = rng.gen_range(1..50);
        let price: f64 = rng.gen_range(9.0..11.0);
        // Occasional spike so outlier detection has work to do.
        let revenue = if row % 97 == 0 {
            units as f64 * price * 20.0
        } else {
            units as f64 * price
        };
        data.push_str(&format!(
            "2024-{:02}-{:02}T12:00:00Z,{},\"${:.2}\",{:.1}%,{}\n",
            (row % 12) + 1,
            (row % 28) + 1,
            units,
            revenue,
            rng.gen_range(0.0..30.0),
            regions[row % regions.len()],
        ));
    }

    data
}

/// Generate a named-metrics snapshot.
fn generate_key_value_data(rows: usize) -> String {
    let mut data = String::from("Metric,Value\n");
    for row in 0..rows {
        data.push_str(&format!("metric_{},{}ms\n", row, row * 3));
    }
    data
}

fn analyze(data: &str) -> DataInsights {
    InsightAnalyzer::new().analyze(&Parser::new().parse_str(data))
}

/// Benchmark parsing alone.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_sales_data(*rows);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("sales_rows", rows), &data, |b, data| {
            b.iter(|| black_box(Parser::new().parse_str(data)))
        });
    }

    group.finish();
}

/// Benchmark analysis of an already-parsed table.
fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");

    for rows in [100, 1_000, 10_000].iter() {
        let table = Parser::new().parse_str(&generate_sales_data(*rows));

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("sales_rows", rows), &table, |b, table| {
            let analyzer = InsightAnalyzer::new();
            b.iter(|| black_box(analyzer.analyze(table)))
        });
    }

    let table = Parser::new().parse_str(&generate_key_value_data(500));
    group.bench_function("key_value_500", |b| {
        let analyzer = InsightAnalyzer::new();
        b.iter(|| black_box(analyzer.analyze(&table)))
    });

    group.finish();
}

/// Benchmark the end-to-end file path including hashing and curation.
fn bench_analyze_file(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_file");

    for rows in [100, 5_000].iter() {
        let data = generate_sales_data(*rows);
        let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
        temp.write_all(data.as_bytes()).unwrap();

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("sales_rows", rows), &temp, |b, temp| {
            let tabsight = Tabsight::new();
            b.iter(|| black_box(tabsight.analyze_file(temp.path()).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark merging shard insights.
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    let table = Parser::new().parse_str(&generate_sales_data(10_000));
    for shards in [2, 8, 32].iter() {
        let insights: Vec<DataInsights> = shard_table(&table, *shards)
            .unwrap()
            .iter()
            .map(|s| analyze(s))
            .collect();

        group.bench_with_input(BenchmarkId::new("shards", shards), &insights, |b, insights| {
            let aggregator = InsightAggregator::new();
            b.iter(|| black_box(aggregator.aggregate(insights).unwrap()))
        });
    }

    // Shard, analyze in parallel and merge.
    let shards = shard_table(&table, 8).unwrap();
    group.bench_function("analyze_shards_8", |b| {
        let tabsight = Tabsight::new();
        b.iter(|| black_box(tabsight.analyze_shards(&shards).unwrap()))
    });

    group.finish();
}

/// Benchmark chart curation.
fn bench_curate(c: &mut Criterion) {
    let mut group = c.benchmark_group("curate");
    let curator = ChartCurator::new();

    let sales = analyze(&generate_sales_data(1_000));
    group.bench_function("sales_1000", |b| b.iter(|| black_box(curator.curate(&sales))));

    let key_value = analyze(&generate_key_value_data(500));
    group.bench_function("key_value_500", |b| {
        b.iter(|| black_box(curator.curate(&key_value)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_analyze,
    bench_analyze_file,
    bench_curate,
);

// Aggregation runs separately: it builds its fixtures from 10K rows.
criterion_group!(
    name = aggregation_benches;
    config = Criterion::default().sample_size(20);
    targets = bench_aggregate
);

criterion_main!(benches, aggregation_benches);
