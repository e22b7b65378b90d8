use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::NaiveDate;
use stockwise_core::{CatalogAggregate, DailySalesRecord, ProductId};
use stockwise_forecast::{
    AbcClassificationJob, AnalyticsJob, DemandForecastJob, ReorderPointJob, SeasonalAnalysisJob,
};

/// Deterministic pseudo-seasonal daily series.
fn history(days: usize) -> Vec<DailySalesRecord> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    (0..days)
        .map(|i| {
            let date = start + chrono::Duration::days(i as i64);
            let qty = 20 + (i * 37 % 17) as u64 + if i % 365 > 150 && i % 365 < 240 { 15 } else { 0 };
            DailySalesRecord::new(date, qty, qty as f64 * 19.99).unwrap()
        })
        .collect()
}

fn bench_jobs(c: &mut Criterion) {
    let id = ProductId::new();

    let mut group = c.benchmark_group("per_product_jobs");
    for days in [180usize, 365, 730] {
        let h = history(days);
        group.throughput(Throughput::Elements(days as u64));

        group.bench_with_input(BenchmarkId::new("seasonal", days), &h, |b, h| {
            b.iter(|| SeasonalAnalysisJob::new(id, black_box(h.clone())).run())
        });
        group.bench_with_input(BenchmarkId::new("forecast", days), &h, |b, h| {
            b.iter(|| DemandForecastJob::new(id, "bench", black_box(h.clone()), 30).run())
        });
        group.bench_with_input(BenchmarkId::new("reorder_point", days), &h, |b, h| {
            b.iter(|| ReorderPointJob::new(id, black_box(h.clone()), 7.0).run())
        });
    }
    group.finish();
}

fn bench_abc(c: &mut Criterion) {
    let mut group = c.benchmark_group("abc_classification");
    for n in [100usize, 1_000, 10_000] {
        let catalog: Vec<CatalogAggregate> = (0..n)
            .map(|i| CatalogAggregate::with_revenue(ProductId::new(), ((i * 7919) % 10_007) as f64))
            .collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &catalog, |b, catalog| {
            b.iter(|| AbcClassificationJob::new(black_box(catalog.clone())).run())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_jobs, bench_abc);
criterion_main!(benches);
