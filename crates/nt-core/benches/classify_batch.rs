//! Criterion benchmarks for batch classification and enrichment in `nt-core`.
//!
//! Benchmarks `classify_recent`, `classify_historic`, narrative generation
//! and the full `enrich` pipeline over synthetic collections of increasing
//! size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nt_common::{Gender, NameRecord, SeriesValue};
use nt_config::{NarrativeThresholds, TrendConfig};
use nt_core::classify::{classify_historic, classify_recent};
use nt_core::narrative;
use nt_core::pipeline::{enrich, LabelTables, NameCollection};

/// Deterministic record `i`: a mix of stable, rising, fading and sparse shapes.
fn synthetic(i: usize, gender: Gender) -> NameRecord {
    let mut r = NameRecord::new(format!("Name{i}"), gender);
    let base = (i % 900) as u32 + 1;
    r.rank_from_1996 = (0..29u32)
        .map(|y| match i % 4 {
            0 => SeriesValue::Present(base),
            1 => SeriesValue::Present((base + 300).saturating_sub(y * 10).max(1)),
            2 => SeriesValue::Present(base + y * 15),
            _ if y % 3 == 0 => SeriesValue::Unranked,
            _ => SeriesValue::Present(base + y),
        })
        .collect();
    r.count_from_1996 = r
        .rank_from_1996
        .iter()
        .map(|v| match v.get() {
            Some(rank) => SeriesValue::Present(40_000 / rank),
            None => SeriesValue::Unranked,
        })
        .collect();
    r.rank_historic = (0..13u32)
        .map(|d| {
            if (i + d as usize) % 5 == 0 {
                SeriesValue::Unranked
            } else {
                SeriesValue::Present(base / 4 + d * 7 + 1)
            }
        })
        .collect();
    r.rank = r.rank_from_1996.last().and_then(|v| v.get());
    r.count = r.count_from_1996.last().and_then(|v| v.get());
    r.related_names = vec![format!("Name{}", i + 1), format!("Name{}", i / 2)];
    r
}

fn collection(size: usize) -> NameCollection {
    let half = size / 2;
    NameCollection::new(
        (0..half).map(|i| synthetic(i, Gender::Boy)).collect(),
        (half..size).map(|i| synthetic(i, Gender::Girl)).collect(),
    )
}

fn bench_rule_classification(c: &mut Criterion) {
    let records: Vec<NameRecord> = (0..1000).map(|i| synthetic(i, Gender::Girl)).collect();
    let mut group = c.benchmark_group("classify/rules");

    group.bench_function("recent_1000", |b| {
        b.iter(|| {
            for r in &records {
                black_box(classify_recent(black_box(&r.rank_from_1996)));
            }
        })
    });
    group.bench_function("historic_1000", |b| {
        b.iter(|| {
            for r in &records {
                black_box(classify_historic(black_box(&r.rank_historic)));
            }
        })
    });
    group.finish();
}

fn bench_narratives(c: &mut Criterion) {
    let records: Vec<NameRecord> = (0..1000).map(|i| synthetic(i, Gender::Boy)).collect();
    let thresholds = NarrativeThresholds::default();
    c.bench_function("narrative/generate_1000", |b| {
        b.iter(|| {
            for r in &records {
                black_box(narrative::generate(black_box(r), &thresholds));
            }
        })
    });
}

fn bench_enrich(c: &mut Criterion) {
    let config = TrendConfig::default();
    let tables = LabelTables::default();
    let mut group = c.benchmark_group("pipeline/enrich");
    group.sample_size(20);

    for size in [100usize, 1_000, 5_000] {
        let input = collection(size);
        group.bench_with_input(BenchmarkId::new("records", size), &input, |b, input| {
            b.iter(|| {
                let mut names = input.clone();
                black_box(enrich(&mut names, &tables, &config));
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rule_classification, bench_narratives, bench_enrich);
criterion_main!(benches);
