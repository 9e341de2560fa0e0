//! Benchmarks for the table analyses
//!
//! Covers:
//! - Correlation matrices for each method as the column count grows
//! - Column summaries
//! - Least-squares fits over tall design matrices

use ce_fit_core::{
    correlate, fit_ols, summarize, Column, CorrelationMethod, DenseMatrix, Table,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_distr::Normal;

/// Random design table with `ncols` feature columns and an energy column
fn generate_table(nrows: usize, ncols: usize, seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 0.05).unwrap();
    let features: Vec<Vec<f64>> = (0..ncols)
        .map(|_| (0..nrows).map(|_| rng.gen_range(0.0..1.0)).collect())
        .collect();
    let energy: Vec<f64> = (0..nrows)
        .map(|i| {
            features
                .iter()
                .enumerate()
                .map(|(j, col)| (j as f64 - ncols as f64 / 2.0) * col[i])
                .sum::<f64>()
                + noise.sample(&mut rng)
        })
        .collect();

    let mut columns: Vec<Column> = features
        .into_iter()
        .enumerate()
        .map(|(j, v)| Column::numeric(format!("cluster_{j}"), v))
        .collect();
    columns.push(Column::numeric("energy", energy));
    Table::new(columns).unwrap()
}

fn bench_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Correlation");

    for ncols in [5, 10, 20, 40].iter() {
        let table = generate_table(200, *ncols, 7);
        for method in CorrelationMethod::ALL {
            group.bench_with_input(BenchmarkId::new(method.name(), ncols), ncols, |b, _| {
                b.iter(|| correlate(black_box(&table), &[method], None))
            });
        }
    }

    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("Summary");

    for nrows in [100, 1000, 10000].iter() {
        let table = generate_table(*nrows, 10, 11);
        group.bench_with_input(BenchmarkId::new("summarize", nrows), nrows, |b, _| {
            b.iter(|| summarize(black_box(&table)))
        });
    }

    group.finish();
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("LeastSquares");

    for (nrows, ncols) in [(100, 5), (500, 20), (2000, 50)].iter() {
        let table = generate_table(*nrows, *ncols, 13);
        let features: Vec<Vec<f64>> = table.columns()[..*ncols]
            .iter()
            .map(Column::values)
            .collect();
        let x = DenseMatrix::from_columns(&features).unwrap();
        let y = table.columns()[*ncols].values();

        group.bench_with_input(
            BenchmarkId::new("fit_ols", format!("{nrows}x{ncols}")),
            nrows,
            |b, _| b.iter(|| fit_ols(black_box(&x), black_box(&y))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_correlation, bench_summary, bench_fit);
criterion_main!(benches);
