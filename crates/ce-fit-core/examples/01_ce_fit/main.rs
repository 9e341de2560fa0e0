//! Example 01: Cluster-expansion fit
//!
//! Builds a small table of cluster correlation functions with a known
//! energy model, then runs the three analyses on it: correlation matrices,
//! column summaries and an ordinary least-squares fit of the energy.

use ce_fit_core::{
    correlate, fit_table, summarize, Column, CorrelationMethod, FitConfig, SampleAxis, Table,
    TargetSelector,
};

fn build_table() -> Table {
    let n = 12;
    let pair: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin()).collect();
    let triplet: Vec<f64> = (0..n).map(|i| (i as f64 * 0.61).cos() * 0.5).collect();
    let energy: Vec<f64> = pair
        .iter()
        .zip(triplet.iter())
        .enumerate()
        .map(|(i, (p, t))| -1.2 + 0.8 * p - 0.4 * t + 0.01 * ((i * 7 % 5) as f64 - 2.0))
        .collect();

    Table::new(vec![
        Column::numeric("pair_nn", pair),
        Column::numeric("triplet", triplet),
        Column::numeric("E_DFT", energy),
    ])
    .unwrap()
}

fn main() {
    println!("=== Example 01: Cluster-Expansion Fit ===\n");
    let table = build_table();
    println!(
        "Table: {} samples x {} columns {:?}",
        table.nrows(),
        table.ncols(),
        table.column_names()
    );

    println!("\n--- Correlation ---");
    let set = correlate(&table, &CorrelationMethod::ALL, None).unwrap();
    for m in &set {
        let r = m.get_by_name("pair_nn", "E_DFT");
        println!("  {:<9} pair_nn vs E_DFT: {:?}", m.method().title(), r);
    }

    println!("\n--- Summary ---");
    let summary = summarize(&table).unwrap();
    for row in summary.rows() {
        println!(
            "  {:<8} mean={:>8.4} std={:>8.4} skew={:?}",
            row.name,
            row.mean.unwrap_or(f64::NAN),
            row.std.unwrap_or(f64::NAN),
            row.skewness
        );
    }

    println!("\n--- Least squares ---");
    let config = FitConfig {
        sample_axis: SampleAxis::Rows,
        target: TargetSelector::Name("E_DFT".into()),
    };
    let fit = fit_table(&table, &config).unwrap();
    for (name, coef) in fit.feature_names.iter().zip(fit.coefficients.iter()) {
        println!("  {name:<8} {coef:>10.5}");
    }
    println!("  {:<8} {:>10.5}", "Intercept", fit.intercept);
    println!("  R2 = {:.6}, MSE = {:.3e}", fit.r_squared, fit.mse);

    println!("\n=== Done ===");
}
