//! Ordinary least-squares fit of the cluster-expansion energy model.
//!
//! The model is `y = X beta + b`: one coefficient per cluster descriptor
//! plus an intercept. How a [`Table`] maps onto `X` and `y` is decided by an
//! explicit [`FitConfig`]; nothing is inferred from column positions and the
//! table is never transposed implicitly.
//!
//! The solver centres features and target, then solves the centred system
//! through an SVD. Designs whose effective rank is below the number of
//! features are rejected with [`AnalysisError::RankDeficiency`] instead of
//! returning a minimum-norm solution.

use std::fmt;
use std::str::FromStr;

use nalgebra::{DVector, SVD};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AnalysisError, Result};
use crate::helpers::mean;
use crate::iter_maybe_parallel;
use crate::matrix::DenseMatrix;
use crate::table::{Column, Table};
#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// Which table axis holds the samples (configurations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleAxis {
    /// One sample per row, one feature per column.
    #[default]
    Rows,
    /// One sample per column, one feature per row.
    Columns,
}

impl FromStr for SampleAxis {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rows" | "row" => Ok(SampleAxis::Rows),
            "columns" | "column" | "cols" => Ok(SampleAxis::Columns),
            other => Err(AnalysisError::InvalidConfig(format!(
                "unknown sample axis '{other}' (expected rows or columns)"
            ))),
        }
    }
}

impl fmt::Display for SampleAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleAxis::Rows => f.write_str("rows"),
            SampleAxis::Columns => f.write_str("columns"),
        }
    }
}

/// The single feature-axis entry used as the regression target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSelector {
    /// Last column (or last row when samples are columns).
    #[default]
    Last,
    /// Zero-based position along the feature axis.
    Index(usize),
    /// Column name, or row label when samples are columns.
    Name(String),
}

impl FromStr for TargetSelector {
    type Err = AnalysisError;

    /// `last`, a zero-based index, or anything else as a name.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "empty target selector".to_string(),
            ));
        }
        if s.eq_ignore_ascii_case("last") {
            return Ok(TargetSelector::Last);
        }
        Ok(match s.parse::<usize>() {
            Ok(i) => TargetSelector::Index(i),
            Err(_) => TargetSelector::Name(s.to_string()),
        })
    }
}

/// How to read a table as a design matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitConfig {
    pub sample_axis: SampleAxis,
    pub target: TargetSelector,
}

/// Features and target extracted from a table.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignPartition {
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub sample_names: Vec<String>,
    /// Samples x features.
    pub features: DenseMatrix,
    pub target: Vec<f64>,
    /// Samples left out because one of their cells was empty.
    pub dropped_samples: usize,
}

/// Fitted linear model and its quality metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub feature_names: Vec<String>,
    pub target_name: String,
    pub sample_names: Vec<String>,
    /// One per feature, in `feature_names` order.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub observed: Vec<f64>,
    pub fitted_values: Vec<f64>,
    pub residuals: Vec<f64>,
    pub r_squared: f64,
    pub mse: f64,
    pub rmse: f64,
}

impl FitResult {
    /// Evaluate the model for one sample's feature values.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(AnalysisError::DimensionMismatch {
                features: features.len(),
                targets: self.coefficients.len(),
            });
        }
        Ok(self.intercept
            + features
                .iter()
                .zip(self.coefficients.iter())
                .map(|(x, b)| x * b)
                .sum::<f64>())
    }
}

/// Coefficient of determination; a constant target scores 1 only when fitted exactly.
pub fn r_squared(observed: &[f64], fitted: &[f64]) -> f64 {
    let y_mean = mean(observed).unwrap_or(0.0);
    let ss_tot: f64 = observed.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
    let ss_res: f64 = observed
        .iter()
        .zip(fitted.iter())
        .map(|(&yi, &fi)| (yi - fi).powi(2))
        .sum();
    if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Mean of squared residuals; 0 for empty input.
pub fn mean_squared_error(observed: &[f64], fitted: &[f64]) -> f64 {
    if observed.is_empty() {
        return 0.0;
    }
    observed
        .iter()
        .zip(fitted.iter())
        .map(|(&yi, &fi)| (yi - fi).powi(2))
        .sum::<f64>()
        / observed.len() as f64
}

/// Center columns of a matrix and return (centered_matrix, column_means).
fn center_columns(data: &DenseMatrix) -> (DenseMatrix, Vec<f64>) {
    let (n, m) = data.shape();
    let means: Vec<f64> = iter_maybe_parallel!(0..m)
        .map(|j| mean(data.column(j)).unwrap_or(0.0))
        .collect();

    let mut centered = DenseMatrix::zeros(n, m);
    for j in 0..m {
        for i in 0..n {
            centered[(i, j)] = data[(i, j)] - means[j];
        }
    }
    (centered, means)
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Fit `y = X beta + b` by least squares.
///
/// # Arguments
/// * `x` - Design matrix (n samples x p features)
/// * `y` - Target values (length n)
///
/// # Errors
/// * [`AnalysisError::DimensionMismatch`] if `y.len() != x.nrows()`
/// * [`AnalysisError::InsufficientData`] with no samples or no features
/// * [`AnalysisError::Numerical`] for non-finite input or a failed decomposition
/// * [`AnalysisError::RankDeficiency`] when the centred design has rank below `p`,
///   which includes every case with `n <= p`
///
/// Feature and sample names default to `x1..xp` and `0..n-1`.
pub fn fit_ols(x: &DenseMatrix, y: &[f64]) -> Result<FitResult> {
    let (n, p) = x.shape();
    if y.len() != n {
        return Err(AnalysisError::DimensionMismatch {
            features: n,
            targets: y.len(),
        });
    }
    if p == 0 {
        return Err(AnalysisError::InsufficientData(
            "least squares needs at least one feature".to_string(),
        ));
    }
    if n == 0 {
        return Err(AnalysisError::InsufficientData(
            "least squares needs at least one complete sample".to_string(),
        ));
    }

    if let Some(j) = (0..p).find(|&j| !all_finite(x.column(j))) {
        return Err(AnalysisError::Numerical(format!(
            "feature x{} holds a non-finite value",
            j + 1
        )));
    }
    if !all_finite(y) {
        return Err(AnalysisError::Numerical(
            "target holds a non-finite value".to_string(),
        ));
    }

    let (x_cen, x_means) = center_columns(x);
    let y_mean = mean(y).unwrap_or(0.0);
    let y_cen = DVector::from_iterator(n, y.iter().map(|&yi| yi - y_mean));
    if !all_finite(x_cen.as_slice()) || !all_finite(y_cen.as_slice()) {
        return Err(AnalysisError::Numerical(
            "centring overflowed; rescale the data".to_string(),
        ));
    }

    let svd = SVD::try_new(x_cen.to_dmatrix(), true, true, 5.0 * f64::EPSILON, 0)
        .ok_or_else(|| AnalysisError::Numerical("SVD did not converge".to_string()))?;
    let sigma_max = svd.singular_values.iter().copied().fold(0.0, f64::max);
    let tol = n.max(p) as f64 * f64::EPSILON * sigma_max;
    let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
    debug!(samples = n, features = p, rank, "design matrix rank");

    if rank < p {
        return Err(AnalysisError::RankDeficiency {
            samples: n,
            parameters: p + 1,
            rank: rank + 1,
        });
    }

    let beta = svd
        .solve(&y_cen, tol)
        .map_err(|e| AnalysisError::Numerical(e.to_string()))?;
    let coefficients: Vec<f64> = beta.iter().copied().collect();
    let intercept = y_mean
        - x_means
            .iter()
            .zip(coefficients.iter())
            .map(|(m, b)| m * b)
            .sum::<f64>();

    let fitted_values: Vec<f64> = (0..n)
        .map(|i| {
            let mut pred = intercept;
            for j in 0..p {
                pred += x[(i, j)] * coefficients[j];
            }
            pred
        })
        .collect();
    let residuals: Vec<f64> = y
        .iter()
        .zip(fitted_values.iter())
        .map(|(&yi, &fi)| yi - fi)
        .collect();

    let r_squared = r_squared(y, &fitted_values);
    let mse = mean_squared_error(y, &fitted_values);

    Ok(FitResult {
        feature_names: (1..=p).map(|j| format!("x{j}")).collect(),
        target_name: "y".to_string(),
        sample_names: (0..n).map(|i| i.to_string()).collect(),
        coefficients,
        intercept,
        observed: y.to_vec(),
        fitted_values,
        residuals,
        r_squared,
        mse,
        rmse: mse.sqrt(),
    })
}

fn target_position(
    target: &TargetSelector,
    len: usize,
    axis: &str,
    position_of: impl Fn(&str) -> Option<usize>,
) -> Result<usize> {
    match target {
        TargetSelector::Last => len
            .checked_sub(1)
            .ok_or_else(|| AnalysisError::InsufficientData(format!("table has no {axis}s"))),
        TargetSelector::Index(i) if *i < len => Ok(*i),
        TargetSelector::Index(i) => Err(AnalysisError::UnknownColumn(format!(
            "{axis} index {i} (table has {len} {axis}s)"
        ))),
        TargetSelector::Name(name) => {
            position_of(name).ok_or_else(|| AnalysisError::UnknownColumn(name.clone()))
        }
    }
}

fn numeric_cells(table: &Table) -> Result<Vec<&[Option<f64>]>> {
    table.columns().iter().map(Column::require_numeric).collect()
}

fn partition_by_rows(table: &Table, target: &TargetSelector) -> Result<DesignPartition> {
    let ncols = table.ncols();
    let target_col = target_position(target, ncols, "column", |n| table.column_index(n))?;
    if ncols < 2 {
        return Err(AnalysisError::InsufficientData(
            "fit needs at least one feature column besides the target".to_string(),
        ));
    }
    let cells = numeric_cells(table)?;

    let kept: Vec<usize> = (0..table.nrows())
        .filter(|&i| cells.iter().all(|c| c[i].is_some()))
        .collect();
    let value = |i: usize, j: usize| cells[j][i].unwrap_or(f64::NAN);

    let feature_cols: Vec<usize> = (0..ncols).filter(|&j| j != target_col).collect();
    let columns: Vec<Vec<f64>> = feature_cols
        .iter()
        .map(|&j| kept.iter().map(|&i| value(i, j)).collect())
        .collect();
    let features = DenseMatrix::from_columns(&columns)
        .unwrap_or_else(|| DenseMatrix::zeros(kept.len(), feature_cols.len()));

    let sample_names = kept
        .iter()
        .map(|&i| match table.row_labels() {
            Some(labels) => labels[i].clone(),
            None => i.to_string(),
        })
        .collect();

    Ok(DesignPartition {
        feature_names: feature_cols
            .iter()
            .map(|&j| table.columns()[j].name().to_string())
            .collect(),
        target_name: table.columns()[target_col].name().to_string(),
        sample_names,
        target: kept.iter().map(|&i| value(i, target_col)).collect(),
        features,
        dropped_samples: table.nrows() - kept.len(),
    })
}

fn partition_by_columns(table: &Table, target: &TargetSelector) -> Result<DesignPartition> {
    let nrows = table.nrows();
    let labels = table.row_labels();
    let target_row = target_position(target, nrows, "row", |name| {
        labels.and_then(|l| l.iter().position(|r| r == name))
    })?;
    if nrows < 2 {
        return Err(AnalysisError::InsufficientData(
            "fit needs at least one feature row besides the target".to_string(),
        ));
    }
    let cells = numeric_cells(table)?;

    let kept: Vec<usize> = (0..table.ncols())
        .filter(|&s| cells[s].iter().all(Option::is_some))
        .collect();
    let value = |s: usize, r: usize| cells[s][r].unwrap_or(f64::NAN);
    let row_name = |r: usize| match labels {
        Some(l) => l[r].clone(),
        None => format!("row {r}"),
    };

    let feature_rows: Vec<usize> = (0..nrows).filter(|&r| r != target_row).collect();
    let columns: Vec<Vec<f64>> = feature_rows
        .iter()
        .map(|&r| kept.iter().map(|&s| value(s, r)).collect())
        .collect();
    let features = DenseMatrix::from_columns(&columns)
        .unwrap_or_else(|| DenseMatrix::zeros(kept.len(), feature_rows.len()));

    Ok(DesignPartition {
        feature_names: feature_rows.iter().map(|&r| row_name(r)).collect(),
        target_name: row_name(target_row),
        sample_names: kept
            .iter()
            .map(|&s| table.columns()[s].name().to_string())
            .collect(),
        target: kept.iter().map(|&s| value(s, target_row)).collect(),
        features,
        dropped_samples: table.ncols() - kept.len(),
    })
}

/// Split `table` into a design matrix and target following `config`.
///
/// Every cell on the used axis must be numeric; samples with an empty cell
/// are dropped and counted in [`DesignPartition::dropped_samples`].
pub fn partition(table: &Table, config: &FitConfig) -> Result<DesignPartition> {
    let part = match config.sample_axis {
        SampleAxis::Rows => partition_by_rows(table, &config.target)?,
        SampleAxis::Columns => partition_by_columns(table, &config.target)?,
    };
    if part.dropped_samples > 0 {
        warn!(
            dropped = part.dropped_samples,
            "dropping samples with empty cells before fitting"
        );
    }
    Ok(part)
}

/// Partition `table` per `config` and fit the linear model.
pub fn fit_table(table: &Table, config: &FitConfig) -> Result<FitResult> {
    let part = partition(table, config)?;
    debug!(
        axis = %config.sample_axis,
        target = %part.target_name,
        features = part.feature_names.len(),
        samples = part.target.len(),
        "fitting least squares model"
    );
    if let Some(j) = (0..part.features.ncols()).find(|&j| !all_finite(part.features.column(j))) {
        return Err(AnalysisError::Numerical(format!(
            "'{}' holds a non-finite value",
            part.feature_names[j]
        )));
    }
    let mut fit = fit_ols(&part.features, &part.target)?;
    fit.feature_names = part.feature_names;
    fit.target_name = part.target_name;
    fit.sample_names = part.sample_names;
    info!(
        r2 = fit.r_squared,
        mse = fit.mse,
        rmse = fit.rmse,
        "least squares fit complete"
    );
    Ok(fit)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// y = 2 x1 - 3 x2 + 5 on `n` samples.
    fn exact_table(n: usize) -> Table {
        let x1: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let x2: Vec<f64> = (0..n).map(|i| ((i * 7) % 5) as f64 + 0.5 * i as f64).collect();
        let y: Vec<f64> = x1
            .iter()
            .zip(x2.iter())
            .map(|(a, b)| 2.0 * a - 3.0 * b + 5.0)
            .collect();
        Table::new(vec![
            Column::numeric("x1", x1),
            Column::numeric("x2", x2),
            Column::numeric("E", y),
        ])
        .unwrap()
    }

    #[test]
    fn test_fit_recovers_exact_model() {
        let fit = fit_table(&exact_table(8), &FitConfig::default()).unwrap();
        assert_eq!(fit.feature_names, vec!["x1", "x2"]);
        assert_eq!(fit.target_name, "E");
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-9);
        assert!((fit.coefficients[1] + 3.0).abs() < 1e-9);
        assert!((fit.intercept - 5.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!(fit.mse < 1e-18);
        assert!((fit.rmse - fit.mse.sqrt()).abs() < 1e-15);
    }

    #[test]
    fn test_fit_residuals_consistent() {
        let mut t = exact_table(10);
        let noisy: Vec<f64> = t.columns()[2]
            .values()
            .iter()
            .enumerate()
            .map(|(i, v)| v + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        t = Table::new(vec![
            t.columns()[0].clone(),
            t.columns()[1].clone(),
            Column::numeric("E", noisy),
        ])
        .unwrap();
        let fit = fit_table(&t, &FitConfig::default()).unwrap();
        for i in 0..fit.observed.len() {
            assert!((fit.residuals[i] - (fit.observed[i] - fit.fitted_values[i])).abs() < 1e-12);
        }
        let mse: f64 =
            fit.residuals.iter().map(|r| r * r).sum::<f64>() / fit.residuals.len() as f64;
        assert!((fit.mse - mse).abs() < 1e-12);
        assert!(fit.r_squared < 1.0 && fit.r_squared > 0.9);
    }

    #[test]
    fn test_underdetermined_is_rank_deficient() {
        let err = fit_table(&exact_table(2), &FitConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::RankDeficiency {
                samples: 2,
                parameters: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_collinear_features_are_rank_deficient() {
        let x1 = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let x2: Vec<f64> = x1.iter().map(|v| 2.0 * v).collect();
        let x = DenseMatrix::from_columns(&[x1, x2]).unwrap();
        let err = fit_ols(&x, &[1.0, 2.0, 3.0, 4.0, 6.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::RankDeficiency { rank: 2, .. }));
    }

    #[test]
    fn test_non_finite_input_is_a_numerical_error() {
        let table = Table::new(vec![
            Column::numeric("pair_nn", vec![0.1, f64::INFINITY, 0.3, 0.4]),
            Column::numeric("triplet", vec![1.0, 0.5, 0.2, 0.9]),
            Column::numeric("E", vec![-1.0, -1.2, -0.8, -1.5]),
        ])
        .unwrap();
        let err = fit_table(&table, &FitConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::Numerical(msg) if msg.contains("pair_nn")));

        let x = DenseMatrix::from_columns(&[vec![1.0, 2.0, 3.0]]).unwrap();
        assert!(matches!(
            fit_ols(&x, &[1.0, f64::NEG_INFINITY, 2.0]),
            Err(AnalysisError::Numerical(_))
        ));
    }

    #[test]
    fn test_overflowing_centring_is_a_numerical_error() {
        let x = DenseMatrix::from_columns(&[vec![1.7e308, 1.7e308, -1.0, 2.0]]).unwrap();
        assert!(matches!(
            fit_ols(&x, &[1.0, 2.0, 3.0, 4.0]),
            Err(AnalysisError::Numerical(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let x = DenseMatrix::from_columns(&[vec![1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(
            fit_ols(&x, &[1.0, 2.0]).unwrap_err(),
            AnalysisError::DimensionMismatch {
                features: 3,
                targets: 2
            }
        );
    }

    #[test]
    fn test_target_by_name_and_index() {
        let t = exact_table(6);
        let by_name = FitConfig {
            sample_axis: SampleAxis::Rows,
            target: TargetSelector::Name("x1".into()),
        };
        let fit = fit_table(&t, &by_name).unwrap();
        assert_eq!(fit.target_name, "x1");
        assert_eq!(fit.feature_names, vec!["x2", "E"]);

        let by_index = FitConfig {
            sample_axis: SampleAxis::Rows,
            target: TargetSelector::Index(0),
        };
        assert_eq!(fit_table(&t, &by_index).unwrap(), fit);

        let missing = FitConfig {
            sample_axis: SampleAxis::Rows,
            target: TargetSelector::Index(3),
        };
        assert!(matches!(
            fit_table(&t, &missing),
            Err(AnalysisError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_columns_axis_matches_rows_axis() {
        // same data laid out with one sample per column
        let t = exact_table(6);
        let samples: Vec<Column> = (0..t.nrows())
            .map(|i| {
                let cells = t.columns().iter().map(|c| c.values()[i]).collect();
                Column::numeric(format!("s{i}"), cells)
            })
            .collect();
        let transposed = Table::new(samples)
            .unwrap()
            .with_row_labels(vec!["x1".into(), "x2".into(), "E".into()])
            .unwrap();
        let cfg = FitConfig {
            sample_axis: SampleAxis::Columns,
            target: TargetSelector::Name("E".into()),
        };
        let fit = fit_table(&transposed, &cfg).unwrap();
        assert_eq!(fit.feature_names, vec!["x1", "x2"]);
        assert_eq!(fit.sample_names[0], "s0");
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-9);
        assert!((fit.coefficients[1] + 3.0).abs() < 1e-9);
        assert!((fit.intercept - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_incomplete_samples_dropped() {
        let t = exact_table(6);
        let mut x1: Vec<Option<f64>> = t.columns()[0].values().into_iter().map(Some).collect();
        x1[4] = None;
        let t = Table::new(vec![
            Column::nullable("x1", x1),
            t.columns()[1].clone(),
            t.columns()[2].clone(),
        ])
        .unwrap();
        let part = partition(&t, &FitConfig::default()).unwrap();
        assert_eq!(part.dropped_samples, 1);
        assert_eq!(part.target.len(), 5);
        assert_eq!(part.sample_names, vec!["0", "1", "2", "3", "5"]);
    }

    #[test]
    fn test_text_column_rejected() {
        let t = Table::new(vec![
            Column::text("id", vec![Some("a".into()), Some("b".into())]),
            Column::numeric("E", vec![1.0, 2.0]),
        ])
        .unwrap();
        assert_eq!(
            fit_table(&t, &FitConfig::default()).unwrap_err(),
            AnalysisError::NonNumericColumn("id".into())
        );
    }

    #[test]
    fn test_predict() {
        let fit = fit_table(&exact_table(5), &FitConfig::default()).unwrap();
        let y = fit.predict(&[1.0, 1.0]).unwrap();
        assert!((y - 4.0).abs() < 1e-9);
        assert!(fit.predict(&[1.0]).is_err());
    }

    #[test]
    fn test_r_squared_constant_target() {
        assert_eq!(r_squared(&[2.0, 2.0], &[2.0, 2.0]), 1.0);
        assert_eq!(r_squared(&[2.0, 2.0], &[1.0, 3.0]), 0.0);
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!("last".parse::<TargetSelector>().unwrap(), TargetSelector::Last);
        assert_eq!("2".parse::<TargetSelector>().unwrap(), TargetSelector::Index(2));
        assert_eq!(
            "E_ref".parse::<TargetSelector>().unwrap(),
            TargetSelector::Name("E_ref".into())
        );
        assert!("".parse::<TargetSelector>().is_err());
        assert_eq!("Columns".parse::<SampleAxis>().unwrap(), SampleAxis::Columns);
        assert!("diagonal".parse::<SampleAxis>().is_err());
    }
}
