//! Pairwise correlation matrices over the numeric columns of a table.
//!
//! Three measures are supported: Pearson (linear), Kendall tau-b (rank
//! concordance) and Spearman (rank monotonicity). Each pair of columns uses
//! the rows where both cells are present. Undefined coefficients, such as
//! any pair involving a constant column, are stored as `NaN` and surface as
//! `None`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::helpers::{average_ranks, finite_or_none, is_constant, mean, pairwise_complete};
use crate::iter_maybe_parallel;
use crate::matrix::DenseMatrix;
use crate::table::Table;
#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// Correlation measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Covariance normalised by both standard deviations.
    #[serde(alias = "linear")]
    Pearson,
    /// Tie-corrected concordant/discordant pair counting (tau-b).
    #[serde(alias = "rank-concordance")]
    Kendall,
    /// Pearson correlation of average ranks.
    #[serde(alias = "rank-monotonicity")]
    Spearman,
}

impl CorrelationMethod {
    pub const ALL: [CorrelationMethod; 3] = [
        CorrelationMethod::Pearson,
        CorrelationMethod::Kendall,
        CorrelationMethod::Spearman,
    ];

    /// Lowercase name used in file names.
    pub fn name(self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "pearson",
            CorrelationMethod::Kendall => "kendall",
            CorrelationMethod::Spearman => "spearman",
        }
    }

    /// Capitalised name used in plot titles.
    pub fn title(self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "Pearson",
            CorrelationMethod::Kendall => "Kendall",
            CorrelationMethod::Spearman => "Spearman",
        }
    }

    /// Coefficient for two equally long, fully populated samples.
    pub fn coefficient(self, x: &[f64], y: &[f64]) -> Option<f64> {
        match self {
            CorrelationMethod::Pearson => pearson(x, y),
            CorrelationMethod::Kendall => kendall_tau_b(x, y),
            CorrelationMethod::Spearman => spearman(x, y),
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CorrelationMethod {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" | "linear" => Ok(CorrelationMethod::Pearson),
            "kendall" | "rank-concordance" => Ok(CorrelationMethod::Kendall),
            "spearman" | "rank-monotonicity" => Ok(CorrelationMethod::Spearman),
            other => Err(AnalysisError::InvalidConfig(format!(
                "unknown correlation method '{other}' (expected pearson, kendall or spearman)"
            ))),
        }
    }
}

/// Pearson product-moment correlation.
///
/// `None` for fewer than two observations or a constant input.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 || is_constant(x) || is_constant(y) {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mx;
        let dy = yi - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = (sxx * syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((sxy / denom).clamp(-1.0, 1.0))
}

/// Spearman rank correlation; ties get average ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    pearson(&average_ranks(x), &average_ranks(y))
}

/// Kendall tau-b.
///
/// `(C - D) / sqrt((n0 - n1) * (n0 - n2))` where `n0` is the number of
/// pairs and `n1`, `n2` count pairs tied in `x` and in `y`.
pub fn kendall_tau_b(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n != y.len() || n < 2 {
        return None;
    }
    let mut concordant: u64 = 0;
    let mut discordant: u64 = 0;
    let mut tied_x: u64 = 0;
    let mut tied_y: u64 = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 {
                tied_x += 1;
            }
            if dy == 0.0 {
                tied_y += 1;
            }
            if dx == 0.0 || dy == 0.0 {
                continue;
            }
            if (dx > 0.0) == (dy > 0.0) {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }
    let n0 = (n * (n - 1) / 2) as u64;
    let denom = ((n0 - tied_x) as f64 * (n0 - tied_y) as f64).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some(((concordant as f64 - discordant as f64) / denom).clamp(-1.0, 1.0))
}

/// Square, symmetric matrix of coefficients for one method.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    method: CorrelationMethod,
    labels: Vec<String>,
    values: DenseMatrix,
}

impl CorrelationMatrix {
    /// Assemble from parts, checking that `values` is square and matches `labels`.
    pub fn from_parts(
        method: CorrelationMethod,
        labels: Vec<String>,
        values: DenseMatrix,
    ) -> Result<Self> {
        let k = labels.len();
        if values.shape() != (k, k) {
            return Err(AnalysisError::DimensionMismatch {
                features: values.nrows(),
                targets: k,
            });
        }
        Ok(Self {
            method,
            labels,
            values,
        })
    }

    pub fn method(&self) -> CorrelationMethod {
        self.method
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Raw grid; undefined entries are `NaN`.
    pub fn values(&self) -> &DenseMatrix {
        &self.values
    }

    /// Coefficient at `(i, j)`; `None` when undefined or out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i, j).and_then(finite_or_none)
    }

    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        self.get(i, j)
    }
}

/// Correlation matrices keyed by method, in request order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrelationSet {
    matrices: Vec<CorrelationMatrix>,
}

impl CorrelationSet {
    pub fn get(&self, method: CorrelationMethod) -> Option<&CorrelationMatrix> {
        self.matrices.iter().find(|m| m.method() == method)
    }

    pub fn methods(&self) -> Vec<CorrelationMethod> {
        self.matrices.iter().map(CorrelationMatrix::method).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CorrelationMatrix> {
        self.matrices.iter()
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}

impl<'a> IntoIterator for &'a CorrelationSet {
    type Item = &'a CorrelationMatrix;
    type IntoIter = std::slice::Iter<'a, CorrelationMatrix>;

    fn into_iter(self) -> Self::IntoIter {
        self.matrices.iter()
    }
}

/// Correlation matrix of `columns` under one method.
///
/// Diagonal entries are exactly 1.0 for columns with at least two distinct
/// values and `NaN` otherwise.
pub fn correlation_matrix(
    columns: &[(&str, &[Option<f64>])],
    method: CorrelationMethod,
) -> CorrelationMatrix {
    let k = columns.len();

    // Upper triangle, one task per row
    let upper: Vec<Vec<(usize, f64)>> = iter_maybe_parallel!(0..k)
        .map(|i| {
            (i..k)
                .map(|j| {
                    let (x, y) = pairwise_complete(columns[i].1, columns[j].1);
                    let r = if i == j {
                        (x.len() >= 2 && !is_constant(&x)).then_some(1.0)
                    } else {
                        method.coefficient(&x, &y)
                    };
                    (j, r.unwrap_or(f64::NAN))
                })
                .collect()
        })
        .collect();

    let mut values = DenseMatrix::filled(k, k, f64::NAN);
    for (i, row) in upper.into_iter().enumerate() {
        for (j, r) in row {
            values[(i, j)] = r;
            values[(j, i)] = r;
        }
    }

    CorrelationMatrix {
        method,
        labels: columns.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }
}

/// Correlate the numeric columns of `table` under each requested method.
///
/// # Arguments
/// * `table` - Input table; text columns are skipped
/// * `methods` - Non-empty list of methods; duplicates keep their first position
/// * `column_limit` - Restrict the analysis to the first N table columns
///
/// # Errors
/// * [`AnalysisError::InvalidConfig`] for an empty method list
/// * [`AnalysisError::InsufficientData`] when fewer than 2 numeric columns remain
pub fn correlate(
    table: &Table,
    methods: &[CorrelationMethod],
    column_limit: Option<usize>,
) -> Result<CorrelationSet> {
    if methods.is_empty() {
        return Err(AnalysisError::InvalidConfig(
            "at least one correlation method is required".to_string(),
        ));
    }

    let limit = column_limit.unwrap_or(table.ncols()).min(table.ncols());
    let selected = &table.columns()[..limit];
    let numeric: Vec<(&str, &[Option<f64>])> = selected
        .iter()
        .filter_map(|c| c.numeric_values().map(|v| (c.name(), v)))
        .collect();

    let skipped = selected.len() - numeric.len();
    if skipped > 0 {
        debug!(skipped, "skipping non-numeric columns in correlation analysis");
    }
    if numeric.len() < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "correlation needs at least 2 numeric columns, found {}",
            numeric.len()
        )));
    }

    let mut unique: Vec<CorrelationMethod> = Vec::with_capacity(methods.len());
    for &m in methods {
        if !unique.contains(&m) {
            unique.push(m);
        }
    }

    let matrices = unique
        .into_iter()
        .map(|method| {
            debug!(%method, columns = numeric.len(), "computing correlation matrix");
            correlation_matrix(&numeric, method)
        })
        .collect();

    Ok(CorrelationSet { matrices })
}
