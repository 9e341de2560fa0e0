//! Per-column descriptive statistics and frequency distributions.
//!
//! Definitions follow the conventional data-frame summary:
//! - variance and standard deviation use the N-1 denominator
//! - percentiles interpolate linearly at `h = (n - 1) * p`
//! - the mode is the smallest of the most frequent values
//! - skewness is the adjusted Fisher-Pearson coefficient G1 (n >= 3)
//! - kurtosis is the bias-corrected excess kurtosis G2 (n >= 4)
//!
//! Statistics that are undefined for the available number of values, or
//! that do not come out finite, are `None` rather than errors.

use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::helpers::{finite_or_none, finite_values, mean};
use crate::slice_maybe_parallel;
use crate::table::{Column, Table};
#[cfg(feature = "parallel")]
use rayon::iter::ParallelIterator;

/// Descriptive statistics of one numeric column after dropping nulls.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
    pub std: Option<f64>,
    pub variance: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub q25: Option<f64>,
    pub q50: Option<f64>,
    pub q75: Option<f64>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
}

impl ColumnSummary {
    /// Statistic labels in output order, matching [`ColumnSummary::stats`].
    pub const STAT_NAMES: [&'static str; 13] = [
        "Count", "Mean", "Median", "Mode", "Std", "Variance", "Min", "Max", "25%", "50%", "75%",
        "Skewness", "Kurtosis",
    ];

    /// Statistics as a row, in [`ColumnSummary::STAT_NAMES`] order.
    pub fn stats(&self) -> [Option<f64>; 13] {
        [
            Some(self.count as f64),
            self.mean,
            self.median,
            self.mode,
            self.std,
            self.variance,
            self.min,
            self.max,
            self.q25,
            self.q50,
            self.q75,
            self.skewness,
            self.kurtosis,
        ]
    }
}

/// One [`ColumnSummary`] per numeric column, in table order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    rows: Vec<ColumnSummary>,
}

impl SummaryTable {
    pub fn rows(&self) -> &[ColumnSummary] {
        &self.rows
    }

    pub fn get(&self, name: &str) -> Option<&ColumnSummary> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Quantile of sorted data with linear interpolation between order statistics.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Smallest of the most frequent values of sorted data.
pub fn mode(sorted: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        let run = j - i;
        // strict comparison keeps the earliest (smallest) value on ties
        if best.map_or(true, |(_, n)| run > n) {
            best = Some((sorted[i], run));
        }
        i = j;
    }
    best.map(|(v, _)| v)
}

/// Sample variance (N-1 denominator).
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|&v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Central moment sums `(sum d^2, sum d^3, sum d^4)` about the mean.
fn moment_sums(values: &[f64]) -> Option<(f64, f64, f64)> {
    let m = mean(values)?;
    let mut s2 = 0.0;
    let mut s3 = 0.0;
    let mut s4 = 0.0;
    for &v in values {
        let d = v - m;
        let d2 = d * d;
        s2 += d2;
        s3 += d2 * d;
        s4 += d2 * d2;
    }
    Some((s2, s3, s4))
}

/// Sums this small relative to the data are rounding noise from a constant column.
fn zero_out_rounding(sum: f64, values: &[f64]) -> f64 {
    let scale = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs())).max(1.0);
    if sum.abs() < 1e-14 * scale * values.len() as f64 {
        0.0
    } else {
        sum
    }
}

/// Adjusted Fisher-Pearson skewness G1; `None` below 3 values, 0 with no spread.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let (s2, s3, _) = moment_sums(values)?;
    let s2 = zero_out_rounding(s2, values);
    if s2 == 0.0 {
        return Some(0.0);
    }
    let n = n as f64;
    Some((n * (n - 1.0).sqrt() / (n - 2.0)) * (s3 / s2.powf(1.5)))
}

/// Bias-corrected excess kurtosis G2; `None` below 4 values, 0 with no spread.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let (s2, _, s4) = moment_sums(values)?;
    let s2 = zero_out_rounding(s2, values);
    if s2 == 0.0 {
        return Some(0.0);
    }
    let n = n as f64;
    let numerator = n * (n + 1.0) * (n - 1.0) * s4;
    let denominator = (n - 2.0) * (n - 3.0) * s2 * s2;
    let adj = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    Some(numerator / denominator - adj)
}

/// Summarise a single sample.
///
/// An infinite value makes every moment-based statistic `None`; order
/// statistics that land on finite values are kept.
pub fn describe(name: &str, values: &[f64]) -> ColumnSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let variance = sample_variance(values).and_then(finite_or_none);
    let finite = |v: Option<f64>| v.and_then(finite_or_none);

    ColumnSummary {
        name: name.to_string(),
        count: values.len(),
        mean: finite(mean(values)),
        median: finite(quantile(&sorted, 0.5)),
        mode: finite(mode(&sorted)),
        std: variance.map(f64::sqrt),
        variance,
        min: finite(sorted.first().copied()),
        max: finite(sorted.last().copied()),
        q25: finite(quantile(&sorted, 0.25)),
        q50: finite(quantile(&sorted, 0.5)),
        q75: finite(quantile(&sorted, 0.75)),
        skewness: finite(skewness(values)),
        kurtosis: finite(kurtosis(values)),
    }
}

/// Summarise every numeric column of `table`.
///
/// Text columns are skipped. Fails with [`AnalysisError::InsufficientData`]
/// when the table has no numeric column at all.
pub fn summarize(table: &Table) -> Result<SummaryTable> {
    let numeric: Vec<&Column> = table.numeric_columns().collect();
    if numeric.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "statistical summary needs at least one numeric column".to_string(),
        ));
    }
    debug!(columns = numeric.len(), "summarising numeric columns");

    let rows: Vec<ColumnSummary> = slice_maybe_parallel!(numeric)
        .map(|c| describe(c.name(), &c.values()))
        .collect();
    Ok(SummaryTable { rows })
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.get(1)) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin `values` into `bins` equal-width bins over `[min, max]`.
///
/// The last bin is closed on the right. A constant sample is binned over
/// `[v - 0.5, v + 0.5]`. Non-finite values are not counted. `None` for zero
/// bins or when no finite value is left.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let values = finite_values(values);
    if values.is_empty() || bins == 0 {
        return None;
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    if !width.is_finite() {
        return None;
    }
    let edges: Vec<f64> = (0..=bins).map(|k| lo + k as f64 * width).collect();

    let mut counts = vec![0usize; bins];
    for &v in &values {
        let k = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[k] += 1;
    }
    Some(Histogram { edges, counts })
}

/// Gaussian kernel density estimate on `points` evenly spaced values over `[min, max]`.
///
/// Bandwidth follows Scott's rule, `std * n^(-1/5)`. Returns `(x, density)`
/// pairs, empty for fewer than 2 finite values, a zero spread or fewer
/// than 2 points.
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<(f64, f64)> {
    let values = finite_values(values);
    let n = values.len();
    let std = match sample_variance(&values) {
        Some(v) if v > 0.0 && v.is_finite() => v.sqrt(),
        _ => return Vec::new(),
    };
    if points < 2 {
        return Vec::new();
    }
    let bw = std * (n as f64).powf(-0.2);
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let norm = 1.0 / (n as f64 * bw * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|k| {
            let x = lo + (hi - lo) * k as f64 / (points - 1) as f64;
            let density: f64 = values
                .iter()
                .map(|&v| {
                    let u = (x - v) / bw;
                    (-0.5 * u * u).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMERICAL_EPS: f64 = 1e-10;

    fn close(a: Option<f64>, b: f64, tol: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < tol)
    }

    #[test]
    fn test_describe_one_to_five() {
        let s = describe("x", &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(s.count, 5);
        assert!(close(s.mean, 3.0, NUMERICAL_EPS));
        assert!(close(s.median, 3.0, NUMERICAL_EPS));
        assert!(close(s.std, 1.5811, 1e-4));
        assert!(close(s.variance, 2.5, NUMERICAL_EPS));
        assert_eq!(s.min, Some(1.0));
        assert_eq!(s.max, Some(5.0));
        assert!(close(s.q25, 2.0, NUMERICAL_EPS));
        assert!(close(s.q75, 4.0, NUMERICAL_EPS));
        assert!(close(s.skewness, 0.0, NUMERICAL_EPS));
        // G2 of a discrete uniform on 5 points
        assert!(close(s.kurtosis, -1.2, 1e-10));
        assert_eq!(s.mode, Some(1.0));
    }

    #[test]
    fn test_quantile_interpolation() {
        let sorted = [1.0, 2.0, 4.0, 8.0];
        // h = 0.75 -> 1 + 0.75
        assert!(close(quantile(&sorted, 0.25), 1.75, NUMERICAL_EPS));
        assert!(close(quantile(&sorted, 0.5), 3.0, NUMERICAL_EPS));
        assert_eq!(quantile(&sorted, 1.0), Some(8.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_mode_ties_take_smallest() {
        assert_eq!(mode(&[1.0, 2.0, 2.0, 3.0, 3.0]), Some(2.0));
        assert_eq!(mode(&[4.0, 5.0, 6.0]), Some(4.0));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn test_skewness_known_value() {
        // [1, 2, 10]: mean 13/3, s2 = 146/3, s3 = 1190/9 (G1 ~ 1.6523)
        let g1 = skewness(&[1.0, 2.0, 10.0]).unwrap();
        let s2: f64 = 146.0 / 3.0;
        let s3 = 1190.0 / 9.0;
        let expected = 3.0 * 2.0f64.sqrt() * s3 / s2.powf(1.5);
        assert!((g1 - expected).abs() < 1e-10);
        assert!(g1 > 1.6 && g1 < 1.7);
    }

    #[test]
    fn test_small_samples_yield_none() {
        let s = describe("one", &[3.5]);
        assert_eq!(s.count, 1);
        assert_eq!(s.mean, Some(3.5));
        assert_eq!(s.variance, None);
        assert_eq!(s.std, None);
        assert_eq!(s.skewness, None);
        assert_eq!(s.kurtosis, None);

        let s = describe("empty", &[]);
        assert_eq!(s.count, 0);
        assert!(s.stats()[1..].iter().all(Option::is_none));
    }

    #[test]
    fn test_constant_column_shape_is_zero() {
        let s = describe("flat", &[0.1; 6]);
        assert_eq!(s.skewness, Some(0.0));
        assert_eq!(s.kurtosis, Some(0.0));
        assert!(close(s.std, 0.0, 1e-12));
    }

    #[test]
    fn test_infinite_value_gives_nulls() {
        let s = describe("x1", &[0.1, 0.4, f64::INFINITY, 0.3, 0.2]);
        assert_eq!(s.count, 5);
        assert_eq!(s.mean, None);
        assert_eq!(s.variance, None);
        assert_eq!(s.std, None);
        assert_eq!(s.skewness, None);
        assert_eq!(s.kurtosis, None);
        assert_eq!(s.max, None);
        assert_eq!(s.min, Some(0.1));
        assert!(close(s.median, 0.3, NUMERICAL_EPS));
        assert_eq!(s.q75, Some(0.4));
    }

    #[test]
    fn test_frequency_ignores_non_finite() {
        let h = histogram(&[0.0, f64::INFINITY, 1.0, f64::NEG_INFINITY, 2.0], 2).unwrap();
        assert_eq!(h.edges, vec![0.0, 1.0, 2.0]);
        assert_eq!(h.counts, vec![1, 2]);
        assert!(histogram(&[f64::INFINITY, f64::NAN], 4).is_none());
        assert!(histogram(&[-f64::MAX, f64::MAX], 4).is_none());

        let curve = gaussian_kde(&[0.0, 1.0, f64::INFINITY, 2.0], 5);
        assert_eq!(curve.len(), 5);
        assert!(curve.iter().all(|(x, d)| x.is_finite() && d.is_finite()));
    }

    #[test]
    fn test_summarize_skips_text_and_nulls() {
        let t = Table::new(vec![
            Column::text("id", vec![Some("a".into()), Some("b".into()), None]),
            Column::nullable("x", vec![Some(1.0), None, Some(3.0)]),
        ])
        .unwrap();
        let s = summarize(&t).unwrap();
        assert_eq!(s.len(), 1);
        let x = s.get("x").unwrap();
        assert_eq!(x.count, 2);
        assert_eq!(x.mean, Some(2.0));
    }

    #[test]
    fn test_summarize_without_numeric_columns() {
        let t = Table::new(vec![Column::text("id", vec![Some("a".into())])]).unwrap();
        assert!(matches!(
            summarize(&t),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_histogram_edges_and_counts() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4).unwrap();
        assert_eq!(h.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        // max lands in the closed last bin
        assert_eq!(h.counts, vec![1, 1, 1, 2]);
        assert_eq!(h.bin_width(), 1.0);
        assert_eq!(h.max_count(), 2);
    }

    #[test]
    fn test_histogram_constant_and_empty() {
        let h = histogram(&[2.0, 2.0], 2).unwrap();
        assert_eq!(h.edges, vec![1.5, 2.0, 2.5]);
        assert_eq!(h.counts, vec![0, 2]);
        assert!(histogram(&[], 10).is_none());
        assert!(histogram(&[1.0], 0).is_none());
    }

    #[test]
    fn test_gaussian_kde_integrates_near_one() {
        let values: Vec<f64> = (0..200).map(|i| i as f64 / 199.0).collect();
        let curve = gaussian_kde(&values, 400);
        assert_eq!(curve.len(), 400);
        let dx = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, d)| d * dx).sum();
        // grid only spans [min, max], so a little mass sits outside
        assert!(area > 0.8 && area < 1.01, "area = {area}");
        assert!(gaussian_kde(&[1.0, 1.0, 1.0], 10).is_empty());
    }
}
