//! # ce-fit-core
//!
//! Numerical core for analysing cluster-expansion design tables.
//!
//! - Correlation matrices (Pearson, Kendall tau-b, Spearman) over numeric columns
//! - Descriptive statistics per column, histograms and Gaussian KDE curves
//! - Ordinary least-squares fit of `energy = X beta + intercept` with explicit
//!   sample-axis and target selection
//!
//! ## Data Layout
//!
//! A [`Table`] holds named columns of `Option<f64>` (or text) cells. Dense
//! numeric blocks are [`DenseMatrix`] values stored column-major:
//! `data[i + j * nrows]` is row `i`, column `j`.

#![allow(clippy::needless_range_loop)]

pub mod parallel;

pub mod correlation;
pub mod error;
pub mod helpers;
pub mod matrix;
pub mod regression;
pub mod summary;
pub mod table;

pub use correlation::{
    correlate, correlation_matrix, CorrelationMatrix, CorrelationMethod, CorrelationSet,
};
pub use error::{AnalysisError, Result};
pub use matrix::DenseMatrix;
pub use regression::{
    fit_ols, fit_table, partition, DesignPartition, FitConfig, FitResult, SampleAxis,
    TargetSelector,
};
pub use summary::{
    describe, gaussian_kde, histogram, summarize, ColumnSummary, Histogram, SummaryTable,
};
pub use table::{Column, ColumnData, Table};
