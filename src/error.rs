//! Error types of the front-end layers.
//!
//! Numerical failures come from [`ce_fit_core::AnalysisError`]; everything
//! here wraps file access, configuration and report output around it.

use std::path::PathBuf;

use ce_fit_core::AnalysisError;
use thiserror::Error;

use crate::report::plots::PlotError;

/// Failure to turn an input file into a table.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unsupported input format '{0}' (expected csv, xlsx, xlsm, xls, xlsb or ods)")]
    UnsupportedFormat(String),

    #[error("failed to parse CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read workbook {}: {message}", path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("sheet '{sheet}' not found in {}", path.display())]
    SheetNotFound { path: PathBuf, sheet: String },

    #[error("{} contains no data", .0.display())]
    Empty(PathBuf),

    #[error("malformed table: {0}")]
    Table(#[from] AnalysisError),
}

/// Invalid or unreadable analysis configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failure while persisting tables or images.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("plot error: {0}")]
    Plot(#[from] PlotError),

    #[error("failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("malformed report file {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
}

/// Why one analysis of a run failed.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
