//! Error type shared by every analysis in this crate.

use thiserror::Error;

/// Errors raised by the numerical analyses.
///
/// Each analysis fails independently; callers decide whether a failure in
/// one analysis aborts anything else.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error(
        "rank-deficient design: {samples} samples cannot determine {parameters} parameters (effective rank {rank})"
    )]
    RankDeficiency {
        samples: usize,
        parameters: usize,
        rank: usize,
    },

    #[error("dimension mismatch: {features} feature samples but {targets} target values")]
    DimensionMismatch { features: usize, targets: usize },

    #[error("column '{0}' is not numeric")]
    NonNumericColumn(String),

    #[error("unknown column or row: {0}")]
    UnknownColumn(String),

    #[error("column '{column}' has {found} values, expected {expected}")]
    RaggedTable {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("numerical failure: {0}")]
    Numerical(String),
}

pub type Result<T> = core::result::Result<T, AnalysisError>;
