//! # zacros-ce-fit
//!
//! Analysis pipeline for Zacros cluster-expansion design tables.
//!
//! A table of cluster correlation functions (one row per lattice
//! configuration, one column per cluster, energies in the target column) is
//! loaded from CSV or a spreadsheet, then any of the following run on it:
//!
//! - Correlation matrices (Pearson, Kendall, Spearman) with heatmaps
//! - Frequency distributions of every numeric column
//! - A statistical summary per column
//! - An ordinary least-squares fit of the energy on the cluster descriptors
//!
//! Numerics live in [`ce_fit_core`]; this crate adds file loading,
//! configuration, report output and the command-line surface.

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod report;

pub use config::{AnalysisConfig, AnalysisToggles, FitPlotStyle, LoadOptions};
pub use error::{ConfigError, LoadError, PipelineError, ReportError};
pub use loader::TableLoader;
pub use pipeline::{run, run_on_table, AnalysisFailure, AnalysisKind, RunReport};
pub use report::ReportWriter;
