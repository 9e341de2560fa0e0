//! Running the configured analyses over one table.
//!
//! The table is loaded once and every enabled analysis runs against it in
//! a fixed order: correlation, histograms, summary, fit. A failing analysis
//! is recorded and the remaining ones still run.

use std::fmt;
use std::path::{Path, PathBuf};

use ce_fit_core::summary::histogram;
use ce_fit_core::{
    correlate, fit_table, summarize, AnalysisError, CorrelationSet, FitResult, Histogram,
    SummaryTable, Table,
};
use tracing::{error, info};

use crate::config::AnalysisConfig;
use crate::error::{LoadError, PipelineError};
use crate::loader::TableLoader;
use crate::report::ReportWriter;

/// The analyses a run can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    Correlation,
    Histograms,
    Summary,
    Fit,
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnalysisKind::Correlation => "correlation analysis",
            AnalysisKind::Histograms => "frequency distributions",
            AnalysisKind::Summary => "statistical summary",
            AnalysisKind::Fit => "CE fit",
        })
    }
}

/// One analysis that did not complete.
#[derive(Debug)]
pub struct AnalysisFailure {
    pub kind: AnalysisKind,
    pub error: PipelineError,
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.kind, self.error)
    }
}

/// Outcome of a run: what completed, what failed and what was written.
#[derive(Debug)]
pub struct RunReport {
    pub output_root: PathBuf,
    pub completed: Vec<AnalysisKind>,
    pub failures: Vec<AnalysisFailure>,
    pub artifacts: Vec<PathBuf>,
    pub correlations: Option<CorrelationSet>,
    /// Per numeric column, in table order.
    pub histograms: Vec<(String, Histogram)>,
    pub summary: Option<SummaryTable>,
    pub fit: Option<FitResult>,
}

impl RunReport {
    fn new(output_root: &Path) -> Self {
        Self {
            output_root: output_root.to_path_buf(),
            completed: Vec::new(),
            failures: Vec::new(),
            artifacts: Vec::new(),
            correlations: None,
            histograms: Vec::new(),
            summary: None,
            fit: None,
        }
    }

    /// True when no analysis failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure(&self, kind: AnalysisKind) -> Option<&AnalysisFailure> {
        self.failures.iter().find(|f| f.kind == kind)
    }

    fn record<T>(
        &mut self,
        kind: AnalysisKind,
        outcome: Result<(T, Vec<PathBuf>), PipelineError>,
    ) -> Option<T> {
        match outcome {
            Ok((value, written)) => {
                info!(analysis = %kind, files = written.len(), "analysis complete");
                self.completed.push(kind);
                self.artifacts.extend(written);
                Some(value)
            }
            Err(err) => {
                error!(analysis = %kind, error = %err, "analysis failed");
                self.failures.push(AnalysisFailure { kind, error: err });
                None
            }
        }
    }
}

type StepResult<T> = Result<(T, Vec<PathBuf>), PipelineError>;

fn correlation_step(
    table: &Table,
    config: &AnalysisConfig,
    writer: &ReportWriter,
) -> StepResult<CorrelationSet> {
    let set = correlate(table, &config.correlation_methods, config.column_limit)?;
    let written = writer.write_correlations(&set)?;
    Ok((set, written))
}

fn histogram_step(
    table: &Table,
    config: &AnalysisConfig,
    writer: &ReportWriter,
) -> StepResult<Vec<(String, Histogram)>> {
    let histograms: Vec<(String, Histogram)> = table
        .numeric_columns()
        .filter_map(|c| {
            histogram(&c.values(), config.histogram_bins).map(|h| (c.name().to_string(), h))
        })
        .collect();
    if histograms.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "frequency distributions need a numeric column with values".to_string(),
        )
        .into());
    }
    let written = writer.write_frequency_plots(table, config.histogram_bins)?;
    Ok((histograms, written))
}

fn summary_step(table: &Table, writer: &ReportWriter) -> StepResult<SummaryTable> {
    let summary = summarize(table)?;
    let written = writer.write_summary(&summary)?;
    Ok((summary, written))
}

fn fit_step(table: &Table, config: &AnalysisConfig, writer: &ReportWriter) -> StepResult<FitResult> {
    let fit = fit_table(table, &config.fit)?;
    let written = writer.write_fit(&fit, config.fit_plot)?;
    Ok((fit, written))
}

/// Run every enabled analysis on an in-memory table.
pub fn run_on_table(table: &Table, output_root: &Path, config: &AnalysisConfig) -> RunReport {
    let writer = ReportWriter::new(output_root).with_plots(config.render_plots);
    let mut report = RunReport::new(output_root);
    let toggles = config.analyses;

    if toggles.correlation {
        let outcome = correlation_step(table, config, &writer);
        report.correlations = report.record(AnalysisKind::Correlation, outcome);
    }
    if toggles.histograms {
        let outcome = histogram_step(table, config, &writer);
        report.histograms = report
            .record(AnalysisKind::Histograms, outcome)
            .unwrap_or_default();
    }
    if toggles.summary {
        let outcome = summary_step(table, &writer);
        report.summary = report.record(AnalysisKind::Summary, outcome);
    }
    if toggles.fit {
        let outcome = fit_step(table, config, &writer);
        report.fit = report.record(AnalysisKind::Fit, outcome);
    }
    report
}

/// Load `input` and run every enabled analysis on it.
///
/// Only loading can fail the whole run; analysis failures are collected in
/// [`RunReport::failures`].
pub fn run(input: &Path, config: &AnalysisConfig) -> Result<RunReport, LoadError> {
    let table = TableLoader::new(config.load.clone()).load(input)?;
    let root = config.output_root(input);
    info!(output = %root.display(), "running analyses");
    Ok(run_on_table(&table, &root, config))
}
