//! Command-line surface: argument parsing, config assembly and exit codes.

use std::path::PathBuf;
use std::process::ExitCode;

use ce_fit_core::{CorrelationMethod, SampleAxis, TargetSelector};
use clap::{ArgAction, Parser};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{AnalysisConfig, AnalysisToggles, FitPlotStyle};
use crate::error::ConfigError;
use crate::pipeline::RunReport;

/// Exit status of the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    /// Every requested analysis completed.
    Success = 0,
    /// The input or configuration could not be used; nothing ran.
    InputError = 1,
    /// At least one analysis failed; the others still wrote their results.
    AnalysisFailed = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&RunReport> for CliExitCode {
    fn from(report: &RunReport) -> Self {
        if report.is_success() {
            CliExitCode::Success
        } else {
            CliExitCode::AnalysisFailed
        }
    }
}

/// Correlation, frequency, summary and least-squares analysis of cluster-expansion tables
#[derive(Parser, Debug)]
#[command(name = "zacros-ce-fit")]
#[command(version)]
#[command(
    about = "Correlation diagnostics, statistical summaries and cluster-expansion fits for Zacros design tables"
)]
pub struct Cli {
    /// Input table (.csv, .xlsx, .xlsm, .xls, .xlsb or .ods)
    pub file: PathBuf,

    /// Run the correlation analysis
    #[arg(long)]
    pub correlation: bool,

    /// Plot frequency distributions of every numeric column
    #[arg(long)]
    pub histograms: bool,

    /// Fit the cluster-expansion energy model
    #[arg(long = "ce-fit", alias = "CEfit")]
    pub ce_fit: bool,

    /// Correlate only the first N columns
    #[arg(long, value_name = "N")]
    pub ncols: Option<usize>,

    /// Correlation methods, comma separated
    #[arg(long, value_delimiter = ',', value_name = "METHODS")]
    pub methods: Option<Vec<CorrelationMethod>>,

    /// Axis holding the samples: rows or columns
    #[arg(long, value_name = "AXIS")]
    pub sample_axis: Option<SampleAxis>,

    /// Fit target: last, a zero-based index, or a name
    #[arg(long, value_name = "TARGET")]
    pub target: Option<TargetSelector>,

    /// Keep the first column as data instead of row labels
    #[arg(long)]
    pub keep_first_column: bool,

    /// Drop the last column before analysis
    #[arg(long)]
    pub drop_last_column: bool,

    /// Workbook sheet to read
    #[arg(long, value_name = "NAME")]
    pub sheet: Option<String>,

    /// Fit plot style: parity or line
    #[arg(long, value_name = "STYLE")]
    pub fit_plot: Option<FitPlotStyle>,

    /// Output root (defaults to the input file's directory)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write tables only, no PNG plots
    #[arg(long)]
    pub no_plots: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied, validated.
    pub fn to_config(&self) -> Result<AnalysisConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };

        if self.correlation || self.histograms || self.ce_fit {
            let summary = config.analyses.summary;
            config.analyses =
                AnalysisToggles::from_selection(self.correlation, self.histograms, self.ce_fit);
            config.analyses.summary = summary;
        }
        if let Some(n) = self.ncols {
            config.column_limit = Some(n);
        }
        if let Some(methods) = &self.methods {
            config.correlation_methods = methods.clone();
        }
        if let Some(axis) = self.sample_axis {
            config.fit.sample_axis = axis;
        }
        if let Some(target) = &self.target {
            config.fit.target = target.clone();
        }
        if self.keep_first_column {
            config.load.drop_first_column = false;
        }
        if self.drop_last_column {
            config.load.drop_last_column = true;
        }
        if let Some(sheet) = &self.sheet {
            config.load.sheet = Some(sheet.clone());
        }
        if let Some(style) = self.fit_plot {
            config.fit_plot = style;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if self.no_plots {
            config.render_plots = false;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Install the stderr log subscriber for the given `-v` count.
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}
