//! Analysis configuration.
//!
//! Everything a run needs is carried by one statically typed
//! [`AnalysisConfig`]. It deserialises from JSON with every field optional;
//! command-line flags are applied on top by the CLI layer.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ce_fit_core::{CorrelationMethod, FitConfig};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Bin count used by the frequency plots unless configured otherwise.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Column trimming and sheet choice applied while loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// Drop the first column (configuration ids) and keep it as row labels.
    pub drop_first_column: bool,
    pub drop_last_column: bool,
    /// Workbook sheet; the first sheet when unset.
    pub sheet: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            drop_first_column: true,
            drop_last_column: false,
            sheet: None,
        }
    }
}

/// Which analyses a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisToggles {
    pub correlation: bool,
    pub histograms: bool,
    pub summary: bool,
    pub fit: bool,
}

impl Default for AnalysisToggles {
    fn default() -> Self {
        Self {
            correlation: true,
            histograms: true,
            summary: true,
            fit: true,
        }
    }
}

impl AnalysisToggles {
    /// Toggles from command-line selection flags.
    ///
    /// Selecting nothing runs every analysis. The summary is not selectable
    /// and always runs.
    pub fn from_selection(correlation: bool, histograms: bool, fit: bool) -> Self {
        if !(correlation || histograms || fit) {
            return Self::default();
        }
        Self {
            correlation,
            histograms,
            summary: true,
            fit,
        }
    }

    pub fn any(&self) -> bool {
        self.correlation || self.histograms || self.summary || self.fit
    }
}

/// Rendering of the fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitPlotStyle {
    /// Predicted against observed with a 45 degree reference line.
    #[default]
    Parity,
    /// Observed and predicted values against sample index.
    Line,
}

impl FromStr for FitPlotStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parity" | "scatter" => Ok(FitPlotStyle::Parity),
            "line" => Ok(FitPlotStyle::Line),
            other => Err(ConfigError::Invalid(format!(
                "unknown fit plot style '{other}' (expected parity or line)"
            ))),
        }
    }
}

impl fmt::Display for FitPlotStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitPlotStyle::Parity => f.write_str("parity"),
            FitPlotStyle::Line => f.write_str("line"),
        }
    }
}

/// Full configuration of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub load: LoadOptions,
    pub analyses: AnalysisToggles,
    pub correlation_methods: Vec<CorrelationMethod>,
    /// Correlate only the first N columns.
    pub column_limit: Option<usize>,
    pub fit: FitConfig,
    pub fit_plot: FitPlotStyle,
    pub histogram_bins: usize,
    pub render_plots: bool,
    /// Output root; the input file's directory when unset.
    pub output_dir: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            analyses: AnalysisToggles::default(),
            correlation_methods: CorrelationMethod::ALL.to_vec(),
            column_limit: None,
            fit: FitConfig::default(),
            fit_plot: FitPlotStyle::default(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            render_plots: true,
            output_dir: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analyses.correlation && self.correlation_methods.is_empty() {
            return Err(ConfigError::Invalid(
                "correlation_methods must name at least one method".to_string(),
            ));
        }
        if self.histogram_bins == 0 {
            return Err(ConfigError::Invalid(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.column_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "column_limit must be at least 1".to_string(),
            ));
        }
        if !self.analyses.any() {
            return Err(ConfigError::Invalid("every analysis is disabled".to_string()));
        }
        Ok(())
    }

    /// Directory that receives every artifact of a run on `input`.
    pub fn output_root(&self, input: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => match input.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        }
    }
}
