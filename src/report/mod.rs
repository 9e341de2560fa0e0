//! Persisting analysis results under one output root.
//!
//! Layout:
//!
//! ```text
//! <root>/correlation_matrices/correlation_<method>.csv|.png
//! <root>/frequency_distributions/<column>_frequency.png
//! <root>/statistical_summary/statistical_summary.csv
//! <root>/ce_fit/CE_fit_results.csv
//! <root>/ce_fit/CE_fit_predictions.csv
//! <root>/ce_fit/CE_fit_plot.png
//! ```
//!
//! All files of one analysis are first written to temporary files next to
//! their destinations. They are renamed into place only once every one of
//! them was produced, so a failing analysis leaves none of its files behind.

pub mod plots;
pub mod tables;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ce_fit_core::{CorrelationMethod, CorrelationSet, FitResult, SummaryTable, Table};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::config::FitPlotStyle;
use crate::error::ReportError;

type Result<T> = core::result::Result<T, ReportError>;

pub const CORRELATION_DIR: &str = "correlation_matrices";
pub const FREQUENCY_DIR: &str = "frequency_distributions";
pub const SUMMARY_DIR: &str = "statistical_summary";
pub const FIT_DIR: &str = "ce_fit";

pub const SUMMARY_FILE: &str = "statistical_summary.csv";
pub const FIT_RESULTS_FILE: &str = "CE_fit_results.csv";
pub const FIT_PREDICTIONS_FILE: &str = "CE_fit_predictions.csv";
pub const FIT_PLOT_FILE: &str = "CE_fit_plot.png";

/// Files of one analysis, staged beside their destinations.
///
/// Dropping a `Staged` without [`Staged::commit`] removes every staged file.
#[derive(Debug, Default)]
pub struct Staged {
    files: Vec<(NamedTempFile, PathBuf)>,
}

impl Staged {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a temporary file in `dest`'s directory and let `write` fill it.
    ///
    /// The temporary file keeps `dest`'s extension, which the plot backend
    /// uses to pick the image encoder.
    pub fn stage<F>(&mut self, dest: PathBuf, write: F) -> Result<()>
    where
        F: FnOnce(&Path) -> Result<()>,
    {
        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let suffix = dest
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let tmp = tempfile::Builder::new()
            .prefix(".stage-")
            .suffix(&suffix)
            .tempfile_in(dir)?;
        write(tmp.path())?;
        self.files.push((tmp, dest));
        Ok(())
    }

    /// Move every staged file to its destination, in staging order.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.files.len());
        for (tmp, dest) in self.files {
            tmp.persist(&dest)?;
            debug!(path = %dest.display(), "wrote artifact");
            written.push(dest);
        }
        Ok(written)
    }
}

/// File-name-safe form of a column name.
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = stem.trim();
    if stem.is_empty() || stem == "." || stem == ".." {
        "column".to_string()
    } else {
        stem.to_string()
    }
}

/// One file stem per name, suffixed `_2`, `_3`, ... where stems would collide.
///
/// Collisions are checked case-insensitively.
pub fn unique_stems<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();
    names
        .into_iter()
        .map(|name| {
            let base = file_stem(name);
            let mut stem = base.clone();
            let mut k = 2;
            while !taken.insert(stem.to_lowercase()) {
                stem = format!("{base}_{k}");
                k += 1;
            }
            stem
        })
        .collect()
}

/// Writes tables and plots for each analysis under one root directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    root: PathBuf,
    render_plots: bool,
}

impl ReportWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            render_plots: true,
        }
    }

    /// Skip PNG output when `false`; tables are always written.
    pub fn with_plots(mut self, render_plots: bool) -> Self {
        self.render_plots = render_plots;
        self
    }

    pub fn correlation_path(&self, method: CorrelationMethod, extension: &str) -> PathBuf {
        self.root
            .join(CORRELATION_DIR)
            .join(format!("correlation_{}.{extension}", method.name()))
    }

    /// Frequency plot paths for `columns`, distinct even when names sanitise alike.
    pub fn frequency_paths<'a>(&self, columns: impl IntoIterator<Item = &'a str>) -> Vec<PathBuf> {
        unique_stems(columns)
            .into_iter()
            .map(|stem| self.root.join(FREQUENCY_DIR).join(format!("{stem}_frequency.png")))
            .collect()
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join(SUMMARY_DIR).join(SUMMARY_FILE)
    }

    pub fn fit_results_path(&self) -> PathBuf {
        self.root.join(FIT_DIR).join(FIT_RESULTS_FILE)
    }

    pub fn fit_predictions_path(&self) -> PathBuf {
        self.root.join(FIT_DIR).join(FIT_PREDICTIONS_FILE)
    }

    pub fn fit_plot_path(&self) -> PathBuf {
        self.root.join(FIT_DIR).join(FIT_PLOT_FILE)
    }

    /// One CSV (and heatmap) per method.
    pub fn write_correlations(&self, set: &CorrelationSet) -> Result<Vec<PathBuf>> {
        let mut staged = Staged::new();
        for matrix in set {
            staged.stage(self.correlation_path(matrix.method(), "csv"), |p| {
                tables::write_correlation_matrix(matrix, p)
            })?;
            if self.render_plots {
                staged.stage(self.correlation_path(matrix.method(), "png"), |p| {
                    Ok(plots::correlation_heatmap(matrix, p)?)
                })?;
            }
        }
        let written = staged.commit()?;
        info!(files = written.len(), "correlation results saved");
        Ok(written)
    }

    /// Histogram with density overlay for every numeric column with data.
    pub fn write_frequency_plots(&self, table: &Table, bins: usize) -> Result<Vec<PathBuf>> {
        if !self.render_plots {
            return Ok(Vec::new());
        }
        let columns: Vec<_> = table.numeric_columns().collect();
        let paths = self.frequency_paths(columns.iter().map(|c| c.name()));
        let mut staged = Staged::new();
        for (column, path) in columns.into_iter().zip(paths) {
            let values = column.values();
            if values.is_empty() {
                warn!(column = column.name(), "no values, skipping frequency plot");
                continue;
            }
            staged.stage(path, |p| {
                Ok(plots::frequency_plot(column.name(), &values, bins, p)?)
            })?;
        }
        let written = staged.commit()?;
        info!(files = written.len(), "frequency distributions saved");
        Ok(written)
    }

    pub fn write_summary(&self, summary: &SummaryTable) -> Result<Vec<PathBuf>> {
        let mut staged = Staged::new();
        staged.stage(self.summary_path(), |p| tables::write_summary(summary, p))?;
        let written = staged.commit()?;
        info!("statistical summary saved");
        Ok(written)
    }

    /// Coefficient table, per-sample predictions and the fit plot.
    pub fn write_fit(&self, fit: &FitResult, style: FitPlotStyle) -> Result<Vec<PathBuf>> {
        let mut staged = Staged::new();
        staged.stage(self.fit_results_path(), |p| tables::write_fit_results(fit, p))?;
        staged.stage(self.fit_predictions_path(), |p| {
            tables::write_fit_predictions(fit, p)
        })?;
        if self.render_plots {
            staged.stage(self.fit_plot_path(), |p| {
                Ok(match style {
                    FitPlotStyle::Parity => plots::parity_plot(fit, p),
                    FitPlotStyle::Line => plots::line_plot(fit, p),
                }?)
            })?;
        }
        let written = staged.commit()?;
        info!(files = written.len(), "CE fit results saved");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plots::PlotError;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let w = ReportWriter::new("/out");
        assert_eq!(
            w.correlation_path(CorrelationMethod::Kendall, "csv"),
            PathBuf::from("/out/correlation_matrices/correlation_kendall.csv")
        );
        assert_eq!(
            w.frequency_paths(["E_DFT"]),
            vec![PathBuf::from("/out/frequency_distributions/E_DFT_frequency.png")]
        );
        assert_eq!(
            w.summary_path(),
            PathBuf::from("/out/statistical_summary/statistical_summary.csv")
        );
        assert_eq!(
            w.fit_results_path(),
            PathBuf::from("/out/ce_fit/CE_fit_results.csv")
        );
        assert_eq!(w.fit_plot_path(), PathBuf::from("/out/ce_fit/CE_fit_plot.png"));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("E/atom"), "E_atom");
        assert_eq!(file_stem("  "), "column");
        assert_eq!(file_stem(".."), "column");
        assert_eq!(file_stem("pair 1"), "pair 1");
    }

    #[test]
    fn test_colliding_stems_get_suffixes() {
        assert_eq!(
            unique_stems(["E/atom", "E_atom", "E:atom", "E_atom_2", "e_atom"]),
            vec!["E_atom", "E_atom_2", "E_atom_3", "E_atom_2_2", "e_atom_4"]
        );
        let w = ReportWriter::new("/out");
        let paths = w.frequency_paths(["E/atom", "E_atom"]);
        assert_eq!(
            paths[1],
            PathBuf::from("/out/frequency_distributions/E_atom_2_frequency.png")
        );
    }

    #[test]
    fn test_staged_files_land_together() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("ce_fit").join("a.csv");
        let b = dir.path().join("ce_fit").join("b.csv");
        let mut staged = Staged::new();
        staged.stage(a.clone(), |p| Ok(fs::write(p, "a\n")?)).unwrap();
        staged.stage(b.clone(), |p| Ok(fs::write(p, "b\n")?)).unwrap();
        assert!(!a.exists() && !b.exists());

        assert_eq!(staged.commit().unwrap(), vec![a.clone(), b.clone()]);
        assert_eq!(fs::read_to_string(&a).unwrap(), "a\n");
        assert_eq!(fs::read_to_string(&b).unwrap(), "b\n");
        assert_eq!(fs::read_dir(dir.path().join("ce_fit")).unwrap().count(), 2);
    }

    #[test]
    fn test_failure_discards_earlier_staged_files() {
        let dir = TempDir::new().unwrap();
        let plots_dir = dir.path().join("correlation_matrices");
        let mut staged = Staged::new();
        staged
            .stage(plots_dir.join("correlation_pearson.csv"), |p| {
                Ok(fs::write(p, ",a\na,1\n")?)
            })
            .unwrap();
        let err = staged
            .stage(plots_dir.join("correlation_kendall.png"), |_| {
                Err(PlotError::InvalidData("nothing to draw".into()).into())
            })
            .unwrap_err();
        assert!(matches!(err, ReportError::Plot(PlotError::InvalidData(_))));

        drop(staged);
        assert_eq!(fs::read_dir(&plots_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_staged_temp_keeps_extension() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("x.png");
        let mut staged = Staged::new();
        staged
            .stage(dest.clone(), |p| {
                assert_eq!(p.extension().and_then(|e| e.to_str()), Some("png"));
                Ok(())
            })
            .unwrap();
        assert_eq!(staged.commit().unwrap(), vec![dest.clone()]);
        assert!(dest.is_file());
    }

    #[test]
    fn test_frequency_plots_skipped_without_rendering() {
        let dir = TempDir::new().unwrap();
        let table = Table::new(vec![ce_fit_core::Column::numeric("x", vec![1.0, 2.0])]).unwrap();
        let w = ReportWriter::new(dir.path()).with_plots(false);
        assert!(w.write_frequency_plots(&table, 10).unwrap().is_empty());
        assert!(!dir.path().join(FREQUENCY_DIR).exists());
    }

    #[test]
    fn test_tables_written_without_plots() {
        let dir = TempDir::new().unwrap();
        let table = Table::new(vec![
            ce_fit_core::Column::numeric("pair", vec![0.1, 0.4, 0.35, 0.8]),
            ce_fit_core::Column::numeric("E", vec![-1.1, -0.7, -0.9, -0.2]),
        ])
        .unwrap();
        let w = ReportWriter::new(dir.path()).with_plots(false);
        let set = ce_fit_core::correlate(&table, &CorrelationMethod::ALL, None).unwrap();
        let written = w.write_correlations(&set).unwrap();
        assert_eq!(written.len(), 3);
        assert!(written.iter().all(|p| p.is_file()));
        // no staging leftovers
        assert_eq!(fs::read_dir(dir.path().join(CORRELATION_DIR)).unwrap().count(), 3);
    }
}
