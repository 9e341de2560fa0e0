//! CSV persistence of analysis results.
//!
//! Floats are written in shortest round-trip form and read back exactly;
//! null values are empty cells. Writers go straight to the given path;
//! [`super::ReportWriter`] points them at staged files.

use std::fs;
use std::path::Path;

use ce_fit_core::{
    ColumnSummary, CorrelationMatrix, CorrelationMethod, DenseMatrix, FitResult, SummaryTable,
};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::ReportError;

type Result<T> = core::result::Result<T, ReportError>;

/// Row label of the intercept in the fit results.
pub const INTERCEPT_LABEL: &str = "Intercept";

pub const FIT_RESULT_HEADER: [&str; 6] =
    ["Feature", "Coefficient", "R2_Score", "MSE", "RMSE", "Target"];
pub const FIT_PREDICTION_HEADER: [&str; 4] = ["Sample", "Observed", "Fitted", "Residual"];

pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

pub fn format_cell(value: Option<f64>) -> String {
    value.map(format_value).unwrap_or_default()
}

fn malformed(path: &Path, message: impl Into<String>) -> ReportError {
    ReportError::Malformed {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn parse_cell(path: &Path, field: &str) -> Result<Option<f64>> {
    if field.trim().is_empty() {
        return Ok(None);
    }
    field
        .trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| malformed(path, format!("'{field}' is not a number")))
}

fn parse_required(path: &Path, field: &str) -> Result<f64> {
    parse_cell(path, field)?.ok_or_else(|| malformed(path, "unexpected empty cell"))
}

/// Write `header` and `rows` to `path`, creating its directory.
pub fn write_csv<H, R>(path: &Path, header: &[H], rows: R) -> Result<()>
where
    H: AsRef<str>,
    R: IntoIterator<Item = Vec<String>>,
{
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(header.iter().map(|h| h.as_ref()))?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_records(path: &Path) -> Result<(StringRecord, Vec<StringRecord>)> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let header = reader.headers()?.clone();
    let records = reader.records().collect::<core::result::Result<Vec<_>, _>>()?;
    Ok((header, records))
}

/// Correlation matrix with labels on both axes and an empty corner cell.
pub fn write_correlation_matrix(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    let mut header = vec![String::new()];
    header.extend(matrix.labels().iter().cloned());
    let rows = matrix.labels().iter().enumerate().map(|(i, label)| {
        let mut row = vec![label.clone()];
        row.extend((0..matrix.len()).map(|j| format_cell(matrix.get(i, j))));
        row
    });
    write_csv(path, &header, rows)
}

pub fn read_correlation_matrix(
    path: &Path,
    method: CorrelationMethod,
) -> Result<CorrelationMatrix> {
    let (header, records) = read_records(path)?;
    let labels: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
    let k = labels.len();
    if records.len() != k {
        return Err(malformed(
            path,
            format!("{} rows for {k} columns", records.len()),
        ));
    }

    let mut values = DenseMatrix::filled(k, k, f64::NAN);
    for (i, record) in records.iter().enumerate() {
        if record.get(0) != Some(labels[i].as_str()) || record.len() != k + 1 {
            return Err(malformed(path, format!("row {i} does not match the header")));
        }
        for j in 0..k {
            if let Some(v) = parse_cell(path, &record[j + 1])? {
                values[(i, j)] = v;
            }
        }
    }
    CorrelationMatrix::from_parts(method, labels, values)
        .map_err(|e| malformed(path, e.to_string()))
}

/// One row per summarised column, one column per statistic.
pub fn write_summary(summary: &SummaryTable, path: &Path) -> Result<()> {
    let mut header = vec!["Column".to_string()];
    header.extend(ColumnSummary::STAT_NAMES.iter().map(|s| s.to_string()));
    let rows = summary.rows().iter().map(|row| {
        let mut cells = vec![row.name.clone()];
        cells.extend(row.stats().iter().map(|&v| format_cell(v)));
        cells
    });
    write_csv(path, &header, rows)
}

/// Coefficients table: one row per feature, then the intercept.
pub fn write_fit_results(fit: &FitResult, path: &Path) -> Result<()> {
    let metrics = [fit.r_squared, fit.mse, fit.rmse].map(format_value);
    let row = |feature: &str, coefficient: f64| {
        let mut cells = vec![feature.to_string(), format_value(coefficient)];
        cells.extend(metrics.iter().cloned());
        cells.push(fit.target_name.clone());
        cells
    };
    let rows: Vec<Vec<String>> = fit
        .feature_names
        .iter()
        .zip(fit.coefficients.iter())
        .map(|(name, &coef)| row(name, coef))
        .chain(std::iter::once(row(INTERCEPT_LABEL, fit.intercept)))
        .collect();
    write_csv(path, &FIT_RESULT_HEADER, rows)
}

/// Observed, fitted and residual value per sample.
pub fn write_fit_predictions(fit: &FitResult, path: &Path) -> Result<()> {
    let rows = (0..fit.observed.len()).map(|i| {
        vec![
            fit.sample_names.get(i).cloned().unwrap_or_else(|| i.to_string()),
            format_value(fit.observed[i]),
            format_value(fit.fitted_values[i]),
            format_value(fit.residuals[i]),
        ]
    });
    write_csv(path, &FIT_PREDICTION_HEADER, rows)
}

fn check_header(path: &Path, header: &StringRecord, expected: &[&str]) -> Result<()> {
    if header.iter().ne(expected.iter().copied()) {
        return Err(malformed(
            path,
            format!("expected header {}", expected.join(",")),
        ));
    }
    Ok(())
}

/// Rebuild a [`FitResult`] from its results and predictions files.
pub fn read_fit_result(results_path: &Path, predictions_path: &Path) -> Result<FitResult> {
    let (header, records) = read_records(results_path)?;
    check_header(results_path, &header, &FIT_RESULT_HEADER)?;
    let (last, features) = records
        .split_last()
        .ok_or_else(|| malformed(results_path, "no coefficient rows"))?;
    if &last[0] != INTERCEPT_LABEL {
        return Err(malformed(results_path, "last row is not the intercept"));
    }

    let mut feature_names = Vec::with_capacity(features.len());
    let mut coefficients = Vec::with_capacity(features.len());
    for record in features {
        feature_names.push(record[0].to_string());
        coefficients.push(parse_required(results_path, &record[1])?);
    }

    let (header, records) = read_records(predictions_path)?;
    check_header(predictions_path, &header, &FIT_PREDICTION_HEADER)?;
    let n = records.len();
    let mut sample_names = Vec::with_capacity(n);
    let mut observed = Vec::with_capacity(n);
    let mut fitted_values = Vec::with_capacity(n);
    let mut residuals = Vec::with_capacity(n);
    for record in &records {
        sample_names.push(record[0].to_string());
        observed.push(parse_required(predictions_path, &record[1])?);
        fitted_values.push(parse_required(predictions_path, &record[2])?);
        residuals.push(parse_required(predictions_path, &record[3])?);
    }

    Ok(FitResult {
        feature_names,
        target_name: last[5].to_string(),
        sample_names,
        coefficients,
        intercept: parse_required(results_path, &last[1])?,
        observed,
        fitted_values,
        residuals,
        r_squared: parse_required(results_path, &last[2])?,
        mse: parse_required(results_path, &last[3])?,
        rmse: parse_required(results_path, &last[4])?,
    })
}
