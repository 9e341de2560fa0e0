//! Plot rendering with the [`plotters`] bitmap backend.
//!
//! Each function draws one PNG at the given path from plain data and keeps
//! no state between calls. Callers choose the final location;
//! [`super::ReportWriter`] renders into staged files.

use std::path::Path;

use ce_fit_core::summary::{gaussian_kde, histogram};
use ce_fit_core::{CorrelationMatrix, FitResult};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Grid points of the density overlay.
const KDE_POINTS: usize = 200;

/// Null cells of the heatmap.
const MISSING_COLOR: RGBColor = RGBColor(200, 200, 200);
const NEGATIVE_COLOR: RGBColor = RGBColor(59, 76, 192);
const NEUTRAL_COLOR: RGBColor = RGBColor(247, 247, 247);
const POSITIVE_COLOR: RGBColor = RGBColor(180, 4, 38);

fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

fn lerp_color(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    RGBColor(
        lerp_channel(a.0, b.0, t),
        lerp_channel(a.1, b.1, t),
        lerp_channel(a.2, b.2, t),
    )
}

/// Blue at -1, near-white at 0, red at +1.
pub fn diverging_color(value: f64) -> RGBColor {
    let t = value.clamp(-1.0, 1.0);
    if t < 0.0 {
        lerp_color(NEUTRAL_COLOR, NEGATIVE_COLOR, -t)
    } else {
        lerp_color(NEUTRAL_COLOR, POSITIVE_COLOR, t)
    }
}

/// `[lo, hi]` widened by 5%, or by 0.5 on each side when empty.
fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    let span = hi - lo;
    if span > 0.0 {
        (lo - 0.05 * span, hi + 0.05 * span)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Annotated correlation heatmap, first label in the top row.
pub fn correlation_heatmap(matrix: &CorrelationMatrix, output_path: &Path) -> Result<()> {
    let k = matrix.len();
    if k == 0 {
        return Err(PlotError::InvalidData(
            "correlation matrix is empty".to_string(),
        ));
    }

    let side = (k as u32 * 70 + 320).clamp(800, 2400);
    let root = BitMapBackend::new(output_path, (side, side)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let extent = k as f64;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} Correlation Matrix", matrix.method().title()),
            ("sans-serif", 36),
        )
        .margin(20)
        .x_label_area_size(160)
        .y_label_area_size(160)
        .build_cartesian_2d(0.0..extent, 0.0..extent)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .disable_y_axis()
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    // row i is drawn at y = k - i - 1 so the first label sits on top
    let cells = (0..k).flat_map(|i| (0..k).map(move |j| (i, j)));
    chart
        .draw_series(cells.clone().map(|(i, j)| {
            let y = extent - i as f64 - 1.0;
            let color = matrix.get(i, j).map_or(MISSING_COLOR, diverging_color);
            Rectangle::new([(j as f64, y), (j as f64 + 1.0, y + 1.0)], color.filled())
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let font_size = (220 / k.max(1) as i32).clamp(10, 22);
    let centred = Pos::new(HPos::Center, VPos::Center);
    chart
        .draw_series(cells.map(|(i, j)| {
            let y = extent - i as f64 - 0.5;
            let label = matrix
                .get(i, j)
                .map_or_else(String::new, |r| format!("{r:.2}"));
            Text::new(
                label,
                (j as f64 + 0.5, y),
                ("sans-serif", font_size).into_font().color(&BLACK).pos(centred),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let label_style = ("sans-serif", 18).into_font().color(&BLACK);
    for (idx, name) in matrix.labels().iter().enumerate() {
        let centre = idx as f64 + 0.5;
        let (x, y) = chart.backend_coord(&(centre, 0.0));
        root.draw(&Text::new(
            name.clone(),
            (x, y + 10),
            label_style
                .clone()
                .transform(FontTransform::Rotate90)
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

        let (x, y) = chart.backend_coord(&(0.0, extent - centre));
        root.draw(&Text::new(
            name.clone(),
            (x - 10, y),
            label_style.clone().pos(Pos::new(HPos::Right, VPos::Center)),
        ))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Histogram of `values` with a Gaussian density curve scaled to counts.
pub fn frequency_plot(name: &str, values: &[f64], bins: usize, output_path: &Path) -> Result<()> {
    let hist = histogram(values, bins).ok_or_else(|| {
        PlotError::InvalidData(format!("column '{name}' has no values to bin"))
    })?;
    let width = hist.bin_width();
    let scale = values.len() as f64 * width;
    let density: Vec<(f64, f64)> = gaussian_kde(values, KDE_POINTS)
        .into_iter()
        .map(|(x, d)| (x, d * scale))
        .collect();

    let x_lo = hist.edges[0];
    let x_hi = hist.edges[hist.edges.len() - 1];
    let y_hi = density
        .iter()
        .map(|&(_, y)| y)
        .fold(hist.max_count() as f64, f64::max)
        .max(1.0)
        * 1.1;

    let root = BitMapBackend::new(output_path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Frequency Distribution of {name}"), ("sans-serif", 36))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_hi)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(name)
        .y_desc("Frequency")
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let bars = hist.counts.iter().enumerate().map(|(k, &c)| {
        [(hist.edges[k], 0.0), (hist.edges[k + 1], c as f64)]
    });
    chart
        .draw_series(
            bars.clone()
                .map(|corners| Rectangle::new(corners, BLUE.mix(0.5).filled())),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    chart
        .draw_series(bars.map(|corners| Rectangle::new(corners, BLACK.stroke_width(1))))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if !density.is_empty() {
        chart
            .draw_series(LineSeries::new(density, RED.stroke_width(2)))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

fn check_fit(fit: &FitResult) -> Result<()> {
    if fit.observed.is_empty() || fit.observed.len() != fit.fitted_values.len() {
        return Err(PlotError::InvalidData(
            "fit has no observed/predicted pairs".to_string(),
        ));
    }
    Ok(())
}

/// Predicted against observed values with the identity line.
pub fn parity_plot(fit: &FitResult, output_path: &Path) -> Result<()> {
    check_fit(fit)?;
    let (lo, hi) = min_max(fit.observed.iter().chain(fit.fitted_values.iter()).copied())
        .map(|(lo, hi)| padded_range(lo, hi))
        .unwrap_or((-0.5, 0.5));

    let root = BitMapBackend::new(output_path, (1000, 1000)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("CE Fit: R2 = {:.4}, RMSE = {:.4e}", fit.r_squared, fit.rmse),
            ("sans-serif", 32),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(lo..hi, lo..hi)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(format!("Actual {}", fit.target_name))
        .y_desc(format!("Predicted {}", fit.target_name))
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(vec![(lo, lo), (hi, hi)], BLACK.stroke_width(1)))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    chart
        .draw_series(
            fit.observed
                .iter()
                .zip(fit.fitted_values.iter())
                .map(|(&o, &p)| Circle::new((o, p), 5, BLUE.mix(0.7).filled())),
        )
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Observed and predicted values against sample index.
pub fn line_plot(fit: &FitResult, output_path: &Path) -> Result<()> {
    check_fit(fit)?;
    let n = fit.observed.len();
    let (lo, hi) = min_max(fit.observed.iter().chain(fit.fitted_values.iter()).copied())
        .map(|(lo, hi)| padded_range(lo, hi))
        .unwrap_or((-0.5, 0.5));
    let x_hi = (n.max(2) - 1) as f64;

    let root = BitMapBackend::new(output_path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("CE Fit: R2 = {:.4}, RMSE = {:.4e}", fit.r_squared, fit.rmse),
            ("sans-serif", 32),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(0.0..x_hi, lo..hi)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Sample")
        .y_desc(fit.target_name.as_str())
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let series = [
        ("Actual", &fit.observed, BLUE),
        ("Predicted", &fit.fitted_values, RED),
    ];
    for (label, values, color) in series {
        chart
            .draw_series(LineSeries::new(
                values.iter().enumerate().map(|(i, &v)| (i as f64, v)),
                color.stroke_width(2),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}
