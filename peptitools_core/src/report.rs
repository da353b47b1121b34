//! Export of dose-response results as a CSV table and an SVG plot
use std::fs::File;
use std::io;
use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::perturbation::dose_response::ResponseCurve;
use crate::perturbation::ic50::Ic50;
use crate::perturbation::table::DoseResponseTable;

/// Write the table as CSV with a header row
pub fn write_csv<W: io::Write>(table: &DoseResponseTable, writer: W) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in &table.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv_file<P: AsRef<Path>>(
    table: &DoseResponseTable,
    path: P,
) -> Result<(), ReportError> {
    let file = File::create(path.as_ref())?;
    write_csv(table, file)?;
    info!(path = %path.as_ref().display(), rows = table.len(), "wrote dose-response table");
    Ok(())
}

const PLOT_SIZE: (u32, u32) = (900, 600);

fn plot_error<E: std::error::Error>(err: E) -> ReportError {
    ReportError::Plot(err.to_string())
}

/// Plot the curves against a logarithmic concentration axis
///
/// Samples at zero concentration have no place on a log axis and are left out.
pub fn render_svg<P: AsRef<Path>>(curves: &[ResponseCurve], path: P) -> Result<(), ReportError> {
    let series: Vec<(&ResponseCurve, Vec<(f64, f64)>)> = curves
        .iter()
        .map(|c| {
            let points = c.series().into_iter().filter(|(x, _)| *x > 0.0).collect();
            (c, points)
        })
        .collect();

    let (mut x_min, mut x_max, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY, 0.0f64);
    for (x, y) in series.iter().flat_map(|(_, points)| points.iter()) {
        x_min = x_min.min(*x);
        x_max = x_max.max(*x);
        y_max = y_max.max(*y);
    }
    if !x_min.is_finite() || !x_max.is_finite() {
        return Err(ReportError::NothingToPlot);
    }
    if x_max <= x_min {
        x_max = x_min * 10.0;
    }
    let y_top = y_max.max(1e-3) * 1.1;

    let path = path.as_ref();
    let root = SVGBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Simulated growth inhibition", ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d((x_min..x_max).log_scale(), 0.0..y_top)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Inhibitor concentration (µM)")
        .y_desc("Growth rate (1/h)")
        .draw()
        .map_err(plot_error)?;

    for (curve, points) in &series {
        let color = RGBColor(
            curve.inhibitor.color.0,
            curve.inhibitor.color.1,
            curve.inhibitor.color.2,
        );
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(plot_error)?
            .label(format!("{} (IC50 {})", curve.inhibitor.name, curve.ic50))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        chart
            .draw_series(points.iter().map(|p| Circle::new(*p, 3, color.filled())))
            .map_err(plot_error)?;
        if let Ic50::Detected(ic50) = curve.ic50 {
            if ic50 > x_min && ic50 < x_max {
                chart
                    .draw_series(std::iter::once(PathElement::new(
                        vec![(ic50, 0.0), (ic50, y_top)],
                        color.mix(0.5),
                    )))
                    .map_err(plot_error)?;
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;
    root.present().map_err(plot_error)?;
    info!(path = %path.display(), curves = curves.len(), "wrote dose-response plot");
    Ok(())
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Unable to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unable to write report: {0}")]
    Io(#[from] io::Error),
    #[error("Unable to draw plot: {0}")]
    Plot(String),
    #[error("No samples with a positive concentration to plot")]
    NothingToPlot,
}
