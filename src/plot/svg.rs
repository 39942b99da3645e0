//! Plotters-powered V-g chart written to SVG.
//!
//! Layout mirrors the terminal chart: damping on top (with a zero reference
//! line), frequency below, one colored line with point markers per mode and a
//! legend labelled with 1-based mode numbers.

use std::error::Error;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::{Curves, pad_range, select_curves, value_range};
use crate::domain::{ModeSelection, ModeSeries};
use crate::error::AppError;

/// Default SVG size in pixels.
pub const SVG_SIZE: (u32, u32) = (1000, 1200);

/// Render the two-panel V-g diagram to an SVG file.
pub fn write_vg_svg(
    path: &Path,
    series: &ModeSeries,
    selection: &ModeSelection,
    title: &str,
    size: (u32, u32),
) -> Result<(), AppError> {
    draw_vg(path, series, selection, title, size).map_err(|e| {
        AppError::new(4, format!("Failed to render V-g chart '{}': {e}", path.display()))
    })
}

fn draw_vg(
    path: &Path,
    series: &ModeSeries,
    selection: &ModeSelection,
    title: &str,
    size: (u32, u32),
) -> Result<(), Box<dyn Error>> {
    let modes = selection.resolve(series.num_modes());
    let (dampings, frequencies) = select_curves(series, &modes);
    let velocities = series.velocities.as_slice();
    let (v_min, v_max) = value_range(velocities);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 22))?;

    let panels = root.split_evenly((2, 1));
    let panel = Panel {
        velocities,
        x_range: (v_min, v_max),
    };
    panel.draw(&panels[0], &dampings, "Log. Decrement", true)?;
    panel.draw(&panels[1], &frequencies, "Frequency, Hz", false)?;

    root.present()?;
    Ok(())
}

struct Panel<'a> {
    velocities: &'a [f64],
    x_range: (f64, f64),
}

impl Panel<'_> {
    /// Draw one panel. The damping panel carries the zero line and the legend.
    fn draw(
        &self,
        area: &DrawingArea<SVGBackend<'_>, Shift>,
        curves: &Curves,
        y_desc: &str,
        is_damping: bool,
    ) -> Result<(), Box<dyn Error>> {
        let (x0, x1) = self.x_range;
        let (y0, y1) = value_range(curves.iter().flat_map(|(_, values)| values));
        let (y0, y1) = pad_range(y0, y1, 0.05);

        let mut chart = ChartBuilder::on(area)
            .margin(12)
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc("Flow Velocity, m/s")
            .y_desc(y_desc)
            .label_style(("sans-serif", 14))
            .draw()?;

        if is_damping && y0 < 0.0 && y1 > 0.0 {
            chart.draw_series(LineSeries::new(
                vec![(x0, 0.0), (x1, 0.0)],
                BLACK.mix(0.6).stroke_width(1),
            ))?;
        }

        for (mode, values) in curves {
            let style = Palette99::pick(*mode).to_rgba().stroke_width(2);
            let points: Vec<(f64, f64)> = self
                .velocities
                .iter()
                .copied()
                .zip(values.iter().copied())
                .filter(|(v, y)| v.is_finite() && y.is_finite())
                .collect();

            chart
                .draw_series(LineSeries::new(points.iter().copied(), style))?
                .label(format!("{}", mode + 1))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
            chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, style.filled())))?;
        }

        if is_damping && !curves.is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()?;
        }

        Ok(())
    }
}
