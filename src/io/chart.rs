//! Read/write chart JSON files.
//!
//! Chart JSON is the portable form of one analysis:
//! - the reduced series (velocity sweep, per-mode frequency and damping)
//! - the root table
//! - which modes to draw
//!
//! `vg plot --chart <file>` re-renders it without the original tensor.
//! The schema is defined by `domain::ChartFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;
use nalgebra::{DMatrix, DVector};

use crate::domain::{ChartFile, ModeSelection, ModeSeries, RootSet};
use crate::error::AppError;

/// Build a chart file from in-memory results.
pub fn chart_from_series(
    source: &str,
    series: &ModeSeries,
    roots: &RootSet,
    modes: &ModeSelection,
) -> ChartFile {
    ChartFile {
        tool: "vg".to_string(),
        source: source.to_string(),
        generated: Utc::now(),
        modes: modes.clone(),
        velocities: series.velocities.iter().copied().collect(),
        frequencies: (0..series.num_modes()).map(|m| series.frequency(m)).collect(),
        dampings: (0..series.num_modes()).map(|m| series.damping(m)).collect(),
        roots: roots.clone(),
    }
}

/// Rebuild the step-major series from a chart file.
pub fn series_from_chart(chart: &ChartFile) -> Result<ModeSeries, AppError> {
    let num_steps = chart.velocities.len();
    let num_modes = chart.dampings.len();

    if chart.frequencies.len() != num_modes {
        return Err(AppError::new(
            2,
            format!(
                "Invalid chart JSON: {} frequency curves but {num_modes} damping curves.",
                chart.frequencies.len()
            ),
        ));
    }
    let ragged = chart
        .frequencies
        .iter()
        .chain(chart.dampings.iter())
        .any(|curve| curve.len() != num_steps);
    if ragged {
        return Err(AppError::new(
            2,
            format!("Invalid chart JSON: every curve must have {num_steps} points."),
        ));
    }

    Ok(ModeSeries {
        velocities: DVector::from_vec(chart.velocities.clone()),
        frequencies: DMatrix::from_fn(num_steps, num_modes, |step, mode| chart.frequencies[mode][step]),
        dampings: DMatrix::from_fn(num_steps, num_modes, |step, mode| chart.dampings[mode][step]),
    })
}

/// Write a chart JSON file.
pub fn write_chart_json(path: &Path, chart: &ChartFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create chart JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, chart)
        .map_err(|e| AppError::new(2, format!("Failed to write chart JSON: {e}")))?;

    Ok(())
}

/// Read a chart JSON file.
pub fn read_chart_json(path: &Path) -> Result<ChartFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open chart JSON '{}': {e}", path.display())))?;
    let chart: ChartFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid chart JSON: {e}")))?;
    Ok(chart)
}
