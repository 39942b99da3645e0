//! Export analysis results next to each other in an output directory.
//!
//! File names are derived from the input file's stem:
//! - `<stem>.txt`: the root report
//! - `<stem>.series.csv`: reduced velocity / frequency / damping table

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{ModeSeries, RootSet};
use crate::error::AppError;
use crate::report::format_roots;

/// Output path `<output_dir>/<input stem><suffix>`.
pub fn output_path(output_dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results".to_string());
    output_dir.join(format!("{stem}{suffix}"))
}

/// Make sure the output directory exists.
pub fn ensure_output_dir(output_dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(output_dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create output directory '{}': {e}", output_dir.display()),
        )
    })
}

/// Write the root report (`Mode  n: r1, r2, ...`) to `<stem>.txt`.
pub fn write_roots_report(output_dir: &Path, input: &Path, roots: &RootSet) -> Result<PathBuf, AppError> {
    let path = output_path(output_dir, input, ".txt");
    let mut file = File::create(&path)
        .map_err(|e| AppError::new(2, format!("Failed to create report '{}': {e}", path.display())))?;

    file.write_all(format_roots(roots).as_bytes())
        .map_err(|e| AppError::new(2, format!("Failed to write report '{}': {e}", path.display())))?;

    Ok(path)
}

/// Write the reduced series as CSV: `velocity, f1..fn, g1..gn`.
pub fn write_series_csv(path: &Path, series: &ModeSeries) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create series CSV '{}': {e}", path.display())))?;

    let num_modes = series.num_modes();
    let mut header = Vec::with_capacity(1 + 2 * num_modes);
    header.push("velocity".to_string());
    header.extend((1..=num_modes).map(|m| format!("f{m}")));
    header.extend((1..=num_modes).map(|m| format!("g{m}")));
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write series CSV header: {e}")))?;

    for step in 0..series.num_steps() {
        let mut row = Vec::with_capacity(header.len());
        row.push(series.velocities[step].to_string());
        row.extend(series.frequencies.row(step).iter().map(|v| v.to_string()));
        row.extend(series.dampings.row(step).iter().map(|v| v.to_string()));
        writer
            .write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write series CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush series CSV: {e}")))?;
    Ok(())
}
