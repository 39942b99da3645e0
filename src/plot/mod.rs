//! V-g diagram rendering.
//!
//! Both renderers draw the same two panels over the flow-velocity sweep:
//! damping (top, with a zero reference) and frequency (bottom). The mode
//! filter is applied here; the numerical core always hands over every mode.
//!
//! - `ascii`: fixed-size character grid for terminal output
//! - `svg`: Plotters chart written to an SVG file

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;

use crate::domain::ModeSeries;

/// Curves of one panel: `(mode, values per flow step)`.
pub(crate) type Curves = Vec<(usize, Vec<f64>)>;

/// Damping and frequency curves of the modes to draw.
pub(crate) fn select_curves(series: &ModeSeries, modes: &[usize]) -> (Curves, Curves) {
    let dampings = modes.iter().map(|&m| (m, series.damping(m))).collect();
    let frequencies = modes.iter().map(|&m| (m, series.frequency(m))).collect();
    (dampings, frequencies)
}

/// Finite min/max of all values, widened when degenerate.
///
/// A flat range `[v, v]` becomes `[v - 1, v + 1]`; no finite values gives `[0, 1]`.
pub(crate) fn value_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }

    if !(min.is_finite() && max.is_finite()) {
        (0.0, 1.0)
    } else if max > min {
        (min, max)
    } else {
        (min - 1.0, max + 1.0)
    }
}

pub(crate) fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}
