//! `ModeSeries` → `RootSet`.
//!
//! For every mode, consecutive damping pairs are scanned in flow-step order.
//! A pair with strictly opposite signs brackets a crossing, which is placed by
//! linear interpolation between the two neighbouring velocities.

use crate::domain::{ModeSeries, RootSet};
use crate::math::{is_sign_change, linear_root};

/// Find the zero-damping velocities of every mode.
///
/// Every mode index `0..num_modes` is present in the result, possibly with
/// an empty list.
pub fn find_roots(series: &ModeSeries) -> RootSet {
    let mut roots = RootSet::with_modes(series.num_modes());
    let velocities = series.velocities.as_slice();

    for mode in 0..series.num_modes() {
        for root in mode_roots(velocities, &series.damping(mode)) {
            roots.push(mode, root);
        }
    }

    roots
}

/// Crossings of a single damping sequence sampled at `velocities`.
///
/// Exact zeros at a sample point are not reported: a pair counts only when
/// `d[i] * d[i + 1] < 0`.
pub fn mode_roots(velocities: &[f64], dampings: &[f64]) -> Vec<f64> {
    velocities
        .windows(2)
        .zip(dampings.windows(2))
        .filter(|(_, g)| is_sign_change(g[0], g[1]))
        .map(|(v, g)| linear_root(v[0], v[1], g[0], g[1]))
        .collect()
}
