//! Terminal V-g diagram on a fixed character grid.
//!
//! Output depends only on the inputs, so it can be compared verbatim in tests.
//!
//! Plot elements:
//! - samples: the mode's marker (`1`..`9`, then `A`..`Z`, then `*`)
//! - segments between samples: `.`
//! - zero-damping reference: `-`

use super::{Curves, pad_range, select_curves, value_range};
use crate::domain::{ModeSelection, ModeSeries};

const MARKERS: &[u8] = b"123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Marker character for a 0-based mode.
pub fn mode_marker(mode: usize) -> char {
    MARKERS.get(mode).map_or('*', |&b| b as char)
}

/// Render a two-panel V-g diagram. `height` is the row count of each panel.
pub fn render_ascii_vg(
    series: &ModeSeries,
    selection: &ModeSelection,
    title: &str,
    width: usize,
    height: usize,
) -> String {
    let modes = selection.resolve(series.num_modes());
    let (dampings, frequencies) = select_curves(series, &modes);
    let velocities = series.velocities.as_slice();
    let (v_min, v_max) = value_range(velocities);

    let mut out = String::new();
    out.push_str(&format!("V-g diagram: {title} ({})\n", selection.label()));
    out.push_str(&render_panel("Damping", velocities, &dampings, (v_min, v_max), true, width, height));
    out.push_str(&render_panel("Frequency", velocities, &frequencies, (v_min, v_max), false, width, height));

    let legend: Vec<String> = modes
        .iter()
        .map(|&m| format!("{}=mode {}", mode_marker(m), m + 1))
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join(", ")));

    out
}

fn render_panel(
    label: &str,
    velocities: &[f64],
    curves: &Curves,
    (v_min, v_max): (f64, f64),
    zero_line: bool,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = value_range(curves.iter().flat_map(|(_, values)| values));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Reference first so the curves can overlay it.
    if zero_line && y_min < 0.0 && y_max > 0.0 {
        let row = map_y(0.0, y_min, y_max, height);
        grid[row].fill('-');
    }

    let mut samples = Vec::new();
    for (mode, values) in curves {
        let points: Vec<(usize, usize)> = velocities
            .iter()
            .zip(values)
            .filter(|(v, y)| v.is_finite() && y.is_finite())
            .map(|(&v, &y)| (map_x(v, v_min, v_max, width), map_y(y, y_min, y_max, height)))
            .collect();

        for pair in points.windows(2) {
            draw_line(&mut grid, pair[0], pair[1], '.');
        }
        samples.extend(points.into_iter().map(|p| (p, mode_marker(*mode))));
    }

    // Markers last so samples stay visible.
    for ((x, y), ch) in samples {
        grid[y][x] = ch;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{label}: v=[{v_min:.3}, {v_max:.3}] | y=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn map_x(v: f64, v_min: f64, v_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((v - v_min) / (v_max - v_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written.
fn draw_line(grid: &mut [Vec<char>], (x0, y0): (usize, usize), (x1, y1): (usize, usize), ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
