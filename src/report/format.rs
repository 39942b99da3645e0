//! Formatted terminal and file output.
//!
//! We keep formatting code in one place so:
//! - the numerical core stays free of presentation concerns
//! - output changes are localized (the root report is consumed downstream)

use crate::app::pipeline::AnalysisOutput;
use crate::domain::{ModeSeries, RootSet};

/// Render the root report: one line per mode with at least one root.
///
/// Line format: `Mode {n:>2}: {r1:.3}, {r2:.3}, ...` with `n` 1-based. Modes
/// without roots are omitted. Each line ends with `\n`.
pub fn format_roots(roots: &RootSet) -> String {
    let mut out = String::new();
    for (mode, values) in roots.iter() {
        if values.is_empty() {
            continue;
        }
        let data: Vec<String> = values.iter().map(|r| format!("{r:.3}")).collect();
        out.push_str(&format!("Mode {:>2}: {}\n", mode + 1, data.join(", ")));
    }
    out
}

/// Format the run summary: shape, sweep, critical velocity and root table.
pub fn format_run_summary(output: &AnalysisOutput) -> String {
    let mut out = String::new();
    let [modes, steps, columns] = output.shape;
    let (v_min, v_max) = output.series.velocity_range();

    out.push_str(&format!("=== vg - flutter roots: {} ===\n", output.title));
    out.push_str(&format!("Shape: modes={modes} steps={steps} columns={columns}\n"));
    out.push_str(&format!("Velocity: [{v_min:.3}, {v_max:.3}]\n"));

    match output.roots.critical() {
        Some((mode, velocity)) => {
            out.push_str(&format!("Critical: mode {} at {velocity:.3}\n", mode + 1));
        }
        None => out.push_str("Critical: none (damping never crosses zero)\n"),
    }

    out.push_str("\nModes:\n");
    out.push_str(&format_mode_table(&output.series, &output.roots));

    out.push_str("\nFlutter Roots:\n");
    let roots = format_roots(&output.roots);
    if roots.is_empty() {
        out.push_str("none\n");
    } else {
        out.push_str(&roots);
    }

    out
}

/// Per-mode ranges of frequency and damping, with the number of crossings.
pub fn format_mode_table(series: &ModeSeries, roots: &RootSet) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:>4} {:>10} {:>10} {:>10} {:>10} {:>7}",
            "mode", "f_min", "f_max", "g_min", "g_max", "roots"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:->4} {:->10} {:->10} {:->10} {:->10} {:->7}",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for mode in 0..series.num_modes() {
        let (f_min, f_max) = min_max(&series.frequency(mode));
        let (g_min, g_max) = min_max(&series.damping(mode));
        out.push_str(&format!(
            "{:>4} {f_min:>10.3} {f_max:>10.3} {g_min:>10.4} {g_max:>10.4} {:>7}\n",
            mode + 1,
            roots.get(mode).len(),
        ));
    }

    out
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}
