//! Shared domain types.
//!
//! These types are kept lightweight so they can be:
//!
//! - produced once per analysed file and dropped after reporting
//! - exported to JSON/CSV
//! - reloaded later for plotting (`ChartFile`)

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// A measured quantity read from the results tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Velocity,
    Damping,
    Frequency,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Velocity, Field::Damping, Field::Frequency];

    pub fn env_var(self) -> &'static str {
        match self {
            Field::Velocity => "VG_VELOCITY_COLUMN",
            Field::Damping => "VG_DAMPING_COLUMN",
            Field::Frequency => "VG_FREQUENCY_COLUMN",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Velocity => "velocity",
            Field::Damping => "damping",
            Field::Frequency => "frequency",
        };
        f.write_str(name)
    }
}

/// Column index of each measured quantity on the tensor's third axis.
///
/// The defaults follow the solver's flutter summary layout
/// (`kfreq, 1/kfreq, velocity, damping, frequency, ...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub velocity: usize,
    pub damping: usize,
    pub frequency: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            velocity: 2,
            damping: 3,
            frequency: 4,
        }
    }
}

impl ColumnMap {
    pub fn index(&self, field: Field) -> usize {
        match field {
            Field::Velocity => self.velocity,
            Field::Damping => self.damping,
            Field::Frequency => self.frequency,
        }
    }

    pub fn set(&mut self, field: Field, column: usize) {
        match field {
            Field::Velocity => self.velocity = column,
            Field::Damping => self.damping = column,
            Field::Frequency => self.frequency = column,
        }
    }
}

/// Per-mode sequences reduced from one results tensor.
///
/// `frequencies` and `dampings` are `num_steps × num_modes`: row = flow step,
/// column = mode. `velocities` is the flow sweep shared by every mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSeries {
    pub velocities: DVector<f64>,
    pub frequencies: DMatrix<f64>,
    pub dampings: DMatrix<f64>,
}

impl ModeSeries {
    pub fn num_steps(&self) -> usize {
        self.velocities.len()
    }

    pub fn num_modes(&self) -> usize {
        self.dampings.ncols()
    }

    /// Damping sequence of one mode, in flow-step order.
    pub fn damping(&self, mode: usize) -> Vec<f64> {
        self.dampings.column(mode).iter().copied().collect()
    }

    /// Frequency sequence of one mode, in flow-step order.
    pub fn frequency(&self, mode: usize) -> Vec<f64> {
        self.frequencies.column(mode).iter().copied().collect()
    }

    pub fn velocity_range(&self) -> (f64, f64) {
        (self.velocities.min(), self.velocities.max())
    }

    /// True when the sweep never decreases from one step to the next.
    pub fn is_monotonic_sweep(&self) -> bool {
        self.velocities
            .as_slice()
            .windows(2)
            .all(|pair| pair[1] >= pair[0])
    }
}

/// Interpolated zero-damping velocities, keyed by 0-based mode index.
///
/// Every mode of the analysed tensor is a key, with an empty list when its
/// damping never changes sign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootSet {
    roots: BTreeMap<usize, Vec<f64>>,
}

impl RootSet {
    /// A root set with an empty entry for each of `num_modes` modes.
    pub fn with_modes(num_modes: usize) -> Self {
        Self {
            roots: (0..num_modes).map(|mode| (mode, Vec::new())).collect(),
        }
    }

    pub fn push(&mut self, mode: usize, root: f64) {
        self.roots.entry(mode).or_default().push(root);
    }

    /// Roots of one mode; empty for unknown modes.
    pub fn get(&self, mode: usize) -> &[f64] {
        self.roots.get(&mode).map_or(&[], Vec::as_slice)
    }

    pub fn contains_mode(&self, mode: usize) -> bool {
        self.roots.contains_key(&mode)
    }

    pub fn num_modes(&self) -> usize {
        self.roots.len()
    }

    /// Modes in ascending order with their roots.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[f64])> {
        self.roots.iter().map(|(&mode, roots)| (mode, roots.as_slice()))
    }

    /// Modes with at least one root.
    pub fn unstable_modes(&self) -> Vec<usize> {
        self.iter()
            .filter(|(_, roots)| !roots.is_empty())
            .map(|(mode, _)| mode)
            .collect()
    }

    /// The lowest crossing velocity over all modes, with its mode.
    pub fn critical(&self) -> Option<(usize, f64)> {
        self.iter()
            .flat_map(|(mode, roots)| roots.iter().map(move |&r| (mode, r)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

impl From<BTreeMap<usize, Vec<f64>>> for RootSet {
    fn from(roots: BTreeMap<usize, Vec<f64>>) -> Self {
        Self { roots }
    }
}

/// Which modes a chart should draw. Empty means all modes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSelection(Vec<usize>);

impl ModeSelection {
    pub fn all() -> Self {
        Self(Vec::new())
    }

    /// Select 0-based mode indices.
    pub fn new(modes: Vec<usize>) -> Self {
        Self(modes)
    }

    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    pub fn modes(&self) -> &[usize] {
        &self.0
    }

    /// Concrete 0-based modes to draw for a run with `num_modes` modes.
    ///
    /// Out-of-range modes are dropped with a warning; duplicates keep their
    /// first position.
    pub fn resolve(&self, num_modes: usize) -> Vec<usize> {
        if self.is_all() {
            return (0..num_modes).collect();
        }

        let mut out = Vec::with_capacity(self.0.len());
        for &mode in &self.0 {
            if mode >= num_modes {
                log::warn!(
                    "mode {} is not in this run ({num_modes} modes); skipping it",
                    mode + 1
                );
                continue;
            }
            if !out.contains(&mode) {
                out.push(mode);
            }
        }
        out
    }

    /// Short human label, 1-based.
    pub fn label(&self) -> String {
        if self.is_all() {
            "all modes".to_string()
        } else {
            let modes: Vec<String> = self.0.iter().map(|m| (m + 1).to_string()).collect();
            format!("modes {}", modes.join(", "))
        }
    }
}

/// Configuration for one `vg analyze` run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub columns: ColumnMap,
    pub modes: ModeSelection,
    pub output_dir: Option<PathBuf>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_svg: bool,
    pub export_series: bool,
    pub export_chart: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            modes: ModeSelection::all(),
            output_dir: None,
            plot: true,
            plot_width: 100,
            plot_height: 14,
            export_svg: false,
            export_series: false,
            export_chart: false,
        }
    }
}

/// Portable chart data for re-plotting without re-running an analysis.
///
/// Per-mode arrays are stored mode-major (`frequencies[mode][step]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFile {
    pub tool: String,
    pub source: String,
    pub generated: DateTime<Utc>,
    #[serde(default)]
    pub modes: ModeSelection,
    pub velocities: Vec<f64>,
    pub frequencies: Vec<Vec<f64>>,
    pub dampings: Vec<Vec<f64>>,
    pub roots: RootSet,
}
