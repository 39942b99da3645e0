//! Shared analysis pipeline used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! tensor load -> reduce -> find roots
//!
//! The front-end can then focus on presentation (printing and exports).
//! Each file is analysed independently; a batch runs one rayon task per file.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::analysis::analyze_tensor;
use crate::domain::{ColumnMap, ModeSeries, RootSet};
use crate::error::AnalysisError;
use crate::io::ingest::{LoadedTensor, load_tensor};

/// All computed outputs of one analysed file.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub source: PathBuf,
    /// Chart/report title (embedded run title or file name).
    pub title: String,
    /// Shape of the source tensor: `[modes, steps, columns]`.
    pub shape: [usize; 3],
    pub series: ModeSeries,
    pub roots: RootSet,
}

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<AnalysisOutput, AnalysisError>,
}

/// Load, reduce and root-find a single tensor file.
pub fn analyze_file(path: &Path, columns: &ColumnMap) -> Result<AnalysisOutput, AnalysisError> {
    let loaded = load_tensor(path)?;
    analyze_loaded(loaded, columns)
}

/// Reduce and root-find an already loaded tensor.
pub fn analyze_loaded(loaded: LoadedTensor, columns: &ColumnMap) -> Result<AnalysisOutput, AnalysisError> {
    let shape = loaded.tensor.shape();
    log::info!(
        "analysing {} (modes={}, steps={}, columns={})",
        loaded.path.display(),
        shape[0],
        shape[1],
        shape[2]
    );

    let (series, roots) =
        analyze_tensor(&loaded.tensor, columns).map_err(|e| AnalysisError::structural(&loaded.path, e))?;

    if !series.is_monotonic_sweep() {
        log::warn!(
            "{}: flow velocities are not in ascending order; roots follow step order",
            loaded.path.display()
        );
    }
    log::info!(
        "{}: {} of {} mode(s) cross zero damping",
        loaded.path.display(),
        roots.unstable_modes().len(),
        roots.num_modes()
    );

    Ok(AnalysisOutput {
        title: loaded.display_name(),
        source: loaded.path,
        shape,
        series,
        roots,
    })
}

/// Analyse many files in parallel. Outcomes keep the input order.
pub fn analyze_batch(paths: &[PathBuf], columns: &ColumnMap) -> Vec<FileOutcome> {
    paths
        .par_iter()
        .map(|path| FileOutcome {
            path: path.clone(),
            result: analyze_file(path, columns),
        })
        .collect()
}
