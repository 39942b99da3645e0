//! The numerical core: results tensor → mode series → flutter roots.
//!
//! Responsibilities:
//!
//! - extract velocity / frequency / damping per mode (`reduce`)
//! - locate zero-damping crossings per mode (`roots`)
//!
//! Both steps are pure functions over already-materialized data.

pub mod reduce;
pub mod roots;

pub use reduce::*;
pub use roots::*;

use crate::domain::{ColumnMap, ModeSeries, ResultsTensor, RootSet};
use crate::error::ShapeError;

/// Reduce a tensor and find its roots in one call.
pub fn analyze_tensor(
    tensor: &ResultsTensor,
    columns: &ColumnMap,
) -> Result<(ModeSeries, RootSet), ShapeError> {
    let series = reduce(tensor, columns)?;
    let roots = find_roots(&series);
    Ok((series, roots))
}
