//! Tensor → `ModeSeries`.
//!
//! Velocity is read once per flow step from mode 0 (the sweep is shared by all
//! modes). Frequency and damping are read for every `(mode, step)` pair into
//! step-major matrices. Nothing is filtered or interpolated here.

use nalgebra::{DMatrix, DVector};

use crate::domain::{ColumnMap, Field, ModeSeries, ResultsTensor};
use crate::error::ShapeError;

/// Minimum number of flow steps: one pair is needed to see a sign change.
pub const MIN_STEPS: usize = 2;

/// Extract per-mode velocity, frequency and damping sequences.
pub fn reduce(tensor: &ResultsTensor, columns: &ColumnMap) -> Result<ModeSeries, ShapeError> {
    validate_shape(tensor, columns)?;

    let num_modes = tensor.num_modes();
    let num_steps = tensor.num_steps();

    let velocities = DVector::from_fn(num_steps, |step, _| tensor.get(0, step, columns.velocity));
    let frequencies = DMatrix::from_fn(num_steps, num_modes, |step, mode| {
        tensor.get(mode, step, columns.frequency)
    });
    let dampings = DMatrix::from_fn(num_steps, num_modes, |step, mode| {
        tensor.get(mode, step, columns.damping)
    });

    Ok(ModeSeries {
        velocities,
        frequencies,
        dampings,
    })
}

/// Check that a tensor can be reduced with the given column mapping.
pub fn validate_shape(tensor: &ResultsTensor, columns: &ColumnMap) -> Result<(), ShapeError> {
    if tensor.num_modes() == 0 {
        return Err(ShapeError::NoModes);
    }
    if tensor.num_steps() < MIN_STEPS {
        return Err(ShapeError::TooFewSteps {
            steps: tensor.num_steps(),
        });
    }
    for field in Field::ALL {
        let column = columns.index(field);
        if column >= tensor.num_columns() {
            return Err(ShapeError::ColumnOutOfRange {
                field,
                column,
                num_columns: tensor.num_columns(),
            });
        }
    }
    Ok(())
}
