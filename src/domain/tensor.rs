//! The raw results tensor.
//!
//! Indexed `[mode, flow_step, column]` and stored as one row-major buffer.
//! Both constructors validate that the tensor is regular (not jagged), so
//! every consumer can index it without re-checking lengths.

use crate::error::ShapeError;

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTensor {
    shape: [usize; 3],
    data: Vec<f64>,
}

impl ResultsTensor {
    /// Build from a flat row-major buffer of shape `[modes, steps, columns]`.
    pub fn from_flat(shape: [usize; 3], data: Vec<f64>) -> Result<Self, ShapeError> {
        let expected = shape
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .ok_or(ShapeError::ShapeOverflow { shape })?;
        if data.len() != expected {
            return Err(ShapeError::BufferLength {
                shape,
                expected,
                found: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Build from nested rows: `rows[mode][step][column]`.
    pub fn from_nested(rows: Vec<Vec<Vec<f64>>>) -> Result<Self, ShapeError> {
        let num_modes = rows.len();
        let num_steps = rows.first().map_or(0, Vec::len);
        let num_columns = rows
            .first()
            .and_then(|steps| steps.first())
            .map_or(0, Vec::len);

        let mut data = Vec::with_capacity(num_modes * num_steps * num_columns);
        for (mode, steps) in rows.into_iter().enumerate() {
            if steps.len() != num_steps {
                return Err(ShapeError::JaggedSteps {
                    mode,
                    expected: num_steps,
                    found: steps.len(),
                });
            }
            for (step, columns) in steps.into_iter().enumerate() {
                if columns.len() != num_columns {
                    return Err(ShapeError::JaggedColumns {
                        mode,
                        step,
                        expected: num_columns,
                        found: columns.len(),
                    });
                }
                data.extend(columns);
            }
        }

        Ok(Self {
            shape: [num_modes, num_steps, num_columns],
            data,
        })
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn num_modes(&self) -> usize {
        self.shape[0]
    }

    pub fn num_steps(&self) -> usize {
        self.shape[1]
    }

    pub fn num_columns(&self) -> usize {
        self.shape[2]
    }

    /// Value at `[mode, step, column]`.
    ///
    /// Panics when an index is out of range, like slice indexing.
    pub fn get(&self, mode: usize, step: usize, column: usize) -> f64 {
        let [_, steps, columns] = self.shape;
        assert!(
            mode < self.shape[0] && step < steps && column < columns,
            "tensor index [{mode}, {step}, {column}] out of range for shape {:?}",
            self.shape
        );
        self.data[(mode * steps + step) * columns + column]
    }
}
