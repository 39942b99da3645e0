//! Error types.
//!
//! - `ShapeError`: structural problems in a results tensor (core)
//! - `AnalysisError`: a failed analysis of one file (core + loader)
//! - `AppError`: what the binary reports, with a process exit code

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Field;

/// Structural problem in a results tensor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShapeError {
    /// The tensor holds no modes.
    #[error("results tensor has no modes")]
    NoModes,
    /// Root finding needs at least one pair of flow steps.
    #[error("results tensor has {steps} flow step(s); at least 2 are required")]
    TooFewSteps { steps: usize },
    /// A mode has a different number of flow steps than mode 0.
    #[error("mode {mode} has {found} flow steps, expected {expected}")]
    JaggedSteps {
        mode: usize,
        expected: usize,
        found: usize,
    },
    /// A flow step has a different number of columns than the first one.
    #[error("mode {mode}, step {step} has {found} columns, expected {expected}")]
    JaggedColumns {
        mode: usize,
        step: usize,
        expected: usize,
        found: usize,
    },
    /// Flat buffer length does not match the declared shape.
    #[error("buffer holds {found} values but shape {shape:?} needs {expected}")]
    BufferLength {
        shape: [usize; 3],
        expected: usize,
        found: usize,
    },
    /// The declared shape has more elements than `usize` can count.
    #[error("shape {shape:?} is too large")]
    ShapeOverflow { shape: [usize; 3] },
    /// A `(mode, step)` index is too large to size a tensor from.
    #[error("cell index mode {mode}, step {step} is too large")]
    IndexOverflow { mode: usize, step: usize },
    /// A mapped column index lies outside the tensor.
    #[error("{field} column {column} is out of range for {num_columns} column(s)")]
    ColumnOutOfRange {
        field: Field,
        column: usize,
        num_columns: usize,
    },
    /// A `(mode, step)` cell was never supplied.
    #[error("no values for mode {mode}, step {step}")]
    MissingCell { mode: usize, step: usize },
    /// A `(mode, step)` cell was supplied more than once.
    #[error("duplicate values for mode {mode}, step {step}")]
    DuplicateCell { mode: usize, step: usize },
}

/// Failure of a single file's analysis.
///
/// Each variant names the offending file so a batch can report failures
/// without losing track of which input produced them.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The tensor was read but its shape is unusable.
    #[error("{}: invalid results tensor: {source}", file.display())]
    Structural {
        file: PathBuf,
        #[source]
        source: ShapeError,
    },
    /// The tensor file is missing, unreadable or malformed.
    #[error("{}: {message}", file.display())]
    Parse { file: PathBuf, message: String },
}

impl AnalysisError {
    pub fn structural(file: impl Into<PathBuf>, source: ShapeError) -> Self {
        Self::Structural {
            file: file.into(),
            source,
        }
    }

    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn file(&self) -> &std::path::Path {
        match self {
            Self::Structural { file, .. } | Self::Parse { file, .. } => file,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        let exit_code = match err {
            AnalysisError::Structural { .. } => 3,
            AnalysisError::Parse { .. } => 2,
        };
        AppError::new(exit_code, err.to_string())
    }
}
