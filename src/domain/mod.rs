//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the raw results tensor handed over by the solver-output parser (`ResultsTensor`)
//! - named column mapping for the measured quantities (`ColumnMap`, `Field`)
//! - reduced outputs (`ModeSeries`, `RootSet`)
//! - run configuration and the chart export schema (`AnalysisConfig`, `ChartFile`)

pub mod tensor;
pub mod types;

pub use tensor::*;
pub use types::*;
