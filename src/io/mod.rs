//! Input/output helpers.
//!
//! - results tensor loading + discovery (`ingest`)
//! - root report and series exports (`export`)
//! - chart JSON read/write (`chart`)

pub mod chart;
pub mod export;
pub mod ingest;

pub use chart::*;
pub use export::*;
pub use ingest::*;
