//! Reporting: the root table and run summaries.

pub mod format;

pub use format::*;
