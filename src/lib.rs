//! `vg-roots` library crate.
//!
//! Flutter roots from a results tensor: `analysis` holds the pure
//! reduce/root-finding core, everything else is loading, reporting and
//! plotting around it. The `vg` binary only calls `app::run`.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
