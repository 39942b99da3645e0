//! Numerical helpers: sign-change detection and linear root interpolation.

pub mod interp;

pub use interp::*;
