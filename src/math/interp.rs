//! Root isolation on a single bracketing interval.
//!
//! Given samples `(a, fa)` and `(b, fb)` of a function that changes sign
//! between them, the linear estimate of the zero is
//!
//! ```text
//! x = a + fa / (fa - fb) * (b - a)
//! ```
//!
//! This is one secant step. No refinement is attempted: the solver output is
//! sampled data, not a function we can evaluate again.

/// True when `fa` and `fb` have strictly opposite signs.
///
/// An exact zero at either end does not count as a sign change.
pub fn is_sign_change(fa: f64, fb: f64) -> bool {
    fa * fb < 0.0
}

/// Linear estimate of the zero between `(a, fa)` and `(b, fb)`.
///
/// Only meaningful when `is_sign_change(fa, fb)` holds; then `fa - fb` is
/// never zero.
pub fn linear_root(a: f64, b: f64, fa: f64, fb: f64) -> f64 {
    a + fa / (fa - fb) * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_sign_change() {
        assert!(is_sign_change(1.0, -1.0));
        assert!(is_sign_change(-0.5, 3.0));
        assert!(!is_sign_change(1.0, 0.0));
        assert!(!is_sign_change(0.0, -1.0));
        assert!(!is_sign_change(0.0, 0.0));
        assert!(!is_sign_change(2.0, 2.0));
    }

    #[test]
    fn symmetric_bracket_hits_midpoint() {
        assert!((linear_root(10.0, 20.0, 2.0, -2.0) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn weights_follow_damping_magnitudes() {
        // |fa| = 1, |fb| = 3: the zero sits a quarter of the way along.
        let root = linear_root(100.0, 140.0, 1.0, -3.0);
        assert!((root - 110.0).abs() < 1e-12);

        // Rising through zero gives the same weighting.
        let root = linear_root(100.0, 140.0, -3.0, 1.0);
        assert!((root - 130.0).abs() < 1e-12);
    }
}
