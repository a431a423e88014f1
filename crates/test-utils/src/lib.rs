//! Shared test utilities for the grid-engine workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate floating-point assertions
//! - Synthetic field generators on row-major grids
//! - Common grid fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures, linspace};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Asserts `|left - right| <= epsilon`. NaN on either side always fails,
/// so a NaN result is never mistaken for a match.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(weights.sum(), 1.0, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = $left as f64;
        let right = $right as f64;
        let tolerance = $epsilon as f64;
        if !((left - right).abs() <= tolerance) {
            panic!(
                "assertion failed: `{}` = {:?} is not within {:?} of `{}` = {:?}",
                stringify!($left),
                left,
                tolerance,
                stringify!($right),
                right
            );
        }
    }};
}

/// Asserts that two projected points agree on both axes.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!(proj.forward(-45.0, 90.0), (0.0, 0.0), 1e-6);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (lx, ly): (f64, f64) = $left;
        let (rx, ry): (f64, f64) = $right;
        $crate::assert_approx_eq!(lx, rx, $epsilon);
        $crate::assert_approx_eq!(ly, ry, $epsilon);
    }};
}

/// Element-wise approximate equality of two slices, where NaN only
/// matches NaN.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_fields_approx_eq;
///
/// assert_fields_approx_eq!(&[1.0, f64::NAN], &[1.0000001, f64::NAN], 1e-6);
/// ```
#[macro_export]
macro_rules! assert_fields_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: &[f64] = $left;
        let right: &[f64] = $right;
        assert_eq!(left.len(), right.len(), "field lengths differ");
        for (i, (&l, &r)) in left.iter().zip(right.iter()).enumerate() {
            if l.is_nan() || r.is_nan() {
                if !(l.is_nan() && r.is_nan()) {
                    panic!("assertion failed at index {}: `{:?}` vs `{:?}`", i, l, r);
                }
                continue;
            }
            let diff = (l - r).abs();
            if !(diff <= $epsilon as f64) {
                panic!(
                    "assertion failed at index {}: `{:?}` vs `{:?}`, diff `{:?}`",
                    i, l, r, diff
                );
            }
        }
    }};
}
