//! Homogeneous vector helpers.
//!
//! Points carry `w = 1` and directions carry `w = 0`, so the difference of
//! two points is a direction and a point plus a direction is a point.
//! Normalization and length come straight from `glam::DVec4`; a zero-length
//! input yields NaN components.

use glam::DVec4;

/// A point in world space (`w = 1`).
#[inline]
pub fn point(x: f64, y: f64, z: f64) -> DVec4 {
    DVec4::new(x, y, z, 1.0)
}

/// A direction in world space (`w = 0`).
#[inline]
pub fn direction(x: f64, y: f64, z: f64) -> DVec4 {
    DVec4::new(x, y, z, 0.0)
}

/// Cross product over the xyz subset; the result is a direction.
#[inline]
pub fn cross3(a: DVec4, b: DVec4) -> DVec4 {
    a.truncate().cross(b.truncate()).extend(0.0)
}
