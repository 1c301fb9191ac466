//! Phong local illumination.
//!
//! Ambient plus per-light diffuse and specular terms. There are no shadow
//! rays, so every light reaches every hit point.

use lumen_core::{Light, Surface};
use lumen_math::{Color, DVec4};

/// Ambient coefficient
pub const KA: f64 = 0.1;
/// Diffuse coefficient
pub const KD: f64 = 0.6;
/// Specular coefficient
pub const KS: f64 = 0.3;
/// Specular exponent
pub const SHININESS: f64 = 30.0;

/// Cosine of the angle between `a` and `b`.
#[inline]
pub fn cosine(a: DVec4, b: DVec4) -> f64 {
    a.dot(b) / a.length() / b.length()
}

/// Cosine clamped at zero, for use as an intensity.
#[inline]
pub fn clamped_cosine(a: DVec4, b: DVec4) -> f64 {
    let cos = cosine(a, b);
    if cos < 0.0 {
        0.0
    } else {
        cos
    }
}

/// Shade `point` on `surface` as seen from `eye`.
pub fn shade(point: DVec4, eye: DVec4, surface: &Surface, lights: &[Light]) -> Color {
    let base = surface.color_at(point);
    let normal = surface.normal(point);
    let view = (eye - point).normalize();

    let mut color = KA * base;
    for light in lights {
        let to_light = (light.position - point).normalize();
        // The reflection uses the signed cosine
        let reflected = 2.0 * cosine(normal, to_light) * normal - to_light;
        let diffuse = KD * clamped_cosine(normal, to_light);
        let specular = KS * clamped_cosine(view, reflected).powf(SHININESS);
        color = color + (diffuse + specular) * light.color * base;
    }

    color
}
