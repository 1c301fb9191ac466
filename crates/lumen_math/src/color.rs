//! Byte colors with saturating arithmetic.
//!
//! Channels are stored as `u8`. All arithmetic clamps to `[0, 255]` instead
//! of wrapping, so accumulating many light contributions tops out at white.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// An RGB color used for surfaces, lights and shading results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    /// Create a new color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Clamp a real channel value into a byte. Fractions truncate toward zero.
#[inline]
fn saturate(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Per-channel saturating sum.
impl Add for Color {
    type Output = Color;

    #[inline]
    fn add(self, rhs: Color) -> Color {
        Color::new(
            self.r.saturating_add(rhs.r),
            self.g.saturating_add(rhs.g),
            self.b.saturating_add(rhs.b),
        )
    }
}

/// Scale every channel by a real factor.
impl Mul<Color> for f64 {
    type Output = Color;

    #[inline]
    fn mul(self, rhs: Color) -> Color {
        Color::new(
            saturate(f64::from(rhs.r) * self),
            saturate(f64::from(rhs.g) * self),
            saturate(f64::from(rhs.b) * self),
        )
    }
}

/// Normalized product: `lhs / 255 * rhs` per channel.
///
/// Models light of color `lhs` attenuated by a surface albedo `rhs`.
impl Mul for Color {
    type Output = Color;

    #[inline]
    fn mul(self, rhs: Color) -> Color {
        let blend = |a: u8, b: u8| saturate(f64::from(a) / 255.0 * f64::from(b));
        Color::new(blend(self.r, rhs.r), blend(self.g, rhs.g), blend(self.b, rhs.b))
    }
}

/// One stored pixel of an image buffer.
///
/// Unwritten pixels are white.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Pixel {
    fn default() -> Self {
        Self {
            r: 255,
            g: 255,
            b: 255,
        }
    }
}

impl From<Color> for Pixel {
    fn from(c: Color) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

impl From<Pixel> for Color {
    fn from(p: Pixel) -> Self {
        Color::new(p.r, p.g, p.b)
    }
}
