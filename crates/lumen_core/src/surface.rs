//! Analytic surfaces that rays can hit.
//!
//! The set of surface kinds is closed, so `Surface` is an enum and every
//! query dispatches with a `match`. Each kind answers three questions:
//! where a ray first meets it, the unit normal at a point, and the base
//! color at a point.

use lumen_math::{direction, Color, DVec4, Ray};
use serde::{Deserialize, Deserializer, Serialize};

/// Edge length of one checkerboard tile in world units.
pub const TILE_SIZE: f64 = 10.0;

/// Where a ray meets a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Ray parameter of the hit; the ray direction is unit so this is a distance.
    pub distance: f64,
    /// World-space hit point.
    pub point: DVec4,
}

/// A solid-colored sphere.
///
/// The center is a point: constructors and deserialization set its `w` to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    #[serde(deserialize_with = "deserialize_point")]
    pub center: DVec4,
    pub radius: f64,
    pub color: Color,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: DVec4, radius: f64, color: Color) -> Self {
        Self {
            center: as_point(center),
            radius,
            color,
        }
    }

    /// Near-side intersection with `ray`.
    ///
    /// Solves `|p + s*v - center|^2 = r^2` and keeps the smaller root. A
    /// negative root is a miss, which includes rays starting inside the
    /// sphere.
    pub fn intersection(&self, ray: &Ray) -> Option<Intersection> {
        let p = ray.origin();
        let v = ray.direction();
        let diff = p - self.center;

        let a = v.length_squared();
        let b = 2.0 * diff.dot(v);
        let c = diff.length_squared() - self.radius * self.radius;
        let delta = b * b - 4.0 * a * c;
        if delta < 0.0 {
            return None;
        }

        let delta_sqrt = delta.sqrt();
        let s1 = (-b - delta_sqrt) / (2.0 * a);
        let s2 = (-b + delta_sqrt) / (2.0 * a);
        let s = s1.min(s2);
        if s < 0.0 {
            return None;
        }

        Some(Intersection {
            distance: s,
            point: ray.at(s),
        })
    }

    /// Outward unit normal at `point`.
    #[inline]
    pub fn normal(&self, point: DVec4) -> DVec4 {
        (point - self.center).normalize()
    }
}

#[inline]
fn as_point(v: DVec4) -> DVec4 {
    v.truncate().extend(1.0)
}

fn deserialize_point<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DVec4, D::Error> {
    DVec4::deserialize(deserializer).map(as_point)
}

/// An infinite horizontal checkerboard floor facing `+z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// World z of the plane.
    #[serde(default)]
    pub height: f64,
    /// Tile colors; even tiles use the first, odd tiles the second.
    #[serde(default = "Plane::default_colors")]
    pub colors: [Color; 2],
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            height: 0.0,
            colors: Self::default_colors(),
        }
    }
}

impl Plane {
    /// Create a floor at `height` with the default sand/brown tiles.
    pub fn new(height: f64) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }

    fn default_colors() -> [Color; 2] {
        [Color::new(252, 204, 116), Color::new(87, 58, 46)]
    }

    /// Intersection for rays looking down onto the plane from above.
    ///
    /// Rays starting below the plane, or not heading downward, miss.
    pub fn intersection(&self, ray: &Ray) -> Option<Intersection> {
        let p = ray.origin();
        let v = ray.direction();
        let above = p.z - self.height;
        if above < 0.0 || v.z >= 0.0 {
            return None;
        }

        let scale = above / -v.z;
        Some(Intersection {
            distance: scale,
            point: ray.at(scale),
        })
    }

    #[inline]
    pub fn normal(&self) -> DVec4 {
        direction(0.0, 0.0, 1.0)
    }

    /// Checker color keyed on floored tile indices, so tiles stay square
    /// across the negative axes.
    pub fn color_at(&self, point: DVec4) -> Color {
        let tx = (point.x / TILE_SIZE).floor() as i64;
        let ty = (point.y / TILE_SIZE).floor() as i64;
        self.colors[(tx + ty).rem_euclid(2) as usize]
    }
}

/// Any surface a scene can hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Surface {
    Sphere(Sphere),
    Plane(Plane),
}

impl Surface {
    pub fn intersection(&self, ray: &Ray) -> Option<Intersection> {
        match self {
            Surface::Sphere(s) => s.intersection(ray),
            Surface::Plane(p) => p.intersection(ray),
        }
    }

    pub fn normal(&self, point: DVec4) -> DVec4 {
        match self {
            Surface::Sphere(s) => s.normal(point),
            Surface::Plane(p) => p.normal(),
        }
    }

    pub fn color_at(&self, point: DVec4) -> Color {
        match self {
            Surface::Sphere(s) => s.color,
            Surface::Plane(p) => p.color_at(point),
        }
    }

    /// The sphere payload, if this is a sphere.
    pub fn as_sphere(&self) -> Option<&Sphere> {
        match self {
            Surface::Sphere(s) => Some(s),
            Surface::Plane(_) => None,
        }
    }
}

impl From<Sphere> for Surface {
    fn from(s: Sphere) -> Self {
        Surface::Sphere(s)
    }
}

impl From<Plane> for Surface {
    fn from(p: Plane) -> Self {
        Surface::Plane(p)
    }
}
