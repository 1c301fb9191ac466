use crate::DVec4;

/// A ray in homogeneous world space.
///
/// Rays are built once per pixel from the camera position toward a point on
/// the screen plane; `direction` is unit length and never changes after
/// construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: DVec4,
    direction: DVec4,
}

impl Ray {
    /// Create a new ray. The direction is used as given.
    pub fn new(origin: DVec4, direction: DVec4) -> Self {
        Self { origin, direction }
    }

    /// Create a ray from `origin` toward `target`, normalizing the direction.
    pub fn through(origin: DVec4, target: DVec4) -> Self {
        Self::new(origin, (target - origin).normalize())
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> DVec4 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> DVec4 {
        self.direction
    }

    /// Get the point along the ray at parameter s.
    ///
    /// Returns: origin + s * direction
    #[inline]
    pub fn at(&self, s: f64) -> DVec4 {
        self.origin + s * self.direction
    }
}
