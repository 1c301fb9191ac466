//! Scalar nearest-hit search.
//!
//! Every object is asked for its intersection and the smallest distance
//! wins. Ties go to the object that comes first in scene order.

use lumen_core::Surface;
use lumen_math::{DVec4, Ray};

/// The nearest surface a ray meets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the surface in the scene's object list
    pub index: usize,
    /// Distance along the ray
    pub distance: f64,
    /// World-space hit point
    pub point: DVec4,
}

impl Hit {
    /// Whether `self` should replace `other` as the nearest hit.
    #[inline]
    fn beats(&self, other: &Hit) -> bool {
        self.distance < other.distance
            || (self.distance == other.distance && self.index < other.index)
    }
}

/// Pick the nearer of two candidate hits.
#[inline]
pub fn closer(a: Option<Hit>, b: Option<Hit>) -> Option<Hit> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.beats(&a) { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Nearest hit over every object.
pub fn nearest_hit(ray: &Ray, objects: &[Surface]) -> Option<Hit> {
    let mut nearest: Option<Hit> = None;
    let mut closest_so_far = f64::INFINITY;

    for (index, object) in objects.iter().enumerate() {
        if let Some(isect) = object.intersection(ray) {
            if isect.distance < closest_so_far {
                closest_so_far = isect.distance;
                nearest = Some(Hit {
                    index,
                    distance: isect.distance,
                    point: isect.point,
                });
            }
        }
    }

    nearest
}

/// Nearest hit over the objects named by `indices`, which must be ascending.
pub fn nearest_hit_among(ray: &Ray, objects: &[Surface], indices: &[usize]) -> Option<Hit> {
    let mut nearest: Option<Hit> = None;
    let mut closest_so_far = f64::INFINITY;

    for &index in indices {
        if let Some(isect) = objects[index].intersection(ray) {
            if isect.distance < closest_so_far {
                closest_so_far = isect.distance;
                nearest = Some(Hit {
                    index,
                    distance: isect.distance,
                    point: isect.point,
                });
            }
        }
    }

    nearest
}
