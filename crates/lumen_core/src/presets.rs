//! Built-in demo scenes.
//!
//! The demo is a field of randomly placed spheres resting on `z = 0`, lit by
//! four white lights and viewed from one corner of the field. Generation is
//! seeded so every run produces the same spheres.

use lumen_math::{direction, point, Color};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scene::{Camera, Light, Scene};
use crate::surface::{Plane, Sphere, Surface};

/// Seed used by the demo scene when none is given.
pub const DEFAULT_SEED: u64 = 2023;

/// Sphere count used by the demo scene.
pub const DEFAULT_SPHERE_COUNT: usize = 1024;

/// Half extent of the square the sphere centers are scattered over.
const FIELD_HALF_EXTENT: f64 = 80.0;

/// Camera at the `(-x, -y)` corner of the field.
pub fn demo_camera() -> Camera {
    Camera::new(
        point(-100.0, -100.0, 30.0),
        point(-90.0, -90.0, 25.0),
        direction(0.0, 0.0, 1.0),
        80.0,
    )
}

/// Pose for frame `frame` of the orbit animation.
///
/// The eye circles the origin at radius 100 and looks at a point on a
/// radius 90 circle, advancing 0.2 rad per frame.
pub fn orbit_camera(frame: usize) -> Camera {
    let phi = frame as f64 / 5.0;
    let (sin, cos) = phi.sin_cos();
    Camera::new(
        point(100.0 * cos, 100.0 * sin, 30.0),
        point(90.0 * cos, 90.0 * sin, 25.0),
        direction(0.0, 0.0, 1.0),
        80.0,
    )
}

/// Four white lights above the corners of the field.
pub fn demo_lights() -> Vec<Light> {
    [(-50.0, -50.0), (50.0, -50.0), (-50.0, 50.0), (50.0, 50.0)]
        .into_iter()
        .map(|(x, y)| Light::new(point(x, y, 50.0), Color::WHITE))
        .collect()
}

/// Generate `count` spheres with seeded random radius, position and color.
///
/// Radii are uniform in `[0.5, 5)`; centers sit at `z = radius` so every
/// sphere touches the floor.
pub fn random_spheres(count: usize, seed: u64) -> Vec<Sphere> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let radius = rng.gen_range(0.5..5.0);
            let x = rng.gen_range(-FIELD_HALF_EXTENT..FIELD_HALF_EXTENT);
            let y = rng.gen_range(-FIELD_HALF_EXTENT..FIELD_HALF_EXTENT);
            let color = Color::new(rng.gen(), rng.gen(), rng.gen());
            Sphere::new(point(x, y, radius), radius, color)
        })
        .collect()
}

/// The full demo scene: `sphere_count` random spheres, optionally followed
/// by the checkerboard floor.
pub fn demo_scene(sphere_count: usize, seed: u64, with_floor: bool) -> Scene {
    let mut objects: Vec<Surface> = random_spheres(sphere_count, seed)
        .into_iter()
        .map(Surface::from)
        .collect();
    if with_floor {
        objects.push(Plane::default().into());
    }

    log::debug!(
        "Demo scene: {} spheres (seed {}), floor: {}",
        sphere_count,
        seed,
        with_floor
    );

    Scene {
        camera: demo_camera(),
        lights: demo_lights(),
        objects,
    }
}
