//! Scene description for Lumen.
//!
//! A scene is a pinhole camera, a list of point lights and a flat list of
//! surfaces. It is plain data: renderers read it and never mutate it while a
//! frame is in flight.

use std::fs;
use std::path::Path;

use lumen_math::{cross3, Color, DVec4, Ray};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::surface::{Sphere, Surface};

/// Errors that can occur while loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Pinhole camera.
///
/// The screen is the plane through `screen_center` perpendicular to the
/// central ray. `up` only hints at the vertical; it must not be parallel to
/// the central ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Eye position
    pub position: DVec4,
    /// Point the camera looks at; also fixes the screen distance
    pub screen_center: DVec4,
    /// Up-direction hint
    pub up: DVec4,
    /// Horizontal field of view in degrees
    pub fov: f64,
}

impl Camera {
    /// Create a new camera.
    pub fn new(position: DVec4, screen_center: DVec4, up: DVec4, fov: f64) -> Self {
        Self {
            position,
            screen_center,
            up,
            fov,
        }
    }

    /// Vector from the eye to the screen center.
    #[inline]
    pub fn central_ray(&self) -> DVec4 {
        self.screen_center - self.position
    }

    /// Orthonormal screen basis `(right, up)`.
    pub fn screen_basis(&self) -> (DVec4, DVec4) {
        let central = self.central_ray();
        let right = cross3(central, self.up).normalize();
        let up = cross3(right, central).normalize();
        (right, up)
    }

    /// Derive the per-pixel projection for an image `width` pixels wide.
    ///
    /// Pixel pitch is chosen so that half the image width spans half the
    /// field of view at the screen distance. Images narrower than two
    /// pixels use the pitch of a two pixel image.
    pub fn projection(&self, width: usize, height: usize) -> ScreenProjection {
        let (right, up) = self.screen_basis();
        let half_fov = self.fov.to_radians() / 2.0;
        let step = half_fov.tan() * self.central_ray().length() / (width / 2).max(1) as f64;

        ScreenProjection {
            eye: self.position,
            screen_center: self.screen_center,
            right,
            up,
            step,
            half_width: (width / 2) as i64,
            half_height: (height / 2) as i64,
        }
    }
}

/// Camera-derived data needed to build primary rays, computed once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenProjection {
    eye: DVec4,
    screen_center: DVec4,
    right: DVec4,
    up: DVec4,
    /// World distance between neighbouring pixel centers
    step: f64,
    half_width: i64,
    half_height: i64,
}

impl ScreenProjection {
    /// World point on the screen plane under pixel `(i, j)`.
    ///
    /// Column `i` grows to the right and row `j` grows upward, both measured
    /// from the lower-left corner.
    #[inline]
    pub fn screen_point(&self, i: usize, j: usize) -> DVec4 {
        let x = (i as i64 - self.half_width) as f64;
        let y = (j as i64 - self.half_height) as f64;
        self.screen_center + (x * self.step) * self.right + (y * self.step) * self.up
    }

    /// Primary ray from the eye through pixel `(i, j)`.
    #[inline]
    pub fn ray(&self, i: usize, j: usize) -> Ray {
        Ray::through(self.eye, self.screen_point(i, j))
    }

    /// Eye position the rays start from.
    #[inline]
    pub fn eye(&self) -> DVec4 {
        self.eye
    }
}

/// An idealized point light with no falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub position: DVec4,
    pub color: Color,
}

impl Light {
    pub fn new(position: DVec4, color: Color) -> Self {
        Self { position, color }
    }
}

/// Everything a renderer needs to produce a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub camera: Camera,
    #[serde(default)]
    pub lights: Vec<Light>,
    #[serde(default)]
    pub objects: Vec<Surface>,
}

impl Scene {
    /// Create an empty scene viewed through `camera`.
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            lights: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Add a light.
    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    /// Add a surface.
    pub fn with_object(mut self, object: impl Into<Surface>) -> Self {
        self.objects.push(object.into());
        self
    }

    /// Iterate over the spheres in insertion order.
    pub fn spheres(&self) -> impl Iterator<Item = &Sphere> {
        self.objects.iter().filter_map(Surface::as_sphere)
    }

    /// Number of sphere surfaces.
    pub fn sphere_count(&self) -> usize {
        self.spheres().count()
    }

    /// Parse a scene from a JSON string.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let scene = Self::from_json_str(&json)?;
        log::info!(
            "Loaded scene {:?}: {} objects, {} lights",
            path,
            scene.objects.len(),
            scene.lights.len()
        );
        Ok(scene)
    }

    /// Serialize the scene as pretty-printed JSON.
    pub fn to_json_string(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
