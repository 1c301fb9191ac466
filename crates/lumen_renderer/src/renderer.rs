//! Frame renderer.
//!
//! A `Renderer` owns its scene and walks three states:
//!
//! - **Unconfigured**: fresh, or the camera/objects changed since the last
//!   `prepare`
//! - **Prepared**: image buffer sized and sphere batch data rebuilt
//! - **Rendered**: the buffer holds a complete frame and can be saved
//!
//! Every pixel reads only the immutable scene, the frame's projection and
//! its own coordinates, and writes exactly one buffer slot. The parallel
//! modes hand disjoint row slices to rayon tasks, so no locking is needed.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use lumen_core::{Camera, Light, Scene, ScreenProjection, Surface};
use lumen_math::{Color, Pixel, Ray};
use rayon::prelude::*;

use crate::batch::{BatchSize, SphereBatch};
use crate::bmp::save_bmp;
use crate::buffer::ImageBuffer;
use crate::error::{RenderError, RenderResult};
use crate::intersect::{closer, nearest_hit, nearest_hit_among, Hit};
use crate::shading::shade;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Color written where a ray hits nothing
    pub sky_color: Color,
    /// Minimum pixels per parallel task within a row
    pub grain_size: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sky_color: Color::new(135, 206, 235),
            grain_size: 16,
        }
    }
}

/// How the pixel grid is traversed and intersected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Single-threaded loop, scalar intersection
    Serial,
    /// Nested fork-join loops, scalar intersection
    Parallel,
    /// Nested fork-join loops, batched SIMD sphere intersection
    Batched(BatchSize),
}

impl RenderMode {
    /// Batched mode with a size given as a plain number.
    pub fn batched(batch_size: usize) -> RenderResult<Self> {
        Ok(RenderMode::Batched(BatchSize::try_from(batch_size)?))
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Serial => write!(f, "serial"),
            RenderMode::Parallel => write!(f, "parallel"),
            RenderMode::Batched(size) => write!(f, "simd x{}", size),
        }
    }
}

/// Parses `serial`, `parallel`, or `simd`/`batched` (default batch size 8).
impl FromStr for RenderMode {
    type Err = RenderError;

    fn from_str(s: &str) -> RenderResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "serial" | "cpu" => Ok(RenderMode::Serial),
            "parallel" | "tbb" => Ok(RenderMode::Parallel),
            "simd" | "batched" => Ok(RenderMode::Batched(BatchSize::B8)),
            _ => Err(RenderError::UnknownMode(s.to_string())),
        }
    }
}

/// Lifecycle state of a [`Renderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Unconfigured,
    Prepared,
    Rendered,
}

/// Nearest-hit strategy for one frame.
#[derive(Clone, Copy)]
enum Engine<'a> {
    Scalar,
    Batched {
        spheres: &'a SphereBatch,
        others: &'a [usize],
        size: BatchSize,
    },
}

/// Immutable per-frame view shared by every pixel task.
struct Frame<'a> {
    objects: &'a [Surface],
    lights: &'a [Light],
    projection: ScreenProjection,
    engine: Engine<'a>,
    sky: Pixel,
}

impl Frame<'_> {
    #[inline]
    fn nearest(&self, ray: &Ray) -> Option<Hit> {
        match self.engine {
            Engine::Scalar => nearest_hit(ray, self.objects),
            Engine::Batched {
                spheres,
                others,
                size,
            } => closer(
                spheres.nearest_unchecked(ray, size),
                nearest_hit_among(ray, self.objects, others),
            ),
        }
    }

    /// Final color of pixel `(i, j)`.
    #[inline]
    fn pixel(&self, i: usize, j: usize) -> Pixel {
        match self.nearest(&self.projection.ray(i, j)) {
            Some(hit) => shade(
                hit.point,
                self.projection.eye(),
                &self.objects[hit.index],
                self.lights,
            )
            .into(),
            None => self.sky,
        }
    }
}

/// Ray casting renderer over an owned scene.
pub struct Renderer {
    scene: Scene,
    config: RenderConfig,
    state: RenderState,
    image: ImageBuffer,
    spheres: SphereBatch,
    others: Vec<usize>,
}

impl Renderer {
    /// Create an unconfigured renderer.
    pub fn new(scene: Scene, config: RenderConfig) -> Self {
        Self {
            scene,
            config,
            state: RenderState::Unconfigured,
            image: ImageBuffer::new(0, 0),
            spheres: SphereBatch::default(),
            others: Vec::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Replace the camera. The renderer must be prepared again.
    pub fn set_camera(&mut self, camera: Camera) {
        self.scene.camera = camera;
        self.state = RenderState::Unconfigured;
    }

    /// Mutable access to the scene. The renderer must be prepared again.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.state = RenderState::Unconfigured;
        &mut self.scene
    }

    /// Give the scene back.
    pub fn into_scene(self) -> Scene {
        self.scene
    }

    /// Size the image buffer and rebuild the batched sphere data.
    pub fn prepare(&mut self, width: usize, height: usize) {
        self.image.reset(width, height);
        let (spheres, others) = SphereBatch::partition(&self.scene.objects);
        self.spheres = spheres;
        self.others = others;
        self.state = RenderState::Prepared;

        log::debug!(
            "Prepared {}x{}: {} spheres batched, {} other objects",
            width,
            height,
            self.spheres.len(),
            self.others.len()
        );
        if self.scene.lights.is_empty() {
            log::warn!("Scene has no lights; surfaces will only show ambient color");
        }
    }

    /// Render one frame into the image buffer.
    ///
    /// Configuration problems are reported before any pixel is touched.
    pub fn render_image(&mut self, mode: RenderMode) -> RenderResult<&ImageBuffer> {
        if self.state == RenderState::Unconfigured {
            return Err(RenderError::NotPrepared);
        }

        let engine = match mode {
            RenderMode::Serial | RenderMode::Parallel => Engine::Scalar,
            RenderMode::Batched(size) => {
                self.spheres.check(size)?;
                Engine::Batched {
                    spheres: &self.spheres,
                    others: &self.others,
                    size,
                }
            }
        };

        let start = Instant::now();
        let (width, height) = (self.image.width(), self.image.height());
        let frame = Frame {
            objects: &self.scene.objects,
            lights: &self.scene.lights,
            projection: self.scene.camera.projection(width, height),
            engine,
            sky: self.config.sky_color.into(),
        };

        let pixels = self.image.pixels_mut();
        match mode {
            RenderMode::Serial => render_serial(&frame, pixels, width, height),
            RenderMode::Parallel | RenderMode::Batched(_) => {
                render_parallel(&frame, pixels, width, self.config.grain_size)
            }
        }

        self.state = RenderState::Rendered;
        log::info!(
            "Rendered {}x{} ({} objects) in {:?} [{}]",
            width,
            height,
            self.scene.objects.len(),
            start.elapsed(),
            mode
        );
        Ok(&self.image)
    }

    /// The most recent frame.
    pub fn image(&self) -> RenderResult<&ImageBuffer> {
        match self.state {
            RenderState::Rendered => Ok(&self.image),
            _ => Err(RenderError::NotRendered),
        }
    }

    /// Write the most recent frame as a BMP file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        save_bmp(self.image()?, path)?;
        log::debug!("Saved frame to {:?}", path);
        Ok(())
    }
}

/// Column-by-column scan in a fixed order.
fn render_serial(frame: &Frame<'_>, pixels: &mut [Pixel], width: usize, height: usize) {
    for i in 0..width {
        for j in 0..height {
            pixels[i + j * width] = frame.pixel(i, j);
        }
    }
}

/// Fork-join over rows, then over pixels within each row.
///
/// Each task owns a disjoint slice of the buffer.
fn render_parallel(frame: &Frame<'_>, pixels: &mut [Pixel], width: usize, grain_size: usize) {
    if width == 0 {
        return;
    }
    let grain = grain_size.max(1);

    pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(j, row)| {
            row.par_iter_mut()
                .with_min_len(grain)
                .enumerate()
                .for_each(|(i, px)| *px = frame.pixel(i, j));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::presets::demo_scene;
    use lumen_core::{Plane, Sphere};
    use lumen_math::{direction, point};

    /// One radius-2 sphere in front of a camera looking along (1, 1, -1),
    /// seen with a horizontal field of view of `fov` degrees.
    fn single_sphere_scene_with_fov(fov: f64) -> Scene {
        Scene::new(Camera::new(
            point(-5.0, -5.0, 5.0),
            point(-4.0, -4.0, 4.0),
            direction(0.0, 0.0, 1.0),
            fov,
        ))
        .with_light(Light::new(point(0.0, 0.0, 5.0), Color::WHITE))
        .with_object(Sphere::new(point(0.0, 2.0, 0.0), 2.0, Color::new(200, 40, 40)))
    }

    fn single_sphere_scene() -> Scene {
        single_sphere_scene_with_fov(60.0)
    }

    fn render(scene: Scene, mode: RenderMode, width: usize, height: usize) -> ImageBuffer {
        let mut renderer = Renderer::new(scene, RenderConfig::default());
        renderer.prepare(width, height);
        renderer.render_image(mode).expect("render").clone()
    }

    #[test]
    fn test_state_machine() {
        let mut renderer = Renderer::new(single_sphere_scene(), RenderConfig::default());
        assert_eq!(renderer.state(), RenderState::Unconfigured);
        assert!(matches!(renderer.render_image(RenderMode::Serial), Err(RenderError::NotPrepared)));
        assert!(matches!(renderer.image(), Err(RenderError::NotRendered)));

        renderer.prepare(8, 8);
        assert_eq!(renderer.state(), RenderState::Prepared);
        assert!(matches!(renderer.save_to("unused.bmp"), Err(RenderError::NotRendered)));

        renderer.render_image(RenderMode::Serial).expect("render");
        assert_eq!(renderer.state(), RenderState::Rendered);

        // Re-rendering is allowed without preparing again
        renderer.render_image(RenderMode::Parallel).expect("render again");
        assert_eq!(renderer.state(), RenderState::Rendered);

        renderer.set_camera(renderer.scene().camera);
        assert_eq!(renderer.state(), RenderState::Unconfigured);
        assert!(matches!(renderer.render_image(RenderMode::Serial), Err(RenderError::NotPrepared)));

        renderer.prepare(8, 8);
        let _ = renderer.scene_mut();
        assert_eq!(renderer.state(), RenderState::Unconfigured);
    }

    #[test]
    fn test_single_sphere_center_hit_corners_sky() {
        let sky = Pixel::from(RenderConfig::default().sky_color);

        // The sphere subtends about 21 degrees around the view axis, so any
        // field of view from narrow to the 80 degree demo lens frames it the
        // same way.
        for fov in [60.0, 80.0] {
            let img = render(single_sphere_scene_with_fov(fov), RenderMode::Serial, 64, 64);

            assert_ne!(img.get(32, 32), sky, "fov {}", fov);
            for (x, y) in [(0, 0), (63, 0), (0, 63), (63, 63), (2, 2), (61, 61)] {
                assert_eq!(img.get(x, y), sky, "fov {} corner ({}, {})", fov, x, y);
            }
        }
    }

    #[test]
    fn test_empty_scene_is_all_sky() {
        let scene = Scene::new(single_sphere_scene().camera);
        let sky = Pixel::from(RenderConfig::default().sky_color);

        for mode in [RenderMode::Serial, RenderMode::Parallel, RenderMode::Batched(BatchSize::B4)] {
            let img = render(scene.clone(), mode, 16, 9);
            assert!(img.pixels().iter().all(|p| *p == sky), "{}", mode);
        }
    }

    #[test]
    fn test_custom_sky_color() {
        let scene = Scene::new(single_sphere_scene().camera);
        let config = RenderConfig {
            sky_color: Color::new(1, 2, 3),
            ..Default::default()
        };
        let mut renderer = Renderer::new(scene, config);
        renderer.prepare(4, 4);
        let img = renderer.render_image(RenderMode::Parallel).expect("render");
        assert!(img.pixels().iter().all(|p| *p == Pixel::from(Color::new(1, 2, 3))));
    }

    #[test]
    fn test_serial_and_parallel_are_identical() {
        let scene = demo_scene(64, 7, true);
        let serial = render(scene.clone(), RenderMode::Serial, 96, 54);
        let parallel = render(scene, RenderMode::Parallel, 96, 54);
        assert_eq!(serial.as_bytes(), parallel.as_bytes());
    }

    #[test]
    fn test_batched_matches_serial_for_every_size() {
        let scene = demo_scene(128, 11, true);
        let serial = render(scene.clone(), RenderMode::Serial, 80, 45);

        for size in BatchSize::ALL {
            let batched = render(scene.clone(), RenderMode::Batched(size), 80, 45);
            assert_eq!(serial.as_bytes(), batched.as_bytes(), "batch size {}", size);
        }
    }

    #[test]
    fn test_floor_is_visible_below_horizon() {
        let scene = Scene::new(lumen_core::presets::demo_camera())
            .with_light(Light::new(point(0.0, 0.0, 50.0), Color::WHITE))
            .with_object(Plane::default());
        let sky = Pixel::from(RenderConfig::default().sky_color);
        let img = render(scene, RenderMode::Parallel, 64, 64);

        // Camera looks down; the bottom row sees the floor, the top row the sky
        assert!((0..64).all(|x| img.get(x, 0) != sky));
        assert!((0..64).all(|x| img.get(x, 63) == sky));
    }

    #[test]
    fn test_batch_size_mismatch_is_rejected_before_rendering() {
        let scene = demo_scene(24, 1, false);
        let mut renderer = Renderer::new(scene, RenderConfig::default());
        renderer.prepare(8, 8);

        let err = renderer.render_image(RenderMode::Batched(BatchSize::B16));
        assert!(matches!(
            err,
            Err(RenderError::BatchSizeMismatch {
                batch_size: 16,
                sphere_count: 24
            })
        ));
        // Nothing was rendered
        assert_eq!(renderer.state(), RenderState::Prepared);
        assert!(renderer.image().is_err());
    }

    #[test]
    fn test_plane_does_not_count_toward_batch() {
        // 8 spheres plus the floor: batch size 8 still divides the sphere count
        let scene = demo_scene(8, 3, true);
        let mut renderer = Renderer::new(scene, RenderConfig::default());
        renderer.prepare(8, 8);
        assert!(renderer.render_image(RenderMode::Batched(BatchSize::B8)).is_ok());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("serial".parse::<RenderMode>().unwrap(), RenderMode::Serial);
        assert_eq!("Parallel".parse::<RenderMode>().unwrap(), RenderMode::Parallel);
        assert_eq!(
            "simd".parse::<RenderMode>().unwrap(),
            RenderMode::Batched(BatchSize::B8)
        );
        assert!(matches!(
            "gpu".parse::<RenderMode>(),
            Err(RenderError::UnknownMode(m)) if m == "gpu"
        ));
        assert_eq!(RenderMode::batched(32).unwrap(), RenderMode::Batched(BatchSize::B32));
        assert!(matches!(
            RenderMode::batched(12),
            Err(RenderError::UnsupportedBatchSize(12))
        ));
    }

    #[test]
    fn test_prepare_resizes_between_frames() {
        let mut renderer = Renderer::new(single_sphere_scene(), RenderConfig::default());
        renderer.prepare(8, 4);
        renderer.render_image(RenderMode::Serial).expect("render");
        renderer.prepare(3, 5);
        let img = renderer.render_image(RenderMode::Serial).expect("render");
        assert_eq!((img.width(), img.height()), (3, 5));
        assert_eq!(img.pixels().len(), 15);
    }

    #[test]
    fn test_save_to_writes_bmp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("frame.bmp");

        let mut renderer = Renderer::new(single_sphere_scene(), RenderConfig::default());
        renderer.prepare(6, 4);
        renderer.render_image(RenderMode::Serial).expect("render");
        renderer.save_to(&path).expect("save");

        let bytes = std::fs::read(&path).expect("read back");
        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(bytes.len(), 54 + 4 * (6 * 3 + 2));
    }
}
