//! Lumen Core - scene description for the Lumen ray caster.
//!
//! This crate provides:
//!
//! - **Surfaces**: the closed `Surface` set (`Sphere`, checkerboard `Plane`)
//!   with intersection, normal and color queries
//! - **Scene**: pinhole `Camera`, point `Light`s and the object list,
//!   loadable from JSON
//! - **Presets**: the seeded random sphere field used by the CLI and benches
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::presets::demo_scene;
//!
//! let scene = demo_scene(1024, 2023, true);
//! println!("{} objects, {} lights", scene.objects.len(), scene.lights.len());
//! ```

pub mod presets;
pub mod scene;
pub mod surface;

// Re-export commonly used types
pub use scene::{Camera, Light, Scene, SceneError, SceneResult, ScreenProjection};
pub use surface::{Intersection, Plane, Sphere, Surface, TILE_SIZE};
