// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod color;
mod ray;
mod vector;

pub use color::{Color, Pixel};
pub use ray::Ray;
pub use vector::{cross3, direction, point};
