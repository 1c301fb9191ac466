//! Lumen Renderer - CPU ray casting.
//!
//! Casts one primary ray per pixel, finds the nearest surface and shades it
//! with a Phong model. Frames can be rendered serially, with rayon
//! fork-join loops, or with batched SIMD sphere intersection, and are saved
//! as 24-bit BMP files.

mod batch;
mod bmp;
mod buffer;
mod error;
mod intersect;
mod renderer;
mod shading;

pub use batch::{BatchSize, SphereBatch};
pub use bmp::{encode_bmp, header_file_size, row_padding, save_bmp, PIXEL_DATA_OFFSET};
pub use buffer::ImageBuffer;
pub use error::{RenderError, RenderResult};
pub use intersect::{closer, nearest_hit, nearest_hit_among, Hit};
pub use renderer::{RenderConfig, RenderMode, RenderState, Renderer};
pub use shading::{clamped_cosine, cosine, shade, KA, KD, KS, SHININESS};
