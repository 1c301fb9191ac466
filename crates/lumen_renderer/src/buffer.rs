//! In-memory pixel grid.

use image::RgbImage;
use lumen_math::{Color, Pixel};

/// A `width` x `height` grid of pixels, row-major.
///
/// Pixel `(x, y)` lives at `x + y * width`. Row 0 is the bottom of the
/// picture, matching the way rays are laid out on the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with white.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Pixel::default(); width * height],
        }
    }

    /// Resize to `width` x `height` and clear to white, reusing the
    /// allocation where possible.
    pub fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, Pixel::default());
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: usize, y: usize) -> Pixel {
        self.pixels[x + y * self.width]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        self.pixels[x + y * self.width] = color.into();
    }

    /// All pixels, row-major from the bottom row up.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Raw RGB bytes, row-major from the bottom row up.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Convert to an `image` RGB image with the usual top-down row order.
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut out = RgbImage::new(self.width as u32, self.height as u32);
        for (x, y, px) in out.enumerate_pixels_mut() {
            let p = self.get(x as usize, self.height - 1 - y as usize);
            *px = image::Rgb([p.r, p.g, p.b]);
        }
        out
    }
}
