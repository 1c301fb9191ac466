//! 24-bit uncompressed BMP encoder.
//!
//! Layout: a 14-byte file header, a 40-byte `BITMAPINFOHEADER`, then pixel
//! rows from the bottom of the picture up, each row stored as B,G,R triples
//! and zero-padded to a multiple of four bytes.
//!
//! The file-size field is `54 + 3 * width * height`; row padding is written
//! but not counted, which keeps output byte-identical to existing reference
//! files. Readers rely on the pixel-data offset and dimensions instead.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::buffer::ImageBuffer;
use crate::error::RenderResult;

const FILE_HEADER_SIZE: usize = 14;
const INFO_HEADER_SIZE: usize = 40;
/// Offset of the first pixel byte.
pub const PIXEL_DATA_OFFSET: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

/// Zero bytes appended to each row of `width` pixels.
#[inline]
pub fn row_padding(width: usize) -> usize {
    (4 - (width * 3) % 4) % 4
}

/// Value stored in the header's file-size field.
#[inline]
pub fn header_file_size(width: usize, height: usize) -> u32 {
    (PIXEL_DATA_OFFSET + 3 * width * height) as u32
}

fn headers(width: usize, height: usize) -> [u8; PIXEL_DATA_OFFSET] {
    let mut header = [0u8; PIXEL_DATA_OFFSET];

    // File header
    header[0] = b'B';
    header[1] = b'M';
    header[2..6].copy_from_slice(&header_file_size(width, height).to_le_bytes());
    header[10..14].copy_from_slice(&(PIXEL_DATA_OFFSET as u32).to_le_bytes());

    // Info header
    let info = &mut header[FILE_HEADER_SIZE..];
    info[0..4].copy_from_slice(&(INFO_HEADER_SIZE as u32).to_le_bytes());
    info[4..8].copy_from_slice(&(width as u32).to_le_bytes());
    info[8..12].copy_from_slice(&(height as u32).to_le_bytes());
    info[12..14].copy_from_slice(&1u16.to_le_bytes()); // planes
    info[14..16].copy_from_slice(&24u16.to_le_bytes()); // bits per pixel

    header
}

/// Encode `image` as BMP into `writer`.
pub fn encode_bmp<W: Write>(image: &ImageBuffer, mut writer: W) -> io::Result<()> {
    let (width, height) = (image.width(), image.height());
    writer.write_all(&headers(width, height))?;

    let pad = [0u8; 3];
    let mut row = Vec::with_capacity(width * 3 + 3);
    for y in 0..height {
        row.clear();
        for x in 0..width {
            let p = image.get(x, y);
            row.extend_from_slice(&[p.b, p.g, p.r]);
        }
        row.extend_from_slice(&pad[..row_padding(width)]);
        writer.write_all(&row)?;
    }

    writer.flush()
}

/// Write `image` as a BMP file at `path`.
pub fn save_bmp(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let file = File::create(path.as_ref())?;
    encode_bmp(image, BufWriter::new(file))?;
    Ok(())
}
