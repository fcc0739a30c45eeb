//! Uncompressed 24-bit BMP output

use std::fs;
use std::path::Path;

use log::info;

use super::PixelBuffer;
use crate::error::Result;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;
const BITS_PER_PIXEL: u16 = 24;
const COLORS_USED: u32 = 1 << 24;

/// Encode the buffer as a BMP file image.
///
/// Rows are stored bottom-up, which matches the buffer's own row order, as
/// B, G, R bytes padded to a multiple of four. The resolution fields carry
/// the image width and height. Alpha is dropped.
pub fn encode_bmp(buffer: &PixelBuffer) -> Vec<u8> {
    let (width, height) = (buffer.width(), buffer.height());
    let padding = (4 - (width * 3) % 4) % 4;
    let data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
    let file_size = data_offset + height * (width * 3 + padding);

    let mut out = Vec::with_capacity(file_size as usize);

    // File header
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&0_u32.to_le_bytes());
    out.extend_from_slice(&data_offset.to_le_bytes());

    // BITMAPINFOHEADER
    out.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&1_u16.to_le_bytes());
    out.extend_from_slice(&BITS_PER_PIXEL.to_le_bytes());
    out.extend_from_slice(&0_u32.to_le_bytes()); // no compression
    out.extend_from_slice(&0_u32.to_le_bytes()); // image size, may be 0 when uncompressed
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&COLORS_USED.to_le_bytes());
    out.extend_from_slice(&0_u32.to_le_bytes());

    for y in 0..height {
        for color in buffer.row(y) {
            let (r, g, b, _) = color.to_rgba8();
            out.extend_from_slice(&[b, g, r]);
        }
        out.extend(std::iter::repeat(0).take(padding as usize));
    }

    out
}

/// Encode and write the buffer to `path`
pub fn write_bmp(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, encode_bmp(buffer))?;
    info!("wrote {}x{} bitmap to {}", buffer.width(), buffer.height(), path.display());
    Ok(())
}
