use crate::color::Rgba;
use crate::error::{CanvasError, Result};
use crate::raster::FrameBuffer;

// ============================================================================
// Utility Functions
// ============================================================================

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order, as SDL
/// streaming textures expect)
#[inline]
fn write_pixel_rgba(dest: &mut [u8], r: u8, g: u8, b: u8, a: u8) {
    dest[0] = a; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// Software backing store: row-major grid of [`Rgba`], row 0 at the bottom
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pixels: Vec<Rgba>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a fully transparent buffer
    pub fn with_size(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::NONE)
    }

    /// Create a buffer with every pixel set to `color`
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            pixels: vec![color; width as usize * height as usize],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && x < self.width as i64 && y >= 0 && y < self.height as i64
    }

    /// Index of pixel (x, y) in the row-major storage
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Read a pixel.
    ///
    /// Panics if (x, y) is outside the buffer.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba {
        debug_assert!(
            x < self.width && y < self.height,
            "get_pixel({}, {}) outside {}x{} buffer",
            x,
            y,
            self.width,
            self.height
        );
        self.pixels[self.pixel_index(x, y)]
    }

    /// Write a pixel.
    ///
    /// Panics if (x, y) is outside the buffer.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        debug_assert!(
            x < self.width && y < self.height,
            "set_pixel({}, {}) outside {}x{} buffer",
            x,
            y,
            self.width,
            self.height
        );
        let idx = self.pixel_index(x, y);
        self.pixels[idx] = color;
    }

    /// Bounds-checked read
    pub fn try_get_pixel(&self, x: i64, y: i64) -> Result<Rgba> {
        if self.in_bounds(x, y) {
            Ok(self.get_pixel(x as u32, y as u32))
        } else {
            Err(self.out_of_bounds(x, y))
        }
    }

    /// Bounds-checked write
    pub fn try_set_pixel(&mut self, x: i64, y: i64, color: Rgba) -> Result<()> {
        if self.in_bounds(x, y) {
            self.set_pixel(x as u32, y as u32, color);
            Ok(())
        } else {
            Err(self.out_of_bounds(x, y))
        }
    }

    fn out_of_bounds(&self, x: i64, y: i64) -> CanvasError {
        CanvasError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Write a horizontal run of pixels, clipped to the buffer
    pub fn hline(&mut self, x1: i64, x2: i64, y: i64, color: Rgba) {
        if y < 0 || y >= self.height as i64 {
            return;
        }
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let start = x1.max(0);
        let end = x2.min(self.width as i64 - 1);
        if start > end {
            return;
        }

        let row = self.pixel_index(0, y as u32);
        self.pixels[row + start as usize..=row + end as usize].fill(color);
    }

    /// Row-major pixels, bottom row first
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// One row of pixels (row 0 is the bottom of the image)
    pub fn row(&self, y: u32) -> &[Rgba] {
        let start = self.pixel_index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    /// RGBA8888 bytes with the top row first, ready for texture upload
    pub fn to_rgba8888_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0; self.pixels.len() * 4];
        let stride = self.width as usize * 4;

        for y in 0..self.height {
            let dst_row = (self.height - 1 - y) as usize * stride;
            for (x, color) in self.row(y).iter().enumerate() {
                let idx = dst_row + x * 4;
                let (r, g, b, a) = color.to_rgba8();
                write_pixel_rgba(&mut bytes[idx..idx + 4], r, g, b, a);
            }
        }

        bytes
    }
}

impl FrameBuffer for PixelBuffer {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn get_pixel(&self, x: u32, y: u32) -> Rgba {
        PixelBuffer::get_pixel(self, x, y)
    }

    #[inline]
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        PixelBuffer::set_pixel(self, x, y, color);
    }
}
