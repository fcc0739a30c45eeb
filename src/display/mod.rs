//! Backing stores: the in-memory pixel buffer, BMP output and the optional
//! SDL2 window

mod bmp;
mod pixel_buffer;
#[cfg(feature = "window")]
mod window;

pub use bmp::{encode_bmp, write_bmp};
pub use pixel_buffer::PixelBuffer;
#[cfg(feature = "window")]
pub use window::{AcceleratedCanvas, SdlSurface};

pub const DEFAULT_WIDTH: u32 = 500;
pub const DEFAULT_HEIGHT: u32 = 500;
