//! Error types for canvas operations
//!
//! Precondition violations that callers can reasonably check for (bad
//! viewports, bad sizes, out-of-range seeds) come back as `CanvasError`.
//! Raw pixel accessors still panic on out-of-range coordinates.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error(
        "degenerate viewport (top {top}, bottom {bottom}, left {left}, right {right}): \
         need right > left and top > bottom"
    )]
    DegenerateViewport {
        top: f32,
        bottom: f32,
        left: f32,
        right: f32,
    },

    #[error("invalid canvas size {width}x{height}: both sides must be at least 2 pixels")]
    InvalidSize { width: u32, height: u32 },

    #[error("pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scene file error: {0}")]
    Scene(#[from] serde_json::Error),

    #[error("window backend error: {0}")]
    Window(String),
}

pub type Result<T> = std::result::Result<T, CanvasError>;
