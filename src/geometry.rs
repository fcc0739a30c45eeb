//! Vector math, viewports and world-space line clipping

use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{CanvasError, Result};

/// A point or direction in 2D space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector with both components set to `t`
    #[inline]
    pub const fn splat(t: f32) -> Self {
        Self { x: t, y: t }
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn len_squared(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn len(self) -> f32 {
        self.len_squared().sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// A zero vector divides by zero and yields NaN components; use
    /// [`Vec2::try_normalize`] when the length is not known to be positive.
    #[inline]
    pub fn normalize(self) -> Vec2 {
        self / self.len()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector
    #[inline]
    pub fn try_normalize(self) -> Option<Vec2> {
        let len = self.len();
        if len > 0.0 && len.is_finite() {
            Some(self / len)
        } else {
            None
        }
    }

    /// Counter-clockwise perpendicular `(-y, x)`
    #[inline]
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    #[inline]
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    #[inline]
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, t: f32) -> Vec2 {
        Vec2::new(self.x * t, self.y * t)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn div(self, t: f32) -> Vec2 {
        Vec2::new(self.x / t, self.y / t)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Vec2::new(x, y)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ============================================================================
// Viewport
// ============================================================================

/// An axis-aligned rectangle describing a coordinate space.
///
/// World viewports are whatever the caller picks; the pixel viewport of a
/// `width x height` buffer is `{top: height-1, bottom: 0, left: 0, right: width-1}`,
/// so row 0 is the bottom row of the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Viewport {
    pub const fn new(top: f32, bottom: f32, left: f32, right: f32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Pixel-space viewport for a buffer of the given size
    pub fn pixel(width: u32, height: u32) -> Self {
        Self {
            top: height.saturating_sub(1) as f32,
            bottom: 0.0,
            left: 0.0,
            right: width.saturating_sub(1) as f32,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// True when this viewport cannot be used as a conversion source
    pub fn is_degenerate(&self) -> bool {
        !(self.right > self.left && self.top > self.bottom)
            || !self.width().is_finite()
            || !self.height().is_finite()
    }

    /// Returns the viewport unchanged, or an error if it is degenerate
    pub fn validated(self) -> Result<Self> {
        if self.is_degenerate() {
            return Err(CanvasError::DegenerateViewport {
                top: self.top,
                bottom: self.bottom,
                left: self.left,
                right: self.right,
            });
        }
        Ok(self)
    }

    /// Inclusive bounds test
    pub fn contains(&self, pt: Vec2) -> bool {
        pt.x <= self.right && pt.x >= self.left && pt.y <= self.top && pt.y >= self.bottom
    }

    /// Map a point's relative position inside `from` to the same relative
    /// position inside `to`.
    ///
    /// `from` must not be degenerate; a zero-width or zero-height source
    /// divides by zero.
    #[inline]
    pub fn convert(from: &Viewport, to: &Viewport, pt: Vec2) -> Vec2 {
        let u = (pt.x - from.left) / from.width();
        let v = (pt.y - from.bottom) / from.height();

        Vec2::new(u * to.width() + to.left, v * to.height() + to.bottom)
    }

    /// Map a scalar length from `from` to `to`.
    ///
    /// The result is the average of the horizontal and vertical scale factors,
    /// which is only exact when both viewports have the same aspect ratio.
    #[inline]
    pub fn convert_length(from: &Viewport, to: &Viewport, len: f32) -> f32 {
        let u = len / from.width();
        let v = len / from.height();

        (u * to.width() + v * to.height()) * 0.5
    }
}

// ============================================================================
// Line clipping
// ============================================================================

/// Intersect the line `p1 + t1 * d1` with the line `p2 + t2 * d2`.
///
/// Returns `t1` at the intersection, or `None` when the lines are parallel.
pub fn intersect_lines(p1: Vec2, d1: Vec2, p2: Vec2, d2: Vec2) -> Option<f32> {
    // d1.x * t1 - d2.x * t2 = p2.x - p1.x
    // d1.y * t1 - d2.y * t2 = p2.y - p1.y
    // => t1 * (d2.y * d1.x - d2.x * d1.y) = d2.y * (p2.x - p1.x) - d2.x * (p2.y - p1.y)
    let div = d2.y * d1.x - d2.x * d1.y;
    if div == 0.0 {
        return None;
    }

    Some((d2.y * (p2.x - p1.x) - d2.x * (p2.y - p1.y)) / div)
}

/// Clip the segment `start -> end` to the inclusive bounds of `viewport`.
///
/// Returns the visible part of the segment, or `None` when the segment is
/// entirely outside or has zero length.
pub fn clip_segment(start: Vec2, end: Vec2, viewport: &Viewport) -> Option<(Vec2, Vec2)> {
    let dir = end - start;
    if dir.x == 0.0 && dir.y == 0.0 {
        return None;
    }

    let bottom_left = Vec2::new(viewport.left, viewport.bottom);
    let bottom_right = Vec2::new(viewport.right, viewport.bottom);
    let vertical = Vec2::new(0.0, viewport.height());
    let horizontal = Vec2::new(viewport.width(), 0.0);

    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;

    // Left/right edges; parallel when the segment is vertical
    match (
        intersect_lines(start, dir, bottom_left, vertical),
        intersect_lines(start, dir, bottom_right, vertical),
    ) {
        (Some(t_left), Some(t_right)) => {
            t_enter = t_enter.max(t_left.min(t_right));
            t_exit = t_exit.min(t_left.max(t_right));
        },
        _ => {
            if start.x < viewport.left || start.x > viewport.right {
                return None;
            }
        },
    }

    // Bottom/top edges; parallel when the segment is horizontal
    let top_left = Vec2::new(viewport.left, viewport.top);
    match (
        intersect_lines(start, dir, bottom_left, horizontal),
        intersect_lines(start, dir, top_left, horizontal),
    ) {
        (Some(t_bottom), Some(t_top)) => {
            t_enter = t_enter.max(t_bottom.min(t_top));
            t_exit = t_exit.min(t_bottom.max(t_top));
        },
        _ => {
            if start.y < viewport.bottom || start.y > viewport.top {
                return None;
            }
        },
    }

    if t_enter > t_exit {
        return None;
    }

    let clipped_start = if t_enter == 0.0 { start } else { start + dir * t_enter };
    let clipped_end = if t_exit == 1.0 { end } else { start + dir * t_exit };
    Some((clipped_start, clipped_end))
}
