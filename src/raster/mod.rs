//! Software scan conversion of primitives into any [`FrameBuffer`]

mod bresenham;
mod circle;
mod fill;
mod line;
mod triangle;

pub use bresenham::{draw_pixel_line, Bresenham};
pub use circle::{draw_circle, fan_wedges, CIRCLE_STEP};
pub use fill::{blit, flood_fill};
pub use line::draw_line;
pub use triangle::{draw_triangle, fill_flat_bottom, fill_flat_top, fill_pixel_triangle};

use crate::background::Background;
use crate::color::{blend, Rgba};
use crate::geometry::{Vec2, Viewport};
use crate::primitives::Primitive;

/// Pixel storage the rasterizer writes into.
///
/// `(0, 0)` is the bottom-left pixel. `get_pixel` and `set_pixel` require
/// `x < width()` and `y < height()`; callers clip before calling.
pub trait FrameBuffer {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn get_pixel(&self, x: u32, y: u32) -> Rgba;
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgba);

    /// Composite `color` over the current pixel
    #[inline]
    fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let under = self.get_pixel(x, y);
        self.set_pixel(x, y, blend(color, under));
    }

    #[inline]
    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64
    }

    /// Viewport covering the buffer in pixel units
    #[inline]
    fn pixel_viewport(&self) -> Viewport {
        Viewport::pixel(self.width(), self.height())
    }
}

/// Rasterize one primitive, skipping it when its color is [`Rgba::NONE`]
pub fn draw_primitive<F: FrameBuffer + ?Sized>(target: &mut F, viewport: &Viewport, primitive: &Primitive) {
    if !primitive.is_visible() {
        return;
    }
    match primitive {
        Primitive::Line(l) => draw_line(target, viewport, l),
        Primitive::Circle(c) => draw_circle(target, viewport, c),
        Primitive::Triangle(t) => draw_triangle(target, viewport, t),
    }
}

/// Overwrite every pixel with the background sampled at the pixel's world
/// position
pub fn draw_background<F: FrameBuffer + ?Sized>(target: &mut F, viewport: &Viewport, background: &dyn Background) {
    let pixel_viewport = target.pixel_viewport();
    for y in 0..target.height() {
        for x in 0..target.width() {
            let world = Viewport::convert(&pixel_viewport, viewport, Vec2::new(x as f32, y as f32));
            target.set_pixel(x, y, background.color(world.x, world.y));
        }
    }
}

/// Color of the pixel under a world-space point, or `None` outside the buffer.
/// Coordinates are truncated toward zero after mapping.
pub fn sample<F: FrameBuffer + ?Sized>(target: &F, viewport: &Viewport, world: Vec2) -> Option<Rgba> {
    let p = Viewport::convert(viewport, &target.pixel_viewport(), world);
    if !(p.x >= 0.0 && p.y >= 0.0 && p.x.is_finite() && p.y.is_finite()) {
        return None;
    }
    let (x, y) = (p.x as i64, p.y as i64);
    if target.in_bounds(x, y) {
        Some(target.get_pixel(x as u32, y as u32))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::PixelBuffer;
    use crate::primitives::Circle;

    #[test]
    fn test_blend_pixel_composites() {
        let mut buf = PixelBuffer::filled(2, 2, Rgba::BLUE);
        buf.blend_pixel(1, 0, Rgba::RED.with_alpha(0.5));
        let c = buf.get_pixel(1, 0);
        assert!((c.r - 0.5).abs() < 1e-6 && (c.b - 0.5).abs() < 1e-6);
        assert_eq!(buf.get_pixel(0, 0), Rgba::BLUE);
    }

    #[test]
    fn test_background_samples_world_space() {
        let mut buf = PixelBuffer::with_size(4, 4);
        let world = Viewport::new(1.0, -1.0, -1.0, 1.0);
        let left_half = |x: f32, _y: f32| if x < 0.0 { Rgba::BLACK } else { Rgba::WHITE };
        draw_background(&mut buf, &world, &left_half);

        assert_eq!(buf.get_pixel(0, 0), Rgba::BLACK);
        assert_eq!(buf.get_pixel(1, 3), Rgba::BLACK);
        assert_eq!(buf.get_pixel(2, 0), Rgba::WHITE);
        assert_eq!(buf.get_pixel(3, 3), Rgba::WHITE);
    }

    #[test]
    fn test_sample_outside_is_none() {
        let buf = PixelBuffer::filled(4, 4, Rgba::GREEN);
        let world = Viewport::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!(sample(&buf, &world, Vec2::new(0.5, 0.5)), Some(Rgba::GREEN));
        assert_eq!(sample(&buf, &world, Vec2::new(2.0, 0.5)), None);
        assert_eq!(sample(&buf, &world, Vec2::new(0.5, -0.5)), None);
        // Just below the bottom edge would truncate to row 0
        assert_eq!(sample(&buf, &world, Vec2::new(0.5, -0.1)), None);
    }

    #[test]
    fn test_invisible_primitive_untouched() {
        let mut buf = PixelBuffer::filled(8, 8, Rgba::WHITE);
        let world = Viewport::pixel(8, 8);
        let p = Primitive::Circle(Circle::new(Vec2::new(4.0, 4.0), 3.0, Rgba::NONE));
        draw_primitive(&mut buf, &world, &p);
        assert!(buf.pixels().iter().all(|c| *c == Rgba::WHITE));
    }
}
