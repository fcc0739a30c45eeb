use log::trace;

use crate::geometry::{clip_segment, Vec2, Viewport};
use crate::primitives::{Circle, Line, Triangle};

use super::{draw_circle, draw_pixel_line, draw_triangle, FrameBuffer};

/// Draw a world-space line.
///
/// Hairlines are clipped to `viewport` and stepped with Bresenham. Thick lines
/// become a rectangle of two triangles, `2 * thickness` wide, with a round cap
/// of radius `thickness` at each end.
pub fn draw_line<F: FrameBuffer + ?Sized>(target: &mut F, viewport: &Viewport, line: &Line) {
    if line.color.is_none() {
        return;
    }
    if line.is_hairline() {
        draw_hairline(target, viewport, line);
    } else {
        draw_thick_line(target, viewport, line);
    }
}

fn draw_hairline<F: FrameBuffer + ?Sized>(target: &mut F, viewport: &Viewport, line: &Line) {
    let Some((start, end)) = clip_segment(line.start, line.end, viewport) else {
        trace!("hairline {} -> {} clipped away", line.start, line.end);
        return;
    };

    let pixel_viewport = target.pixel_viewport();
    let (x1, y1) = to_pixel(target, viewport, &pixel_viewport, start);
    let (x2, y2) = to_pixel(target, viewport, &pixel_viewport, end);
    draw_pixel_line(target, x1, y1, x2, y2, line.color);
}

/// Map a clipped world point to a pixel, truncating and clamping so rounding
/// at the viewport edge never lands outside the buffer
fn to_pixel<F: FrameBuffer + ?Sized>(target: &F, from: &Viewport, to: &Viewport, pt: Vec2) -> (i64, i64) {
    let p = Viewport::convert(from, to, pt);
    let max_x = target.width().saturating_sub(1) as i64;
    let max_y = target.height().saturating_sub(1) as i64;
    ((p.x as i64).clamp(0, max_x), (p.y as i64).clamp(0, max_y))
}

fn draw_thick_line<F: FrameBuffer + ?Sized>(target: &mut F, viewport: &Viewport, line: &Line) {
    let half_width = line.thickness;

    if let Some(dir) = (line.end - line.start).try_normalize() {
        let offset = dir.perp() * half_width;
        let a = line.start + offset;
        let b = line.start - offset;
        let c = line.end + offset;
        let d = line.end - offset;

        draw_triangle(target, viewport, &Triangle::new(a, b, c, line.color));
        draw_triangle(target, viewport, &Triangle::new(b, c, d, line.color));
    } else {
        trace!("zero length thick line at {}, drawing caps only", line.start);
    }

    draw_circle(target, viewport, &Circle::new(line.start, half_width, line.color));
    draw_circle(target, viewport, &Circle::new(line.end, half_width, line.color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::display::PixelBuffer;

    fn painted(buf: &PixelBuffer, color: Rgba) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                if buf.get_pixel(x, y) == color {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_pixel_aligned_diagonal() {
        let mut buf = PixelBuffer::with_size(10, 10);
        let world = Viewport::new(9.0, 0.0, 0.0, 9.0);
        let line = Line::new(Vec2::new(0.0, 0.0), Vec2::new(9.0, 9.0), Rgba::RED, 0.0);
        draw_line(&mut buf, &world, &line);

        let expected: Vec<(u32, u32)> = (0..10).map(|i| (i, i)).collect();
        assert_eq!(painted(&buf, Rgba::RED), expected);
    }

    #[test]
    fn test_diagonal_in_wider_viewport_truncates_end() {
        // World 0..10 over pixels 0..9: (9, 9) maps to (8.1, 8.1), which
        // truncates onto pixel (8, 8)
        let mut buf = PixelBuffer::with_size(10, 10);
        let world = Viewport::new(10.0, 0.0, 0.0, 10.0);
        let line = Line::new(Vec2::new(0.0, 0.0), Vec2::new(9.0, 9.0), Rgba::RED, 0.0);
        draw_line(&mut buf, &world, &line);

        let expected: Vec<(u32, u32)> = (0..9).map(|i| (i, i)).collect();
        assert_eq!(painted(&buf, Rgba::RED), expected);
        assert_eq!(buf.get_pixel(9, 9), Rgba::NONE);
    }

    #[test]
    fn test_hairline_clipped_to_viewport() {
        let mut buf = PixelBuffer::with_size(10, 10);
        let world = Viewport::new(9.0, 0.0, 0.0, 9.0);
        let line = Line::new(Vec2::new(-20.0, 4.0), Vec2::new(9.0, 4.0), Rgba::BLUE, 0.0);
        draw_line(&mut buf, &world, &line);

        let expected: Vec<(u32, u32)> = (0..10).map(|x| (x, 4)).collect();
        assert_eq!(painted(&buf, Rgba::BLUE), expected);
    }

    #[test]
    fn test_hairline_outside_draws_nothing() {
        let mut buf = PixelBuffer::with_size(10, 10);
        let world = Viewport::new(9.0, 0.0, 0.0, 9.0);
        draw_line(
            &mut buf,
            &world,
            &Line::new(Vec2::new(-5.0, 12.0), Vec2::new(20.0, 12.0), Rgba::BLUE, 0.0),
        );
        draw_line(
            &mut buf,
            &world,
            &Line::new(Vec2::new(3.0, 3.0), Vec2::new(3.0, 3.0), Rgba::BLUE, 0.0),
        );
        assert!(painted(&buf, Rgba::BLUE).is_empty());
    }

    #[test]
    fn test_translucent_hairline_blends() {
        let mut buf = PixelBuffer::filled(10, 10, Rgba::WHITE);
        let world = Viewport::new(9.0, 0.0, 0.0, 9.0);
        let line = Line::new(Vec2::new(0.0, 2.0), Vec2::new(9.0, 2.0), Rgba::BLACK.with_alpha(0.5), 0.0);
        draw_line(&mut buf, &world, &line);

        let c = buf.get_pixel(5, 2);
        assert!((c.r - 0.5).abs() < 1e-6);
        assert_eq!(c.a, 1.0);
        assert_eq!(buf.get_pixel(5, 3), Rgba::WHITE);
    }

    #[test]
    fn test_thick_line_covers_band_and_caps() {
        let mut buf = PixelBuffer::with_size(40, 40);
        let world = Viewport::pixel(40, 40);
        let line = Line::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 20.0), Rgba::RED, 3.0);
        draw_line(&mut buf, &world, &line);

        // Body
        for x in 10..=30 {
            assert_eq!(buf.get_pixel(x, 20), Rgba::RED, "body pixel ({}, 20)", x);
            assert_eq!(buf.get_pixel(x, 18), Rgba::RED, "body pixel ({}, 18)", x);
        }
        // Round caps extend past the endpoints
        assert_eq!(buf.get_pixel(8, 20), Rgba::RED);
        assert_eq!(buf.get_pixel(32, 20), Rgba::RED);
        // Nothing far from the line
        assert_eq!(buf.get_pixel(20, 26), Rgba::NONE);
        assert_eq!(buf.get_pixel(20, 14), Rgba::NONE);
        assert_eq!(buf.get_pixel(36, 20), Rgba::NONE);
    }

    #[test]
    fn test_zero_length_thick_line_draws_cap() {
        let mut buf = PixelBuffer::with_size(20, 20);
        let world = Viewport::pixel(20, 20);
        let line = Line::new(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0), Rgba::GREEN, 4.0);
        draw_line(&mut buf, &world, &line);

        assert_eq!(buf.get_pixel(10, 10), Rgba::GREEN);
        assert_eq!(buf.get_pixel(12, 10), Rgba::GREEN);
        assert_eq!(buf.get_pixel(17, 10), Rgba::NONE);
        assert!(buf.pixels().iter().all(|c| c.r.is_finite()));
    }
}
