//! Region fill and buffer-to-buffer copies

use log::debug;

use crate::color::Rgba;
use crate::error::{CanvasError, Result};
use crate::geometry::{Vec2, Viewport};

use super::FrameBuffer;

/// 4-connected fill from the seed pixel.
///
/// The seed's color is captured before any write; neighbors are pushed only
/// when they still match it exactly. Every reached pixel is blended with
/// `color` once, so filling a region with its own color still terminates.
pub fn flood_fill<F: FrameBuffer + ?Sized>(target: &mut F, x: u32, y: u32, color: Rgba) -> Result<()> {
    let (width, height) = (target.width(), target.height());
    if x >= width || y >= height {
        return Err(CanvasError::OutOfBounds {
            x: x as i64,
            y: y as i64,
            width,
            height,
        });
    }

    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;
    let seed_color = target.get_pixel(x, y);
    let mut visited = vec![false; width as usize * height as usize];
    let mut stack = vec![(x, y)];
    visited[index(x, y)] = true;
    let mut filled = 0_usize;

    while let Some((x, y)) = stack.pop() {
        target.blend_pixel(x, y, color);
        filled += 1;

        let neighbors = [
            (x + 1 < width).then(|| (x + 1, y)),
            (x > 0).then(|| (x - 1, y)),
            (y + 1 < height).then(|| (x, y + 1)),
            (y > 0).then(|| (x, y - 1)),
        ];
        for (nx, ny) in neighbors.into_iter().flatten() {
            let i = index(nx, ny);
            if !visited[i] && target.get_pixel(nx, ny) == seed_color {
                visited[i] = true;
                stack.push((nx, ny));
            }
        }
    }

    debug!("flood fill from ({}, {}) covered {} pixels", x, y, filled);
    Ok(())
}

/// Blend `src` into the part of `dst` covered by `location`.
///
/// `location` is in `dst_viewport` coordinates. It is mapped to a pixel
/// rectangle of `dst` (clamped to the buffer), and every pixel in that
/// rectangle samples `src` at the same relative position. Samples that fall
/// outside `src` are transparent.
pub fn blit<D, S>(dst: &mut D, dst_viewport: &Viewport, src: &S, location: &Viewport)
where
    D: FrameBuffer + ?Sized,
    S: FrameBuffer + ?Sized,
{
    let pixel_viewport = dst.pixel_viewport();
    let p1 = Viewport::convert(dst_viewport, &pixel_viewport, Vec2::new(location.left, location.bottom));
    let p2 = Viewport::convert(dst_viewport, &pixel_viewport, Vec2::new(location.right, location.top));

    let clamp_x = |v: f32| v.clamp(0.0, pixel_viewport.right) as u32;
    let clamp_y = |v: f32| v.clamp(0.0, pixel_viewport.top) as u32;
    let (min_x, max_x) = (clamp_x(p1.x), clamp_x(p2.x));
    let (min_y, max_y) = (clamp_y(p1.y), clamp_y(p2.y));
    if min_x > max_x || min_y > max_y {
        debug!("blit target {:?} is empty", location);
        return;
    }

    // A one pixel wide or tall rectangle would make a degenerate mapping
    // source; widen it so that axis samples the source's left/bottom edge.
    let partial = Viewport {
        top: if max_y > min_y { max_y as f32 } else { min_y as f32 + 1.0 },
        bottom: min_y as f32,
        left: min_x as f32,
        right: if max_x > min_x { max_x as f32 } else { min_x as f32 + 1.0 },
    };
    let src_viewport = src.pixel_viewport();

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Viewport::convert(&partial, &src_viewport, Vec2::new(x as f32, y as f32));
            let (sx, sy) = (p.x as i64, p.y as i64);
            let color = if p.x >= 0.0 && p.y >= 0.0 && src.in_bounds(sx, sy) {
                src.get_pixel(sx as u32, sy as u32)
            } else {
                Rgba::NONE
            };
            dst.blend_pixel(x, y, color);
        }
    }
}
