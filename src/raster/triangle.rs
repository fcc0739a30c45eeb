//! Triangle scan conversion: vertex sort, flat-top/flat-bottom decomposition
//! and lockstep edge walking

use log::trace;

use crate::color::Rgba;
use crate::display::PixelBuffer;
use crate::geometry::Viewport;
use crate::primitives::Triangle;

use super::{Bresenham, FrameBuffer};

/// Mapped coordinates beyond this magnitude are treated as unrenderable
const MAX_PIXEL_COORD: f32 = (1u64 << 31) as f32;

/// Draw a world-space triangle into `target`.
///
/// The fill happens in a scratch buffer covering the triangle's bounding box
/// (clipped to `target`), then the scratch is blended onto `target`, so every
/// covered pixel receives the color exactly once.
pub fn draw_triangle<F: FrameBuffer + ?Sized>(target: &mut F, viewport: &Viewport, triangle: &Triangle) {
    if triangle.color.is_none() {
        return;
    }

    let pixel_viewport = target.pixel_viewport();
    let mut pts = [(0_i64, 0_i64); 3];
    for (out, p) in pts.iter_mut().zip(triangle.points) {
        let q = Viewport::convert(viewport, &pixel_viewport, p);
        let (x, y) = (q.x.floor(), q.y.floor());
        if !(x.abs() < MAX_PIXEL_COORD && y.abs() < MAX_PIXEL_COORD) {
            trace!("skipping triangle with unrenderable vertex {}", q);
            return;
        }
        *out = (x as i64, y as i64);
    }

    let left = pts.iter().map(|p| p.0).min().unwrap_or(0).max(0);
    let right = pts.iter().map(|p| p.0).max().unwrap_or(0).min(target.width() as i64 - 1);
    let bottom = pts.iter().map(|p| p.1).min().unwrap_or(0).max(0);
    let top = pts.iter().map(|p| p.1).max().unwrap_or(0).min(target.height() as i64 - 1);
    if left > right || bottom > top {
        return;
    }

    let mut scratch = PixelBuffer::with_size((right - left + 1) as u32, (top - bottom + 1) as u32);
    let local = pts.map(|(x, y)| (x - left, y - bottom));
    fill_pixel_triangle(&mut scratch, local, triangle.color);

    for y in 0..scratch.height() {
        for x in 0..scratch.width() {
            let c = scratch.get_pixel(x, y);
            if !c.is_none() {
                target.blend_pixel(x + left as u32, y + bottom as u32, c);
            }
        }
    }
}

/// Fill an integer-vertex triangle in `target`, clipping writes to its bounds.
///
/// Vertices are sorted by descending y. A flat bottom or flat top is filled
/// directly; otherwise the triangle is split at the middle vertex's row into a
/// flat-bottom upper half and a flat-top lower half.
pub fn fill_pixel_triangle(target: &mut PixelBuffer, verts: [(i64, i64); 3], color: Rgba) {
    let mut v = verts;
    v.sort_by(|a, b| b.1.cmp(&a.1));
    let [v0, v1, v2] = v;

    if v1.1 == v2.1 {
        fill_flat_bottom(target, v1.0.min(v2.0), v1.0.max(v2.0), v2.1, v0, color);
    } else if v0.1 == v1.1 {
        fill_flat_top(target, v0.0.min(v1.0), v0.0.max(v1.0), v0.1, v2, color);
    } else {
        // x on the long edge v0 -> v2 at the middle vertex's row
        let t = (v1.1 - v0.1) as f64 / (v2.1 - v0.1) as f64;
        let split_x = (v0.0 as f64 + t * (v2.0 - v0.0) as f64).floor() as i64;
        let split_y = v1.1;

        let (left_x, right_x) = (v1.0.min(split_x), v1.0.max(split_x));
        fill_flat_bottom(target, left_x, right_x, split_y, v0, color);
        fill_flat_top(target, left_x, right_x, split_y, v2, color);
    }
}

/// Triangle with a horizontal bottom edge `left_x..=right_x` at `bottom_y`
/// and its apex above
pub fn fill_flat_bottom(
    target: &mut PixelBuffer,
    left_x: i64,
    right_x: i64,
    bottom_y: i64,
    apex: (i64, i64),
    color: Rgba,
) {
    fill_flat(target, apex, left_x, right_x, bottom_y, color);
}

/// Triangle with a horizontal top edge `left_x..=right_x` at `top_y` and its
/// apex below
pub fn fill_flat_top(
    target: &mut PixelBuffer,
    left_x: i64,
    right_x: i64,
    top_y: i64,
    apex: (i64, i64),
    color: Rgba,
) {
    fill_flat(target, apex, left_x, right_x, top_y, color);
}

/// Walk both edges from the apex toward the flat side, one row at a time,
/// filling the span between them. Stops once both edges reach their targets,
/// which also covers zero-height and zero-width triangles.
///
/// Rows outside `target` are skipped, so the work is bounded by the target's
/// size however far the triangle extends.
fn fill_flat(target: &mut PixelBuffer, apex: (i64, i64), left_x: i64, right_x: i64, flat_y: i64, color: Rgba) {
    let low = apex.1.min(flat_y).max(0);
    let high = apex.1.max(flat_y).min(target.height() as i64 - 1);
    if low > high {
        return;
    }
    let (first_row, last_row) = if apex.1 > flat_y { (high, low) } else { (low, high) };

    let mut left = Bresenham::new(apex.0, apex.1, left_x, flat_y);
    let mut right = Bresenham::new(apex.0, apex.1, right_x, flat_y);
    left.skip_to_row(first_row);
    right.skip_to_row(first_row);
    target.hline(left.current().0, right.current().0, first_row, color);

    loop {
        let row = left.current().1;
        let left_done = walk_edge_to_next_row(target, &mut left, color);
        let right_done = walk_edge_to_next_row(target, &mut right, color);

        let (span_left, _) = left.current();
        let (span_right, y) = right.current();
        target.hline(span_left, span_right, y, color);

        if (left_done && right_done) || row == last_row {
            break;
        }
    }
}

/// Plot the edge's pixels on its current row and step onto the next row.
/// Returns `true` when the edge has reached its end point.
fn walk_edge_to_next_row(target: &mut PixelBuffer, edge: &mut Bresenham, color: Rgba) -> bool {
    let (x, y) = edge.current();
    edge.jump_to_row_end();
    target.hline(x, edge.current().0, y, color);
    edge.advance()
}
