use std::f32::consts::TAU;

use crate::geometry::{Vec2, Viewport};
use crate::primitives::{Circle, Triangle};

use super::{draw_triangle, FrameBuffer};

/// Angular step of the circle fan, in radians
pub const CIRCLE_STEP: f32 = 0.1;

/// Point on the circle at angle `t`
#[inline]
fn perimeter(circle: &Circle, t: f32) -> Vec2 {
    circle.origin + Vec2::new(t.cos(), t.sin()) * circle.radius
}

/// Wedges of the fan around the circle's origin: one per angular step while
/// the angle stays within a full turn, then one closing the remaining gap back
/// to angle zero.
pub fn fan_wedges(circle: &Circle) -> Vec<Triangle> {
    let first = perimeter(circle, 0.0);
    let mut wedges = Vec::new();
    let mut prev = first;
    let mut i = 1_u32;
    loop {
        let t = i as f32 * CIRCLE_STEP;
        if t > TAU {
            break;
        }
        let next = perimeter(circle, t);
        wedges.push(Triangle::new(circle.origin, prev, next, circle.color));
        prev = next;
        i += 1;
    }

    wedges.push(Triangle::new(circle.origin, prev, first, circle.color));
    wedges
}

/// Draw a filled circle as a fan of wedge triangles around its origin.
///
/// The fan has a fixed number of wedges whatever the radius, so large circles
/// look polygonal.
pub fn draw_circle<F: FrameBuffer + ?Sized>(target: &mut F, viewport: &Viewport, circle: &Circle) {
    if circle.color.is_none() {
        return;
    }

    for wedge in fan_wedges(circle) {
        draw_triangle(target, viewport, &wedge);
    }
}
