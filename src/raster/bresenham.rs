//! Integer line stepping

use crate::color::Rgba;

use super::FrameBuffer;

/// Bresenham stepper between two integer points.
///
/// Iterating yields every pixel from start to end inclusive, each exactly once.
/// [`Bresenham::advance`] gives step-at-a-time control for the triangle edge
/// walkers, which need to stop whenever the row changes.
/// [`Bresenham::skip_to_row`] and [`Bresenham::jump_to_row_end`] place the
/// stepper directly on the pixel it would reach by stepping, so walks can
/// skip the part of an edge that lies outside the target.
#[derive(Debug, Clone)]
pub struct Bresenham {
    start_x: i64,
    start_y: i64,
    x: i64,
    y: i64,
    end_x: i64,
    end_y: i64,
    dx: i64,
    dy: i64,
    sx: i64,
    sy: i64,
    error: i64,
    done: bool,
}

impl Bresenham {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        let dx = (x1 - x2).abs();
        let dy = -(y1 - y2).abs();
        Self {
            start_x: x1,
            start_y: y1,
            x: x1,
            y: y1,
            end_x: x2,
            end_y: y2,
            dx,
            dy,
            sx: if x1 > x2 { -1 } else { 1 },
            sy: if y1 > y2 { -1 } else { 1 },
            error: dx + dy,
            done: false,
        }
    }

    /// Current pixel
    #[inline]
    pub fn current(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// Put the stepper on the first pixel it visits in row `y`.
    ///
    /// `y` must lie between the start and end rows. Takes constant time.
    pub fn skip_to_row(&mut self, y: i64) {
        let dx = i128::from(self.dx);
        let dy = -i128::from(self.dy);
        let j = i128::from((y - self.start_y).abs());

        let i = if j == 0 || dy == 0 {
            0
        } else if dx >= dy {
            // x-major: every row change is diagonal, one past the previous
            // row's last pixel
            ceil_div(dx * (2 * j - 1), 2 * dy)
        } else {
            // y-major: one pixel per row
            (floor_div(2 * dx * j - dy, 2 * dy) + 1).max(0)
        };
        self.place(i, j);
    }

    /// Move along the current row to the last pixel the stepper visits on it.
    /// Takes constant time.
    pub fn jump_to_row_end(&mut self) {
        let dx = i128::from(self.dx);
        let dy = -i128::from(self.dy);
        let i = i128::from((self.x - self.start_x).abs());
        let j = i128::from((self.y - self.start_y).abs());

        let last = if dy == 0 {
            dx
        } else {
            i.max(ceil_div(dx * (2 * j + 1), 2 * dy) - 1).min(dx)
        };
        self.place(last, j);
    }

    /// Set the position `i` steps along x and `j` along y from the start,
    /// with the error term stepping would have accumulated
    fn place(&mut self, i: i128, j: i128) {
        let error = i128::from(self.dx) * (1 + j) + i128::from(self.dy) * (1 + i);
        self.x = self.start_x + self.sx * i as i64;
        self.y = self.start_y + self.sy * j as i64;
        // Bounded by the deltas once back on the path
        self.error = error as i64;
    }

    /// Move one step toward the end point.
    ///
    /// Returns `true` when the stepper is already at the end and did not move.
    /// A diagonal step moves x and y together.
    pub fn advance(&mut self) -> bool {
        if self.x == self.end_x && self.y == self.end_y {
            return true;
        }

        let e2 = 2 * self.error;
        if e2 >= self.dy {
            if self.x == self.end_x {
                return true;
            }
            self.error += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            if self.y == self.end_y {
                return true;
            }
            self.error += self.dx;
            self.y += self.sy;
        }

        false
    }
}

impl Iterator for Bresenham {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let pos = self.current();
        self.done = self.advance();
        Some(pos)
    }
}

fn ceil_div(n: i128, d: i128) -> i128 {
    -floor_div(-n, d)
}

fn floor_div(n: i128, d: i128) -> i128 {
    let q = n / d;
    if (n % d != 0) && ((n < 0) != (d < 0)) {
        q - 1
    } else {
        q
    }
}

/// Blend every pixel on the integer line from (x1, y1) to (x2, y2).
/// Pixels outside the buffer are skipped.
pub fn draw_pixel_line<F: FrameBuffer + ?Sized>(
    target: &mut F,
    x1: i64,
    y1: i64,
    x2: i64,
    y2: i64,
    color: Rgba,
) {
    for (x, y) in Bresenham::new(x1, y1, x2, y2) {
        if target.in_bounds(x, y) {
            target.blend_pixel(x as u32, y as u32, color);
        }
    }
}
