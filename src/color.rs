//! RGBA colors and "over" compositing

use serde::{Deserialize, Serialize};

/// Floating point color with straight (non-premultiplied) alpha.
///
/// Channels are nominally in `[0, 1]` but the type does not clamp them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent; primitives with this color are not drawn
    pub const NONE: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const RED: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Rgba = Rgba::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);
    pub const YELLOW: Rgba = Rgba::new(1.0, 1.0, 0.0, 1.0);
    pub const PURPLE: Rgba = Rgba::new(1.0, 0.0, 1.0, 1.0);
    pub const CYAN: Rgba = Rgba::new(0.0, 1.0, 1.0, 1.0);
    pub const GRAY: Rgba = Rgba::new(0.5, 0.5, 0.5, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// True for the "do not draw" sentinel
    #[inline]
    pub fn is_none(&self) -> bool {
        *self == Rgba::NONE
    }

    /// Composite `self` over `bottom`
    #[inline]
    pub fn over(self, bottom: Rgba) -> Rgba {
        blend(self, bottom)
    }

    /// Channels scaled to bytes, saturating outside `[0, 1]`
    pub fn to_rgba8(self) -> (u8, u8, u8, u8) {
        (
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        )
    }
}

#[inline]
fn channel_to_u8(c: f32) -> u8 {
    // `as` saturates and maps NaN to 0
    (c * 255.0) as u8
}

/// Porter-Duff "over": `top` composited onto `bottom`.
///
/// A fully transparent `top` leaves `bottom` unchanged, and a result with zero
/// coverage is [`Rgba::NONE`] instead of a 0/0 division.
#[inline]
pub fn blend(top: Rgba, bottom: Rgba) -> Rgba {
    if top.a == 0.0 {
        return bottom;
    }

    let a = top.a + bottom.a * (1.0 - top.a);
    if a == 0.0 {
        return Rgba::NONE;
    }

    let under = bottom.a * (1.0 - top.a);
    Rgba {
        r: (top.r * top.a + bottom.r * under) / a,
        g: (top.g * top.a + bottom.g * under) / a,
        b: (top.b * top.a + bottom.b * under) / a,
        a,
    }
}
