//! Per-pixel background generators sampled in world space

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Color of the background at a world-space point.
///
/// Called once per pixel at the start of every update, so implementations
/// should be cheap and must not depend on call order.
pub trait Background {
    fn color(&self, x: f32, y: f32) -> Rgba;
}

impl<F> Background for F
where
    F: Fn(f32, f32) -> Rgba,
{
    fn color(&self, x: f32, y: f32) -> Rgba {
        self(x, y)
    }
}

/// Same color everywhere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidBackground(pub Rgba);

impl Default for SolidBackground {
    fn default() -> Self {
        Self(Rgba::WHITE)
    }
}

impl Background for SolidBackground {
    fn color(&self, _x: f32, _y: f32) -> Rgba {
        self.0
    }
}

/// Axes through the origin, grid lines every `x_step` / `y_step` world units
/// and plain paper elsewhere.
///
/// `x_resolution` and `y_resolution` are the line half-widths: an axis where
/// `|x| < x_resolution`, a grid line where `x / x_step` is within
/// `x_resolution` of an integer (measured toward zero).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphingPaperBackground {
    pub x_resolution: f32,
    pub y_resolution: f32,
    #[serde(default = "default_step")]
    pub x_step: f32,
    #[serde(default = "default_step")]
    pub y_step: f32,
    #[serde(default = "default_axis_color")]
    pub axis_color: Rgba,
    #[serde(default = "default_grid_color")]
    pub grid_color: Rgba,
    #[serde(default = "default_paper_color")]
    pub paper_color: Rgba,
}

fn default_step() -> f32 {
    1.0
}

fn default_axis_color() -> Rgba {
    Rgba::BLACK
}

fn default_grid_color() -> Rgba {
    Rgba::GRAY
}

fn default_paper_color() -> Rgba {
    Rgba::WHITE
}

impl GraphingPaperBackground {
    /// Unit grid, black axes, gray grid lines on white
    pub fn new(x_resolution: f32, y_resolution: f32) -> Self {
        Self {
            x_resolution,
            y_resolution,
            x_step: default_step(),
            y_step: default_step(),
            axis_color: default_axis_color(),
            grid_color: default_grid_color(),
            paper_color: default_paper_color(),
        }
    }

    pub fn with_steps(mut self, x_step: f32, y_step: f32) -> Self {
        self.x_step = x_step;
        self.y_step = y_step;
        self
    }

    pub fn with_colors(mut self, axis: Rgba, grid: Rgba, paper: Rgba) -> Self {
        self.axis_color = axis;
        self.grid_color = grid;
        self.paper_color = paper;
        self
    }
}

impl Background for GraphingPaperBackground {
    fn color(&self, x: f32, y: f32) -> Rgba {
        if x.abs() < self.x_resolution || y.abs() < self.y_resolution {
            return self.axis_color;
        }

        let gx = x / self.x_step;
        let gy = y / self.y_step;
        if (gx - gx.trunc()).abs() < self.x_resolution || (gy - gy.trunc()).abs() < self.y_resolution {
            return self.grid_color;
        }

        self.paper_color
    }
}

/// Serializable description of a background, as stored in scene files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackgroundSpec {
    Solid { color: Rgba },
    GraphingPaper(GraphingPaperBackground),
}

impl BackgroundSpec {
    pub fn into_background(self) -> Rc<dyn Background> {
        match self {
            BackgroundSpec::Solid { color } => Rc::new(SolidBackground(color)),
            BackgroundSpec::GraphingPaper(paper) => Rc::new(paper),
        }
    }
}

impl From<SolidBackground> for BackgroundSpec {
    fn from(s: SolidBackground) -> Self {
        BackgroundSpec::Solid { color: s.0 }
    }
}

impl From<GraphingPaperBackground> for BackgroundSpec {
    fn from(g: GraphingPaperBackground) -> Self {
        BackgroundSpec::GraphingPaper(g)
    }
}
