//! Canvas front end: primitive queue, viewport and background over a
//! pluggable rendering backend

use std::path::Path;
use std::rc::Rc;

use log::{debug, warn};

use crate::background::{Background, BackgroundSpec};
use crate::color::Rgba;
use crate::display::{write_bmp, PixelBuffer};
use crate::error::{CanvasError, Result};
use crate::geometry::{Vec2, Viewport};
use crate::primitives::{Circle, Line, Primitive, PrimitiveQueue, Triangle};
use crate::raster::{self, FrameBuffer};
use crate::scene::Scene;

// ============================================================================
// Backend trait
// ============================================================================

/// Something that can rasterize primitives given the current world viewport
pub trait RenderBackend {
    fn draw_line(&mut self, viewport: &Viewport, line: &Line);
    fn draw_circle(&mut self, viewport: &Viewport, circle: &Circle);
    fn draw_triangle(&mut self, viewport: &Viewport, triangle: &Triangle);

    /// Paint the whole surface from `background`, sampled in world space
    fn draw_background(&mut self, viewport: &Viewport, background: &dyn Background);

    /// Dispatch on the primitive kind. Primitives colored [`Rgba::NONE`]
    /// never reach the backend.
    fn draw_primitive(&mut self, viewport: &Viewport, primitive: &Primitive) {
        if !primitive.is_visible() {
            return;
        }
        match primitive {
            Primitive::Line(l) => self.draw_line(viewport, l),
            Primitive::Circle(c) => self.draw_circle(viewport, c),
            Primitive::Triangle(t) => self.draw_triangle(viewport, t),
        }
    }
}

impl RenderBackend for PixelBuffer {
    fn draw_line(&mut self, viewport: &Viewport, line: &Line) {
        raster::draw_line(self, viewport, line);
    }

    fn draw_circle(&mut self, viewport: &Viewport, circle: &Circle) {
        raster::draw_circle(self, viewport, circle);
    }

    fn draw_triangle(&mut self, viewport: &Viewport, triangle: &Triangle) {
        raster::draw_triangle(self, viewport, triangle);
    }

    fn draw_background(&mut self, viewport: &Viewport, background: &dyn Background) {
        raster::draw_background(self, viewport, background);
    }
}

// ============================================================================
// Canvas
// ============================================================================

/// Queue of primitives drawn in world coordinates onto a backend.
///
/// Primitives stay queued across updates: every [`Canvas::update`] paints the
/// background (when one is set) and then the whole queue in insertion order.
pub struct Canvas<B> {
    backend: B,
    primitives: PrimitiveQueue,
    background: Option<Rc<dyn Background>>,
    background_spec: Option<BackgroundSpec>,
    viewport: Viewport,
}

/// Canvas rendering into an in-memory [`PixelBuffer`]
pub type SoftwareCanvas = Canvas<PixelBuffer>;

impl<B: RenderBackend> Canvas<B> {
    pub fn with_backend(backend: B, viewport: Viewport) -> Result<Self> {
        Ok(Self {
            backend,
            primitives: PrimitiveQueue::new(),
            background: None,
            background_spec: None,
            viewport: viewport.validated()?,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Replace the world viewport. Affects subsequent drawing only.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        match viewport.validated() {
            Ok(v) => {
                self.viewport = v;
                Ok(())
            },
            Err(e) => {
                warn!("keeping previous viewport: {}", e);
                Err(e)
            },
        }
    }

    /// Use an arbitrary background. It cannot be written to a scene file.
    pub fn set_background(&mut self, background: Rc<dyn Background>) {
        self.background = Some(background);
        self.background_spec = None;
    }

    /// Use one of the built-in backgrounds
    pub fn set_background_spec(&mut self, spec: impl Into<BackgroundSpec>) {
        let spec = spec.into();
        self.background = Some(spec.into_background());
        self.background_spec = Some(spec);
    }

    pub fn clear_background(&mut self) {
        self.background = None;
        self.background_spec = None;
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn add_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgba, thickness: f32) {
        self.primitives
            .push(Line::new(Vec2::new(x1, y1), Vec2::new(x2, y2), color, thickness));
    }

    pub fn add_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.primitives.push(Circle::new(Vec2::new(x, y), radius, color));
    }

    pub fn add_triangle(&mut self, p1: Vec2, p2: Vec2, p3: Vec2, color: Rgba) {
        self.primitives.push(Triangle::new(p1, p2, p3, color));
    }

    /// Polyline through `points`; fewer than two points adds nothing
    pub fn add_connected_points(&mut self, points: &[(f32, f32)], color: Rgba, thickness: f32) {
        let points: Vec<Vec2> = points.iter().copied().map(Vec2::from).collect();
        self.primitives.push_connected(&points, color, thickness);
    }

    pub fn add_primitive(&mut self, primitive: impl Into<Primitive>) {
        self.primitives.push(primitive);
    }

    pub fn clear_primitives(&mut self) {
        self.primitives.clear();
    }

    pub fn primitives(&self) -> &PrimitiveQueue {
        &self.primitives
    }

    /// Paint the background, if any, then every queued primitive
    pub fn update(&mut self) {
        if let Some(background) = &self.background {
            self.backend.draw_background(&self.viewport, background.as_ref());
        }
        for primitive in &self.primitives {
            self.backend.draw_primitive(&self.viewport, primitive);
        }
        debug!("drew {} primitives", self.primitives.len());
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Replace viewport, background and queue with the scene's
    pub fn load_scene(&mut self, scene: &Scene) -> Result<()> {
        self.set_viewport(scene.viewport)?;
        match scene.background {
            Some(spec) => self.set_background_spec(spec),
            None => self.clear_background(),
        }
        self.primitives = scene.primitives.clone();
        debug!("loaded scene '{}'", scene.name);
        Ok(())
    }

    /// Snapshot of the current state. A custom background set through
    /// [`Canvas::set_background`] is left out.
    pub fn to_scene(&self, name: impl Into<String>) -> Scene {
        if self.background.is_some() && self.background_spec.is_none() {
            warn!("custom background is not serializable, scene will have none");
        }
        Scene {
            name: name.into(),
            viewport: self.viewport,
            background: self.background_spec,
            primitives: self.primitives.clone(),
        }
    }
}

// ============================================================================
// Software canvas
// ============================================================================

impl Canvas<PixelBuffer> {
    /// Transparent `width x height` canvas. Both sides must be at least two
    /// pixels so the pixel viewport is not degenerate.
    pub fn new(width: u32, height: u32, viewport: Viewport) -> Result<Self> {
        if width < 2 || height < 2 {
            return Err(CanvasError::InvalidSize { width, height });
        }
        Self::with_backend(PixelBuffer::with_size(width, height), viewport)
    }

    pub fn width(&self) -> u32 {
        self.backend.width()
    }

    pub fn height(&self) -> u32 {
        self.backend.height()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.backend
    }

    pub fn pixel_viewport(&self) -> Viewport {
        self.backend.pixel_viewport()
    }

    /// Panics if (x, y) is outside the canvas
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba {
        self.backend.get_pixel(x, y)
    }

    /// Panics if (x, y) is outside the canvas
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        self.backend.set_pixel(x, y, color);
    }

    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        self.backend.blend_pixel(x, y, color);
    }

    pub fn try_get_pixel(&self, x: i64, y: i64) -> Result<Rgba> {
        self.backend.try_get_pixel(x, y)
    }

    pub fn try_set_pixel(&mut self, x: i64, y: i64, color: Rgba) -> Result<()> {
        self.backend.try_set_pixel(x, y, color)
    }

    /// Color under a world-space point, `None` outside the canvas
    pub fn sample(&self, x: f32, y: f32) -> Option<Rgba> {
        raster::sample(&self.backend, &self.viewport, Vec2::new(x, y))
    }

    /// Flood fill seeded at a world-space point
    pub fn flood_fill(&mut self, x: f32, y: f32, color: Rgba) -> Result<()> {
        let p = Viewport::convert(&self.viewport, &self.backend.pixel_viewport(), Vec2::new(x, y));
        if !(p.x >= 0.0 && p.y >= 0.0 && p.x.is_finite() && p.y.is_finite()) {
            return Err(CanvasError::OutOfBounds {
                x: p.x as i64,
                y: p.y as i64,
                width: self.width(),
                height: self.height(),
            });
        }
        let px = u32::try_from(p.x as i64).unwrap_or(u32::MAX);
        let py = u32::try_from(p.y as i64).unwrap_or(u32::MAX);
        self.flood_fill_pixel(px, py, color)
    }

    /// Flood fill seeded at a pixel
    pub fn flood_fill_pixel(&mut self, x: u32, y: u32, color: Rgba) -> Result<()> {
        raster::flood_fill(&mut self.backend, x, y, color)
    }

    /// Blend `other` into the world-space rectangle `location`
    pub fn blit_canvas(&mut self, other: &SoftwareCanvas, location: Viewport) {
        raster::blit(&mut self.backend, &self.viewport, &other.backend, &location);
    }

    /// Write the pixels as a 24-bit BMP
    pub fn save_bmp(&self, path: impl AsRef<Path>) -> Result<()> {
        write_bmp(&self.backend, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::{GraphingPaperBackground, SolidBackground};

    fn count(canvas: &SoftwareCanvas, color: Rgba) -> usize {
        canvas.buffer().pixels().iter().filter(|c| **c == color).count()
    }

    #[test]
    fn test_rejects_bad_construction() {
        assert!(matches!(
            SoftwareCanvas::new(1, 10, Viewport::new(1.0, 0.0, 0.0, 1.0)),
            Err(CanvasError::InvalidSize { width: 1, height: 10 })
        ));
        assert!(matches!(
            SoftwareCanvas::new(10, 10, Viewport::new(0.0, 0.0, 0.0, 1.0)),
            Err(CanvasError::DegenerateViewport { .. })
        ));
    }

    #[test]
    fn test_set_viewport_rejects_degenerate() {
        let mut canvas = SoftwareCanvas::new(4, 4, Viewport::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        assert!(canvas.set_viewport(Viewport::new(1.0, 0.0, 3.0, 1.0)).is_err());
        assert_eq!(*canvas.viewport(), Viewport::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_diagonal_hairline_scenario() {
        let mut canvas = SoftwareCanvas::new(10, 10, Viewport::new(9.0, 0.0, 0.0, 9.0)).unwrap();
        canvas.add_line(0.0, 0.0, 9.0, 9.0, Rgba::RED, 0.0);
        canvas.update();

        assert_eq!(count(&canvas, Rgba::RED), 10);
        for i in 0..10 {
            assert_eq!(canvas.get_pixel(i, i), Rgba::RED);
        }
    }

    #[test]
    fn test_diagonal_hairline_in_ten_unit_viewport() {
        let mut canvas = SoftwareCanvas::new(10, 10, Viewport::new(10.0, 0.0, 0.0, 10.0)).unwrap();
        canvas.add_line(0.0, 0.0, 9.0, 9.0, Rgba::RED, 0.0);
        canvas.update();

        assert_eq!(count(&canvas, Rgba::RED), 9);
        for i in 0..9 {
            assert_eq!(canvas.get_pixel(i, i), Rgba::RED);
        }
        assert_eq!(canvas.get_pixel(9, 9), Rgba::NONE);
    }

    #[test]
    fn test_no_background_leaves_pixels() {
        let mut canvas = SoftwareCanvas::new(4, 4, Viewport::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        canvas.set_pixel(1, 1, Rgba::GREEN);
        canvas.update();
        assert_eq!(canvas.get_pixel(1, 1), Rgba::GREEN);

        canvas.set_background_spec(SolidBackground(Rgba::WHITE));
        canvas.update();
        assert_eq!(count(&canvas, Rgba::WHITE), 16);
    }

    #[test]
    fn test_opaque_overlap_replaces() {
        let mut canvas = SoftwareCanvas::new(20, 20, Viewport::pixel(20, 20)).unwrap();
        canvas.add_triangle(
            Vec2::new(0.0, 0.0),
            Vec2::new(15.0, 0.0),
            Vec2::new(0.0, 15.0),
            Rgba::RED.with_alpha(0.5),
        );
        canvas.add_triangle(
            Vec2::new(2.0, 2.0),
            Vec2::new(12.0, 2.0),
            Vec2::new(2.0, 12.0),
            Rgba::BLUE,
        );
        canvas.update();

        assert_eq!(canvas.get_pixel(4, 4), Rgba::BLUE);
        assert_eq!(canvas.get_pixel(2, 12), Rgba::BLUE);
        assert_eq!(canvas.get_pixel(1, 1), Rgba::RED.with_alpha(0.5));
    }

    #[test]
    fn test_queue_persists_across_updates() {
        let mut canvas = SoftwareCanvas::new(8, 8, Viewport::pixel(8, 8)).unwrap();
        canvas.set_background_spec(SolidBackground(Rgba::WHITE));
        canvas.add_circle(4.0, 4.0, 2.0, Rgba::BLACK.with_alpha(0.5));
        canvas.update();
        let first = canvas.buffer().clone();
        canvas.update();
        // The background repaint makes updates idempotent
        assert_eq!(canvas.buffer(), &first);
        assert_eq!(canvas.primitives().len(), 1);

        canvas.clear_primitives();
        canvas.update();
        assert_eq!(count(&canvas, Rgba::WHITE), 64);
    }

    #[test]
    fn test_invisible_primitives_skipped() {
        let mut canvas = SoftwareCanvas::new(8, 8, Viewport::pixel(8, 8)).unwrap();
        canvas.add_circle(4.0, 4.0, 3.0, Rgba::NONE);
        canvas.add_line(0.0, 0.0, 7.0, 7.0, Rgba::NONE, 2.0);
        canvas.update();
        assert_eq!(count(&canvas, Rgba::NONE), 64);
    }

    #[test]
    fn test_connected_points() {
        let mut canvas = SoftwareCanvas::new(10, 10, Viewport::pixel(10, 10)).unwrap();
        canvas.add_connected_points(&[(0.0, 0.0)], Rgba::RED, 0.0);
        assert!(canvas.primitives().is_empty());

        canvas.add_connected_points(&[(0.0, 0.0), (9.0, 0.0), (9.0, 9.0)], Rgba::RED, 0.0);
        assert_eq!(canvas.primitives().len(), 2);
        canvas.update();
        assert_eq!(canvas.get_pixel(5, 0), Rgba::RED);
        assert_eq!(canvas.get_pixel(9, 5), Rgba::RED);
        assert_eq!(canvas.get_pixel(5, 5), Rgba::NONE);
    }

    #[test]
    fn test_viewport_change_affects_later_drawing_only() {
        let mut canvas = SoftwareCanvas::new(10, 10, Viewport::pixel(10, 10)).unwrap();
        canvas.add_line(0.0, 0.0, 9.0, 0.0, Rgba::RED, 0.0);
        canvas.update();
        assert_eq!(canvas.get_pixel(9, 0), Rgba::RED);

        // Zooming in doubles the mapped length; the old pixels stay
        canvas.set_viewport(Viewport::new(4.5, 0.0, 0.0, 4.5)).unwrap();
        canvas.clear_primitives();
        canvas.add_line(0.0, 2.25, 4.5, 2.25, Rgba::BLUE, 0.0);
        canvas.update();
        assert_eq!(canvas.get_pixel(9, 0), Rgba::RED);
        assert_eq!(canvas.get_pixel(9, 4), Rgba::BLUE);
    }

    #[test]
    fn test_world_flood_fill() {
        let mut canvas = SoftwareCanvas::new(5, 5, Viewport::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        canvas.set_background_spec(SolidBackground(Rgba::WHITE));
        canvas.update();
        canvas.flood_fill(0.5, 0.5, Rgba::RED).unwrap();
        assert_eq!(count(&canvas, Rgba::RED), 25);

        assert!(matches!(
            canvas.flood_fill(-1.0, 0.5, Rgba::RED),
            Err(CanvasError::OutOfBounds { .. })
        ));
        assert!(matches!(
            canvas.flood_fill(3.0, 0.5, Rgba::RED),
            Err(CanvasError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_sample_and_checked_access() {
        let mut canvas = SoftwareCanvas::new(4, 4, Viewport::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        canvas.try_set_pixel(3, 3, Rgba::PURPLE).unwrap();
        assert_eq!(canvas.sample(1.0, 1.0), Some(Rgba::PURPLE));
        assert_eq!(canvas.sample(1.5, 1.0), None);
        assert!(canvas.try_get_pixel(4, 0).is_err());
    }

    #[test]
    fn test_blit_canvas() {
        let mut src = SoftwareCanvas::new(4, 4, Viewport::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        src.set_background_spec(SolidBackground(Rgba::YELLOW));
        src.update();

        let mut dst = SoftwareCanvas::new(10, 10, Viewport::new(9.0, 0.0, 0.0, 9.0)).unwrap();
        dst.blit_canvas(&src, Viewport::new(9.0, 5.0, 5.0, 9.0));
        assert_eq!(count(&dst, Rgba::YELLOW), 25);
        assert_eq!(dst.get_pixel(5, 5), Rgba::YELLOW);
        assert_eq!(dst.get_pixel(4, 5), Rgba::NONE);
    }

    #[test]
    fn test_scene_round_trip_through_canvas() {
        let mut canvas = SoftwareCanvas::new(8, 8, Viewport::new(2.0, -2.0, -2.0, 2.0)).unwrap();
        canvas.set_background_spec(GraphingPaperBackground::new(0.1, 0.1));
        canvas.add_circle(0.0, 0.0, 1.0, Rgba::BLUE);
        let scene = canvas.to_scene("snapshot");

        let mut other = SoftwareCanvas::new(8, 8, Viewport::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        other.load_scene(&scene).unwrap();
        assert_eq!(other.viewport(), canvas.viewport());
        assert_eq!(other.primitives(), canvas.primitives());

        canvas.update();
        other.update();
        assert_eq!(canvas.buffer(), other.buffer());
    }

    #[test]
    fn test_custom_background_not_in_scene() {
        let mut canvas = SoftwareCanvas::new(4, 4, Viewport::new(1.0, 0.0, 0.0, 1.0)).unwrap();
        canvas.set_background(Rc::new(|_x: f32, _y: f32| Rgba::GRAY));
        assert!(canvas.has_background());
        assert!(canvas.to_scene("custom").background.is_none());
        canvas.update();
        assert_eq!(canvas.get_pixel(0, 0), Rgba::GRAY);
    }
}
