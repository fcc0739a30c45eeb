//! SDL2 window backend: primitives drawn with SDL2_gfx, events from the SDL
//! event pump

use std::collections::VecDeque;

use log::{info, warn};
use sdl2::event::{Event as SdlEvent, WindowEvent};
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::mouse::MouseButton as SdlMouseButton;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::{BlendMode, Canvas as SdlCanvas};
use sdl2::video::Window;
use sdl2::EventPump;

use super::PixelBuffer;
use crate::background::Background;
use crate::canvas::{Canvas, RenderBackend};
use crate::color::Rgba;
use crate::error::{CanvasError, Result};
use crate::events::{Event, EventSource, Key, MouseButton, WindowCanvas, WindowHandler};
use crate::geometry::{Vec2, Viewport};
use crate::primitives::{Circle, Line, Triangle};
use crate::raster;

/// Window canvas backed by SDL2
pub type AcceleratedCanvas = WindowCanvas<SdlSurface>;

/// An SDL2 window and renderer
pub struct SdlSurface {
    canvas: SdlCanvas<Window>,
    event_pump: EventPump,
    pending: VecDeque<Event>,
    width: u32,
    height: u32,
}

impl SdlSurface {
    /// Open a centered window with VSync
    pub fn open(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(CanvasError::Window)?;
        let video_subsystem = sdl_context.video().map_err(CanvasError::Window)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| CanvasError::Window(e.to_string()))?;

        let mut canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| CanvasError::Window(e.to_string()))?;
        canvas.set_blend_mode(BlendMode::Blend);

        let event_pump = sdl_context.event_pump().map_err(CanvasError::Window)?;
        info!("opened {}x{} window '{}'", width, height, title);

        Ok(Self {
            canvas,
            event_pump,
            pending: VecDeque::new(),
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Window pixels, y pointing down
    fn window_viewport(&self) -> Viewport {
        Viewport::new(0.0, self.height.saturating_sub(1) as f32, 0.0, self.width.saturating_sub(1) as f32)
    }

    fn to_window(&self, viewport: &Viewport, p: Vec2) -> (i16, i16) {
        let q = Viewport::convert(viewport, &self.window_viewport(), p);
        (clamp_i16(q.x), clamp_i16(q.y))
    }

    fn to_window_length(&self, viewport: &Viewport, len: f32) -> f32 {
        Viewport::convert_length(viewport, &self.window_viewport(), len).abs()
    }

    pub fn clear(&mut self, color: Rgba) {
        self.canvas.set_draw_color(to_sdl_color(color));
        self.canvas.clear();
    }

    pub fn present(&mut self) {
        self.canvas.present();
    }

    /// Pull everything SDL has queued into our own event queue
    fn pump(&mut self) {
        for event in self.event_pump.poll_iter() {
            match event {
                SdlEvent::Window {
                    win_event: WindowEvent::Resized(w, h),
                    ..
                } => {
                    self.width = w.max(0) as u32;
                    self.height = h.max(0) as u32;
                    self.pending.push_back(Event::WindowResize {
                        width: self.width,
                        height: self.height,
                    });
                },
                other => {
                    if let Some(e) = convert_event(other) {
                        self.pending.push_back(e);
                    }
                },
            }
        }
    }
}

impl RenderBackend for SdlSurface {
    fn draw_line(&mut self, viewport: &Viewport, line: &Line) {
        let (x1, y1) = self.to_window(viewport, line.start);
        let (x2, y2) = self.to_window(viewport, line.end);
        let color = to_sdl_color(line.color);

        let result = if line.is_hairline() {
            self.canvas.line(x1, y1, x2, y2, color)
        } else {
            let r = self.to_window_length(viewport, line.thickness);
            let width = (2.0 * r).clamp(1.0, 255.0) as u8;
            let radius = clamp_i16(r);
            self.canvas
                .thick_line(x1, y1, x2, y2, width, color)
                .and_then(|()| self.canvas.filled_circle(x1, y1, radius, color))
                .and_then(|()| self.canvas.filled_circle(x2, y2, radius, color))
        };
        if let Err(e) = result {
            warn!("line draw failed: {}", e);
        }
    }

    fn draw_circle(&mut self, viewport: &Viewport, circle: &Circle) {
        let (x, y) = self.to_window(viewport, circle.origin);
        let radius = clamp_i16(self.to_window_length(viewport, circle.radius));
        if let Err(e) = self.canvas.filled_circle(x, y, radius, to_sdl_color(circle.color)) {
            warn!("circle draw failed: {}", e);
        }
    }

    fn draw_triangle(&mut self, viewport: &Viewport, triangle: &Triangle) {
        let [a, b, c] = triangle.points.map(|p| self.to_window(viewport, p));
        let color = to_sdl_color(triangle.color);
        if let Err(e) = self.canvas.filled_trigon(a.0, a.1, b.0, b.1, c.0, c.1, color) {
            warn!("triangle draw failed: {}", e);
        }
    }

    /// Evaluated on the CPU into a streaming texture, then stretched over the
    /// window
    fn draw_background(&mut self, viewport: &Viewport, background: &dyn Background) {
        let mut buffer = PixelBuffer::with_size(self.width.max(1), self.height.max(1));
        raster::draw_background(&mut buffer, viewport, background);

        let texture_creator = self.canvas.texture_creator();
        let result = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, buffer.width(), buffer.height())
            .map_err(|e| e.to_string())
            .and_then(|mut texture| {
                texture
                    .update(None, &buffer.to_rgba8888_bytes(), (buffer.width() * 4) as usize)
                    .map_err(|e| e.to_string())?;
                self.canvas.copy(&texture, None, None)
            });
        if let Err(e) = result {
            warn!("background draw failed: {}", e);
        }
    }
}

impl EventSource for SdlSurface {
    fn next_event(&mut self) -> Option<Event> {
        if self.pending.is_empty() {
            self.pump();
        }
        self.pending.pop_front()
    }
}

impl WindowCanvas<SdlSurface> {
    /// Open a window and wrap it in a canvas using `viewport` as world space
    pub fn open(
        title: &str,
        width: u32,
        height: u32,
        viewport: Viewport,
        handler: Box<dyn WindowHandler<SdlSurface>>,
    ) -> Result<Self> {
        let surface = SdlSurface::open(title, width, height)?;
        Ok(WindowCanvas::new(Canvas::with_backend(surface, viewport)?, handler))
    }

    /// Clear, draw, dispatch and present frames until the handler stops the
    /// canvas
    pub fn run(&mut self) {
        while !self.has_quit() {
            self.backend_mut().clear(Rgba::BLACK);
            self.update();
            self.backend_mut().present();
        }
        info!("window closed");
    }
}

fn convert_event(event: SdlEvent) -> Option<Event> {
    match event {
        SdlEvent::Quit { .. }
        | SdlEvent::Window {
            win_event: WindowEvent::Close,
            ..
        } => Some(Event::WindowClose),
        SdlEvent::KeyDown {
            keycode: Some(k), ..
        } => Some(Event::KeyDown(Key(k.into_i32()))),
        SdlEvent::KeyUp {
            keycode: Some(k), ..
        } => Some(Event::KeyUp(Key(k.into_i32()))),
        SdlEvent::MouseMotion { x, y, .. } => Some(Event::MouseMove {
            x: clamp_u32(x),
            y: clamp_u32(y),
        }),
        SdlEvent::MouseButtonDown {
            x, y, mouse_btn, ..
        } => map_mouse_button(mouse_btn).map(|button| Event::MouseDown {
            button,
            x: clamp_u32(x),
            y: clamp_u32(y),
        }),
        SdlEvent::MouseButtonUp {
            x, y, mouse_btn, ..
        } => map_mouse_button(mouse_btn).map(|button| Event::MouseUp {
            button,
            x: clamp_u32(x),
            y: clamp_u32(y),
        }),
        SdlEvent::MouseWheel { y, .. } if y != 0 => Some(Event::MouseWheel {
            up: y > 0,
            distance: y.unsigned_abs(),
        }),
        _ => None,
    }
}

fn map_mouse_button(btn: SdlMouseButton) -> Option<MouseButton> {
    match btn {
        SdlMouseButton::Left => Some(MouseButton::Left),
        SdlMouseButton::Right => Some(MouseButton::Right),
        SdlMouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

#[inline]
fn clamp_i16(v: f32) -> i16 {
    // `as` saturates; NaN becomes 0
    v as i16
}

#[inline]
fn clamp_u32(v: i32) -> u32 {
    v.max(0) as u32
}

fn to_sdl_color(c: Rgba) -> Color {
    let (r, g, b, a) = c.to_rgba8();
    Color::RGBA(r, g, b, a)
}
