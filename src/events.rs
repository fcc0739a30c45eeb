//! Input events and the windowed canvas that dispatches them to a handler

use std::ops::{Deref, DerefMut};

use log::trace;

use crate::canvas::{Canvas, RenderBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Backend-specific key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(pub i32);

/// Everything a window can report. Mouse positions are window pixels with
/// the origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    MouseDown { button: MouseButton, x: u32, y: u32 },
    MouseUp { button: MouseButton, x: u32, y: u32 },
    /// `up` is true when scrolling away from the user
    MouseWheel { up: bool, distance: u32 },
    MouseMove { x: u32, y: u32 },
    KeyDown(Key),
    KeyUp(Key),
    WindowResize { width: u32, height: u32 },
    WindowClose,
}

/// Queue of pending events owned by a windowed backend
pub trait EventSource {
    /// Next pending event, `None` once the queue is empty
    fn next_event(&mut self) -> Option<Event>;
}

/// Application callbacks for a [`WindowCanvas`]
pub trait WindowHandler<B> {
    /// Called for every event drained during an update. The default stops
    /// the canvas when the window is closed.
    fn process_event(&mut self, canvas: &mut WindowCanvas<B>, event: &Event) {
        if *event == Event::WindowClose {
            canvas.stop();
        }
    }

    /// Called once per update, after all events have been processed
    fn on_update(&mut self, _canvas: &mut WindowCanvas<B>) {}
}

/// Handler that only reacts to the window being closed
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHandler;

impl<B> WindowHandler<B> for DefaultHandler {}

/// A [`Canvas`] on a backend that also produces events.
///
/// Derefs to the inner canvas for drawing calls; [`WindowCanvas::update`]
/// additionally drains events into the handler.
pub struct WindowCanvas<B> {
    canvas: Canvas<B>,
    // Taken out while the handler runs so it can borrow the canvas mutably
    handler: Option<Box<dyn WindowHandler<B>>>,
    quit: bool,
}

impl<B> WindowCanvas<B> {
    /// Ask the run loop to exit after the current frame
    pub fn stop(&mut self) {
        self.quit = true;
    }

    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Swap in a new handler. Takes effect on the next update when called
    /// from inside a handler callback.
    pub fn set_handler(&mut self, handler: Box<dyn WindowHandler<B>>) {
        self.handler = Some(handler);
    }
}

impl<B: RenderBackend + EventSource> WindowCanvas<B> {
    pub fn new(canvas: Canvas<B>, handler: Box<dyn WindowHandler<B>>) -> Self {
        Self {
            canvas,
            handler: Some(handler),
            quit: false,
        }
    }

    pub fn with_default_handler(canvas: Canvas<B>) -> Self {
        Self::new(canvas, Box::new(DefaultHandler))
    }

    /// Draw the frame, dispatch every pending event, then run the handler's
    /// per-frame hook
    pub fn update(&mut self) {
        self.canvas.update();

        let mut handler = self.handler.take();
        while let Some(event) = self.canvas.backend_mut().next_event() {
            trace!("event {:?}", event);
            if let Some(h) = handler.as_mut() {
                h.process_event(self, &event);
            }
        }
        if let Some(h) = handler.as_mut() {
            h.on_update(self);
        }

        // A handler installed during dispatch wins over the one that ran
        if self.handler.is_none() {
            self.handler = handler;
        }
    }

    pub fn into_inner(self) -> Canvas<B> {
        self.canvas
    }
}

impl<B> Deref for WindowCanvas<B> {
    type Target = Canvas<B>;

    fn deref(&self) -> &Canvas<B> {
        &self.canvas
    }
}

impl<B> DerefMut for WindowCanvas<B> {
    fn deref_mut(&mut self) -> &mut Canvas<B> {
        &mut self.canvas
    }
}
