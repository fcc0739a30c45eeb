//! Software rasterizer for lines, circles and triangles drawn in a
//! user-defined world coordinate system.
//!
//! Drawing calls queue primitives on a [`Canvas`]; [`Canvas::update`] paints
//! the optional background and then every queued primitive, mapping world
//! coordinates to pixels through a [`Viewport`]. The software backend is a
//! [`PixelBuffer`] that can be saved as a BMP. With the `window` feature an
//! SDL2 window can be used as the backend instead.

pub mod background;
pub mod canvas;
pub mod color;
pub mod display;
pub mod error;
pub mod events;
pub mod geometry;
pub mod primitives;
pub mod raster;
pub mod scene;

pub use background::{Background, BackgroundSpec, GraphingPaperBackground, SolidBackground};
pub use canvas::{Canvas, RenderBackend, SoftwareCanvas};
pub use color::{blend, Rgba};
#[cfg(feature = "window")]
pub use display::{AcceleratedCanvas, SdlSurface};
pub use display::PixelBuffer;
pub use error::{CanvasError, Result};
pub use events::{DefaultHandler, Event, EventSource, Key, MouseButton, WindowCanvas, WindowHandler};
pub use geometry::{Vec2, Viewport};
pub use primitives::{Circle, Line, Primitive, PrimitiveQueue, Triangle};
pub use raster::FrameBuffer;
pub use scene::Scene;
