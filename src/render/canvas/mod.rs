//! Canvas 2D surface.
//!
//! Draws through the HTML Canvas 2D API via web-sys. The context is scaled
//! by the device pixel ratio once, so every surface call takes CSS pixels.

mod surface;

pub use surface::CanvasSurface;
