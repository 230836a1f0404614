//! Rendering engine over a pluggable raster surface.
//!
//! This module provides:
//! - The backend-agnostic [`Surface`] trait and a headless recording surface
//! - Canvas 2D surface (wasm32 only)
//! - Cell-kind policies, the cell painter and the per-pass bounds registry
//! - The paint pass itself ([`GridRenderer`])

pub mod backend;
pub mod bounds;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod colors;
pub mod grid;
pub mod painter;
pub mod policy;
pub mod recording;
pub mod text;

pub use backend::{Path, PathOp, PathPaint, Surface, TextAlign, TextStyle};
pub use bounds::{
    Bounds, ExpandIconBounds, FilterAxis, FilterButtonBounds, HeaderFilterBounds,
    InteractiveBounds,
};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use colors::hover_tint;
pub use grid::{GridRenderer, RenderResult};
pub use policy::{CellPolicy, PivotPolicy, PolicyKind, TablixPolicy};
pub use recording::{DrawCommand, RecordingSurface};
pub use text::{fit_text, WidthCache};
