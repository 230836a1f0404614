//! pivotgrid - pivot and tablix grid geometry for the web
//!
//! Paints a backend-computed view into a Canvas 2D surface via WebAssembly:
//! - Per-row and per-column sizes with sparse overrides
//! - Frozen header rows and label columns over a scrolling body
//! - Row and column spans painted once from their anchor
//! - Filter buttons, expand/collapse glyphs and header filter funnels
//! - Pointer hit testing against the last painted frame
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridView } from 'pivotgrid';
//! await init();
//! const grid = new GridView(canvas, devicePixelRatio, "pivot");
//! grid.set_view(view);
//! grid.set_options({ colWidths: [120, 80], frozenRowCount: 1 });
//! grid.render();
//! const target = grid.hit_test(event.offsetX, event.offsetY);
//! ```

pub mod error;
pub mod hit_test;
pub mod layout;
pub mod render;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use hit_test::HitTarget;
pub use render::{
    GridRenderer, InteractiveBounds, PolicyKind, RecordingSurface, RenderResult, Surface,
};
pub use types::*;
pub use viewer::GridSession;
#[cfg(target_arch = "wasm32")]
pub use viewer::GridView;

/// Get the version of the library
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
