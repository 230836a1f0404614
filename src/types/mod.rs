//! Data types for the grid renderer.

mod options;
mod theme;
mod view;

pub use options::*;
pub use theme::*;
pub use view::*;
