//! Layout engine for computing cell positions and viewport culling.
//!
//! This module handles:
//! - Resolving row heights and column widths with a default fallback
//! - Frozen-pane positioning and screen-to-index lookup
//! - Span resolution (anchor cells and the cells they cover)
//! - Culling the four frozen-pane regions to the visible index ranges

mod dimensions;
mod freeze;
mod spans;
mod viewport;

pub use dimensions::Dimensions;
pub use freeze::{Axis, AxisLayout, GridLayout};
pub use spans::{cell_rect, extent_of, is_covered_cell, CellRect, SpanIndex};
pub use viewport::{
    cull, cull_axis, AxisRange, AxisRanges, ClipRect, RangeHints, Region, RegionKind, Viewport,
    VisibleRegions,
};
