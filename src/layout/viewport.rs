//! Viewport culling: the index ranges intersecting each of the four
//! frozen-pane regions.

use super::{AxisLayout, GridLayout};

/// Visible area of the grid surface, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Clamp scroll offsets to `[0, max]` for grids of the given extent.
    ///
    /// Scrolling stops once the last scrolling index is fully visible.
    pub fn clamp_scroll(
        &self,
        layout: &GridLayout,
        row_count: u32,
        col_count: u32,
        scroll_x: f32,
        scroll_y: f32,
    ) -> (f32, f32) {
        (
            clamp_axis_scroll(&layout.cols, col_count, self.width, scroll_x),
            clamp_axis_scroll(&layout.rows, row_count, self.height, scroll_y),
        )
    }
}

fn clamp_axis_scroll(axis: &AxisLayout, count: u32, viewport_len: f32, scroll: f32) -> f32 {
    let frozen = axis.frozen_count().min(count);
    let scrollable = axis.sum(frozen, count);
    let available = (viewport_len - axis.frozen_extent()).max(0.0);
    let max = (scrollable - available).max(0.0);
    if scroll.is_finite() {
        scroll.clamp(0.0, max)
    } else {
        0.0
    }
}

/// Inclusive index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub start: u32,
    pub end: u32,
}

impl AxisRange {
    pub fn contains(&self, index: u32) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    /// Intersect with advisory hints; `None` when nothing remains.
    pub fn narrow(self, start: Option<u32>, end: Option<u32>) -> Option<Self> {
        let start = start.map_or(self.start, |s| s.max(self.start));
        let end = end.map_or(self.end, |e| e.min(self.end));
        (start <= end).then_some(Self { start, end })
    }
}

/// Frozen and scrolling ranges of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisRanges {
    /// Always every frozen index present in the data
    pub frozen: Option<AxisRange>,
    pub scrolling: Option<AxisRange>,
}

impl AxisRanges {
    /// Union of both ranges.
    pub fn span(&self) -> Option<AxisRange> {
        match (self.frozen, self.scrolling) {
            (Some(f), Some(s)) => Some(AxisRange {
                start: f.start,
                end: s.end.max(f.end),
            }),
            (Some(r), None) | (None, Some(r)) => Some(r),
            (None, None) => None,
        }
    }
}

/// Cull one axis against `viewport_len` pixels.
///
/// The scrolling range starts at the first index whose trailing edge is at or
/// past the scroll offset and walks forward until the accumulated size covers
/// the space left after the frozen extent. Both ends are inclusive.
pub fn cull_axis(axis: &AxisLayout, viewport_len: f32, count: u32) -> AxisRanges {
    if count == 0 {
        return AxisRanges::default();
    }
    let frozen_count = axis.frozen_count().min(count);
    let frozen = (frozen_count > 0).then(|| AxisRange {
        start: 0,
        end: frozen_count - 1,
    });

    let available = viewport_len - axis.frozen_extent();
    if frozen_count >= count || available <= 0.0 {
        return AxisRanges {
            frozen,
            scrolling: None,
        };
    }

    let base = axis.offset_of(axis.frozen_count());
    let first = axis.frozen_count();
    let start = axis.index_ending_at_or_after(base + axis.scroll(), first);
    if start >= count {
        return AxisRanges {
            frozen,
            scrolling: None,
        };
    }
    let end = axis
        .index_ending_at_or_after(base + axis.scroll() + available, start)
        .min(count - 1);
    AxisRanges {
        frozen,
        scrolling: Some(AxisRange { start, end }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Frozen rows × frozen cols; never scrolls
    Corner,
    /// Frozen rows × scrolling cols
    FrozenRows,
    /// Scrolling rows × frozen cols
    FrozenCols,
    /// Scrolling rows × scrolling cols
    Body,
}

/// Screen-space clip rectangle of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ClipRect {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// One culled region: its index ranges and the pixels it may paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub kind: RegionKind,
    pub rows: AxisRange,
    pub cols: AxisRange,
    pub clip: ClipRect,
}

/// Culling result for a paint pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisibleRegions {
    pub rows: AxisRanges,
    pub cols: AxisRanges,
    /// Bottom-most first: body, frozen-col band, frozen-row band, corner
    pub regions: Vec<Region>,
}

impl VisibleRegions {
    /// Overall `(start_row, end_row, start_col, end_col)`, inclusive.
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let rows = self.rows.span()?;
        let cols = self.cols.span()?;
        Some((rows.start, rows.end, cols.start, cols.end))
    }

    pub fn region(&self, kind: RegionKind) -> Option<&Region> {
        self.regions.iter().find(|r| r.kind == kind)
    }
}

/// Cull all four regions. Advisory hints only narrow the scrolling ranges.
pub fn cull(
    layout: &GridLayout,
    viewport: Viewport,
    row_count: u32,
    col_count: u32,
    hints: RangeHints,
) -> VisibleRegions {
    let mut rows = cull_axis(&layout.rows, viewport.height, row_count);
    let mut cols = cull_axis(&layout.cols, viewport.width, col_count);
    rows.scrolling = rows
        .scrolling
        .and_then(|r| r.narrow(hints.start_row, hints.end_row));
    cols.scrolling = cols
        .scrolling
        .and_then(|c| c.narrow(hints.start_col, hints.end_col));

    let fw = layout.frozen_width().min(viewport.width);
    let fh = layout.frozen_height().min(viewport.height);
    let clip = |x: f32, y: f32, right: f32, bottom: f32| ClipRect {
        x,
        y,
        width: (right - x).max(0.0),
        height: (bottom - y).max(0.0),
    };

    let (vw, vh) = (viewport.width, viewport.height);
    let body = clip(fw, fh, vw, vh);
    let left = clip(0.0, fh, fw, vh);
    let top = clip(fw, 0.0, vw, fh);
    let corner = clip(0.0, 0.0, fw, fh);

    let mut regions = Vec::with_capacity(4);
    let candidates = [
        (RegionKind::Body, rows.scrolling, cols.scrolling, body),
        (RegionKind::FrozenCols, rows.scrolling, cols.frozen, left),
        (RegionKind::FrozenRows, rows.frozen, cols.scrolling, top),
        (RegionKind::Corner, rows.frozen, cols.frozen, corner),
    ];
    for (kind, r, c, clip) in candidates {
        if let (Some(rows), Some(cols)) = (r, c) {
            // The corner is never culled, even when the frozen area overflows
            if clip.is_empty() && kind != RegionKind::Corner {
                continue;
            }
            regions.push(Region {
                kind,
                rows,
                cols,
                clip,
            });
        }
    }

    VisibleRegions {
        rows,
        cols,
        regions,
    }
}

/// Advisory visible-range hints from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeHints {
    pub start_row: Option<u32>,
    pub end_row: Option<u32>,
    pub start_col: Option<u32>,
    pub end_col: Option<u32>,
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::layout::Dimensions;

    fn axis(default: f32, frozen: u32, scroll: f32) -> AxisLayout {
        AxisLayout::new(Dimensions::dense(Vec::new(), default), frozen, scroll)
    }

    #[test]
    fn no_scroll_no_freeze() {
        let ranges = cull_axis(&axis(20.0, 0, 0.0), 100.0, 1000);
        assert_eq!(ranges.frozen, None);
        assert_eq!(ranges.scrolling, Some(AxisRange { start: 0, end: 4 }));
    }

    #[test]
    fn scroll_mid_cell_includes_partial_cells() {
        let ranges = cull_axis(&axis(20.0, 0, 30.0), 100.0, 1000);
        // Pixels [30, 130) touch rows 1..=6
        assert_eq!(ranges.scrolling, Some(AxisRange { start: 1, end: 6 }));
    }

    #[test]
    fn frozen_range_is_never_culled() {
        let ranges = cull_axis(&axis(20.0, 2, 500.0), 100.0, 1000);
        assert_eq!(ranges.frozen, Some(AxisRange { start: 0, end: 1 }));
        let s = ranges.scrolling.unwrap();
        // Row 26 ends exactly at the scroll offset and is kept as slack
        assert_eq!(s.start, 26);
        assert_eq!(s.end, 29);
    }

    #[test]
    fn clips_to_count() {
        let ranges = cull_axis(&axis(20.0, 1, 0.0), 1000.0, 3);
        assert_eq!(ranges.frozen, Some(AxisRange { start: 0, end: 0 }));
        assert_eq!(ranges.scrolling, Some(AxisRange { start: 1, end: 2 }));
        assert_eq!(cull_axis(&axis(20.0, 5, 0.0), 1000.0, 3).scrolling, None);
        assert_eq!(
            cull_axis(&axis(20.0, 0, 0.0), 1000.0, 0),
            AxisRanges::default()
        );
    }

    #[test]
    fn frozen_area_filling_viewport_leaves_no_scrolling_range() {
        let ranges = cull_axis(&axis(50.0, 3, 0.0), 100.0, 10);
        assert_eq!(ranges.frozen, Some(AxisRange { start: 0, end: 2 }));
        assert_eq!(ranges.scrolling, None);
    }

    #[test]
    fn four_regions_with_clips() {
        let layout = GridLayout::new(axis(20.0, 1, 0.0), axis(100.0, 1, 0.0));
        let vis = cull(
            &layout,
            Viewport::new(300.0, 100.0),
            50,
            50,
            RangeHints::default(),
        );
        let kinds: Vec<RegionKind> = vis.regions.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RegionKind::Body,
                RegionKind::FrozenCols,
                RegionKind::FrozenRows,
                RegionKind::Corner,
            ]
        );
        let body = vis.region(RegionKind::Body).unwrap();
        assert_eq!((body.clip.x, body.clip.y), (100.0, 20.0));
        assert_eq!((body.clip.width, body.clip.height), (200.0, 80.0));
        assert_eq!(body.rows, AxisRange { start: 1, end: 4 });
        assert_eq!(body.cols, AxisRange { start: 1, end: 2 });
        assert_eq!(vis.bounds(), Some((0, 4, 0, 2)));
    }

    #[test]
    fn hints_only_narrow() {
        let layout = GridLayout::new(axis(20.0, 0, 0.0), axis(100.0, 0, 0.0));
        let hints = RangeHints {
            start_row: Some(2),
            end_row: Some(400),
            ..RangeHints::default()
        };
        let vis = cull(&layout, Viewport::new(300.0, 100.0), 50, 50, hints);
        assert_eq!(vis.rows.scrolling, Some(AxisRange { start: 2, end: 4 }));
    }

    #[test]
    fn clamp_scroll_stops_at_last_index() {
        let layout = GridLayout::new(axis(20.0, 1, 0.0), axis(100.0, 0, 0.0));
        let viewport = Viewport::new(300.0, 100.0);
        // 9 scrolling rows = 180px, 80px available
        let clamp = |left, top| viewport.clamp_scroll(&layout, 10, 2, left, top);
        assert_eq!(clamp(50.0, 500.0), (0.0, 100.0));
        assert_eq!(clamp(-5.0, -5.0), (0.0, 0.0));
    }
}
