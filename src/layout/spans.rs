//! Cell span resolution.
//!
//! Exactly one cell of a span (the top-left anchor) carries the spans; every
//! other cell in its footprint is covered and is never drawn or hit-tested.

use std::collections::HashMap;

use super::{Axis, AxisLayout, GridLayout};
use crate::types::{ViewCell, ViewResponse};

/// Rectangle representing a cell's screen bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    /// Width of the cell, including spanned columns
    pub width: f32,
    /// Height of the cell, including spanned rows
    pub height: f32,
    /// True if this cell should be skipped (covered by another cell's span)
    pub skip: bool,
}

pub fn is_covered_cell(cell: &ViewCell) -> bool {
    cell.is_covered
}

/// Total size of `span` indices starting at `start`. Indices past the known
/// dimensions count with the default size.
pub fn extent_of(axis: &AxisLayout, start: u32, span: u32) -> f32 {
    axis.sum(start, start.saturating_add(span.max(1)))
}

/// Screen rect of the cell at (row, col), or `None` if the view has no such cell.
pub fn cell_rect(view: &ViewResponse, layout: &GridLayout, row: u32, col: u32) -> Option<CellRect> {
    let cell = view.cell(row, col)?;
    let (x, y) = layout.cell_origin(row, col);
    if is_covered_cell(cell) {
        return Some(CellRect {
            x,
            y,
            width: layout.cols.size_of(col),
            height: layout.rows.size_of(row),
            skip: true,
        });
    }
    Some(CellRect {
        x,
        y,
        width: extent_of(layout.axis(Axis::Col), col, cell.col_span()),
        height: extent_of(layout.axis(Axis::Row), row, cell.row_span()),
        skip: false,
    })
}

/// Covered cell → anchor lookup for one view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanIndex {
    anchors: HashMap<(u32, u32), (u32, u32)>,
}

impl SpanIndex {
    /// Spans are clipped to the rows and cells the view actually has.
    pub fn build(view: &ViewResponse) -> Self {
        let mut anchors = HashMap::new();
        for (r, row) in view.rows.iter().enumerate() {
            let Ok(ar) = u32::try_from(r) else { break };
            for (c, cell) in row.cells.iter().enumerate() {
                let Ok(ac) = u32::try_from(c) else { break };
                if is_covered_cell(cell) || !cell.is_spanning() {
                    continue;
                }
                let row_end = r.saturating_add(cell.row_span() as usize);
                for (tr, target) in view.rows.iter().enumerate().take(row_end).skip(r) {
                    let col_end = c
                        .saturating_add(cell.col_span() as usize)
                        .min(target.cells.len());
                    for tc in c..col_end {
                        if (tr, tc) == (r, c)
                            || !target.cells.get(tc).is_some_and(is_covered_cell)
                        {
                            continue;
                        }
                        if let (Ok(tr), Ok(tc)) = (u32::try_from(tr), u32::try_from(tc)) {
                            anchors.entry((tr, tc)).or_insert((ar, ac));
                        }
                    }
                }
            }
        }
        Self { anchors }
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Anchor owning (row, col). Non-covered cells are their own anchor;
    /// a covered cell with no known anchor resolves to `None`.
    pub fn anchor_of(&self, view: &ViewResponse, row: u32, col: u32) -> Option<(u32, u32)> {
        let cell = view.cell(row, col)?;
        if !is_covered_cell(cell) {
            return Some((row, col));
        }
        self.anchors.get(&(row, col)).copied()
    }
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
    use crate::types::{ViewCell, ViewRow};

    fn grid(rows: usize, cols: usize) -> ViewResponse {
        ViewResponse {
            rows: (0..rows)
                .map(|_| ViewRow {
                    cells: vec![ViewCell::default(); cols],
                })
                .collect(),
            ..ViewResponse::default()
        }
    }

    fn layout() -> GridLayout {
        GridLayout::new(
            AxisLayout::new(Dimensions::dense(vec![24.0, 24.0, 24.0], 20.0), 1, 0.0),
            AxisLayout::new(Dimensions::dense(vec![50.0, 100.0, 100.0], 64.0), 1, 0.0),
        )
    }

    #[test]
    fn extent_uses_default_past_known_sizes() {
        let layout = layout();
        assert_eq!(extent_of(&layout.cols, 2, 2), 100.0 + 64.0);
        assert_eq!(extent_of(&layout.cols, 0, 0), 50.0);
    }

    #[test]
    fn spanned_rect_and_covered_skip() {
        let mut view = grid(3, 4);
        view.rows[2].cells[2].col_span = 2;
        view.rows[2].cells[3].is_covered = true;
        let layout = layout();

        let anchor = cell_rect(&view, &layout, 2, 2).unwrap();
        assert!(!anchor.skip);
        assert_eq!(anchor.width, 164.0);
        assert_eq!(anchor.height, 24.0);

        let covered = cell_rect(&view, &layout, 2, 3).unwrap();
        assert!(covered.skip);
        assert!(cell_rect(&view, &layout, 9, 9).is_none());
    }

    #[test]
    fn span_index_maps_footprint_to_anchor() {
        let mut view = grid(4, 4);
        view.rows[1].cells[1].row_span = 2;
        view.rows[1].cells[1].col_span = 2;
        view.mark_span_coverage();
        let index = SpanIndex::build(&view);

        assert_eq!(index.len(), 3);
        assert_eq!(index.anchor_of(&view, 1, 2), Some((1, 1)));
        assert_eq!(index.anchor_of(&view, 2, 1), Some((1, 1)));
        assert_eq!(index.anchor_of(&view, 2, 2), Some((1, 1)));
        assert_eq!(index.anchor_of(&view, 0, 0), Some((0, 0)));
        assert_eq!(index.anchor_of(&view, 3, 3), Some((3, 3)));
    }

    #[test]
    fn oversized_span_is_clipped_to_the_view() {
        let mut view = grid(3, 3);
        view.rows[0].cells[0].row_span = u16::MAX;
        view.rows[0].cells[0].col_span = u16::MAX;
        view.rows[2].cells.truncate(1);
        view.mark_span_coverage();
        let index = SpanIndex::build(&view);

        // 3 + 3 + 1 cells, minus the anchor itself
        assert_eq!(index.len(), 6);
        assert_eq!(index.anchor_of(&view, 2, 0), Some((0, 0)));
        assert_eq!(index.anchor_of(&view, 1, 2), Some((0, 0)));
        assert_eq!(index.anchor_of(&view, 2, 1), None);
    }

    #[test]
    fn orphan_covered_cell_has_no_anchor() {
        let mut view = grid(2, 2);
        view.rows[1].cells[1].is_covered = true;
        let index = SpanIndex::build(&view);
        assert!(index.is_empty());
        assert_eq!(index.anchor_of(&view, 1, 1), None);
    }
}
