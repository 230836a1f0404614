//! Paint pass over the four frozen-pane regions.

use std::collections::HashSet;

use log::{debug, trace, warn};

use super::backend::Surface;
use super::bounds::InteractiveBounds;
use super::painter::{paint_cell, CellPaint, PaintContext};
use super::policy::{CellPolicy, PolicyKind};
use crate::layout::{
    cell_rect, cull, GridLayout, RangeHints, Region, SpanIndex, Viewport, VisibleRegions,
};
use crate::types::{RenderOptions, Theme, ViewResponse};

/// Output of one paint pass. Replaces, never merges with, the previous one.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub interactive_bounds: InteractiveBounds,
    /// Geometry the pass painted with; used to hit-test plain cells
    pub layout: GridLayout,
    pub regions: VisibleRegions,
    pub spans: SpanIndex,
    pub view_version: u64,
    pub cells_painted: usize,
}

impl RenderResult {
    fn empty(layout: GridLayout) -> Self {
        Self {
            interactive_bounds: InteractiveBounds::new(),
            layout,
            regions: VisibleRegions::default(),
            spans: SpanIndex::default(),
            view_version: 0,
            cells_painted: 0,
        }
    }
}

/// Paints views with one cell policy. Holds no per-view state, so any view
/// can be painted with the same renderer.
pub struct GridRenderer {
    policy: Box<dyn CellPolicy>,
}

impl Default for GridRenderer {
    fn default() -> Self {
        Self::new(PolicyKind::default())
    }
}

impl GridRenderer {
    pub fn new(kind: PolicyKind) -> Self {
        Self::with_policy(kind.build())
    }

    pub fn with_policy(policy: Box<dyn CellPolicy>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &dyn CellPolicy {
        self.policy.as_ref()
    }

    /// Paint the visible part of `view` and collect its interactive bounds.
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        view: Option<&ViewResponse>,
        options: &RenderOptions,
        theme: &Theme,
    ) -> RenderResult {
        let Some(view) = view else {
            warn!("paint requested without a view");
            return RenderResult::empty(GridLayout::from_options(options, 0, 0));
        };

        let (suggested_rows, suggested_cols) = view.suggested_freeze();
        let frozen_rows = options.frozen_row_count.unwrap_or(suggested_rows);
        let frozen_cols = options.frozen_col_count.unwrap_or(suggested_cols);
        let layout = GridLayout::from_options(options, frozen_rows, frozen_cols);
        let viewport = Viewport::new(options.viewport_width, options.viewport_height);
        let hints = RangeHints {
            start_row: options.start_row,
            end_row: options.end_row,
            start_col: options.start_col,
            end_col: options.end_col,
        };
        let regions = cull(&layout, viewport, view.rows_len(), view.cols_len(), hints);
        let spans = SpanIndex::build(view);
        trace!("v{} span index: {} covered", view.version, spans.len());

        let ctx = PaintContext {
            view,
            theme,
            metrics: &options.metrics,
            hover: &options.hover,
            policy: self.policy.as_ref(),
            banded_rows: options.banded_rows,
            row_filter_active: view.row_axis_filter_active(),
            column_filter_active: view.column_axis_filter_active(),
        };

        let mut pass = Pass {
            ctx: &ctx,
            layout: &layout,
            spans: &spans,
            registry: InteractiveBounds::new(),
            painted: 0,
            skipped: 0,
        };
        for region in &regions.regions {
            surface.save();
            surface.clip_rect(
                f64::from(region.clip.x),
                f64::from(region.clip.y),
                f64::from(region.clip.width),
                f64::from(region.clip.height),
            );
            pass.paint_region(surface, region);
            surface.restore();
        }

        let Pass {
            registry,
            painted,
            skipped,
            ..
        } = pass;
        debug!(
            "painted v{} ({}): {} cells, {} covered skipped, rows {:?}, cols {:?}, bounds {}/{}/{}",
            view.version,
            self.policy.name(),
            painted,
            skipped,
            regions.rows.span(),
            regions.cols.span(),
            registry.expand_collapse_icons.len(),
            registry.filter_buttons.len(),
            registry.header_filter_buttons.len(),
        );

        RenderResult {
            interactive_bounds: registry,
            layout,
            regions,
            spans,
            view_version: view.version,
            cells_painted: painted,
        }
    }
}

/// Mutable state of one paint pass.
struct Pass<'a> {
    ctx: &'a PaintContext<'a>,
    layout: &'a GridLayout,
    spans: &'a SpanIndex,
    registry: InteractiveBounds,
    painted: usize,
    skipped: usize,
}

impl Pass<'_> {
    fn paint_region(&mut self, surface: &mut dyn Surface, region: &Region) {
        let view = self.ctx.view;
        // Anchors outside the culled range that were pulled in for this region
        let mut pulled: HashSet<(u32, u32)> = HashSet::new();

        for row in region.rows.iter() {
            for col in region.cols.iter() {
                let Some(cell) = view.cell(row, col) else {
                    continue;
                };
                if !cell.is_covered {
                    self.paint_at(surface, region, row, col);
                    continue;
                }
                self.skipped += 1;
                trace!("skip covered cell {row}-{col}");
                let Some((ar, ac)) = self.spans.anchor_of(view, row, col) else {
                    continue;
                };
                let inside = region.rows.contains(ar) && region.cols.contains(ac);
                if !inside && pulled.insert((ar, ac)) {
                    trace!("pull in anchor {ar}-{ac} for covered cell {row}-{col}");
                    self.paint_at(surface, region, ar, ac);
                }
            }
        }
    }

    fn paint_at(&mut self, surface: &mut dyn Surface, region: &Region, row: u32, col: u32) {
        let view = self.ctx.view;
        let (Some(cell), Some(rect)) =
            (view.cell(row, col), cell_rect(view, self.layout, row, col))
        else {
            return;
        };
        if rect.skip {
            return;
        }
        let paint = CellPaint {
            cell,
            row,
            col,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        };
        let out = paint_cell(surface, self.ctx, &paint);
        self.painted += 1;

        let clip = &region.clip;
        if let Some(mut icon) = out.icon {
            if let Some(bounds) = icon.bounds.clipped_to(clip) {
                icon.bounds = bounds;
                self.registry.record_expand_icon(icon);
            }
        }
        if let Some(mut button) = out.filter_button {
            if let Some(bounds) = button.bounds.clipped_to(clip) {
                button.bounds = bounds;
                self.registry.record_filter_button(button);
            }
        }
        if let Some(mut header) = out.header_filter {
            if let Some(bounds) = header.bounds.clipped_to(clip) {
                header.bounds = bounds;
                self.registry.record_header_filter(header);
            }
        }
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
    use crate::hit_test::{hit_test, HitTarget};
    use crate::render::recording::{DrawCommand, RecordingSurface};
    use crate::types::{CellKind, ViewCell, ViewRow};

    fn view(rows: usize, cols: usize) -> ViewResponse {
        ViewResponse {
            version: 1,
            rows: (0..rows)
                .map(|_| ViewRow {
                    cells: vec![ViewCell::default(); cols],
                })
                .collect(),
            ..ViewResponse::default()
        }
    }

    fn options() -> RenderOptions {
        RenderOptions {
            frozen_row_count: Some(0),
            frozen_col_count: Some(0),
            viewport_width: 300.0,
            viewport_height: 100.0,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn absent_view_yields_empty_result() {
        let renderer = GridRenderer::default();
        let mut surface = RecordingSurface::new();
        let result = renderer.paint(&mut surface, None, &options(), &Theme::default());
        assert!(result.interactive_bounds.is_empty());
        assert_eq!(result.cells_painted, 0);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn paints_only_visible_cells() {
        let v = view(100, 100);
        let renderer = GridRenderer::default();
        let mut surface = RecordingSurface::new();
        let result = renderer.paint(&mut surface, Some(&v), &options(), &Theme::default());
        // 300x100 viewport over 100x24 cells: cols 0..=2, rows 0..=4
        assert_eq!(result.cells_painted, 15);
        assert_eq!(result.regions.bounds(), Some((0, 4, 0, 2)));
    }

    #[test]
    fn each_region_is_clipped() {
        let v = view(10, 10);
        let opts = RenderOptions {
            frozen_row_count: Some(1),
            frozen_col_count: Some(1),
            ..options()
        };
        let renderer = GridRenderer::default();
        let mut surface = RecordingSurface::new();
        renderer.paint(&mut surface, Some(&v), &opts, &Theme::default());
        let clips = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clip { .. }))
            .count();
        assert_eq!(clips, 4);
        assert_eq!(surface.commands().last(), Some(&DrawCommand::Restore));
    }

    #[test]
    fn scrolled_span_anchor_is_pulled_in() {
        let mut v = view(10, 10);
        v.rows[1].cells[0] = ViewCell {
            cell_type: CellKind::RowHeader,
            row_span: 3,
            is_expandable: true,
            ..ViewCell::default()
        };
        v.mark_span_coverage();
        let opts = RenderOptions {
            // Row 1 scrolled out, rows 2 and 3 still covered and visible
            scroll_top: 40.0,
            ..options()
        };
        let renderer = GridRenderer::default();
        let mut surface = RecordingSurface::new();
        let result = renderer.paint(&mut surface, Some(&v), &opts, &Theme::default());
        assert_eq!(result.regions.rows.scrolling.unwrap().start, 1);

        let opts = RenderOptions {
            scroll_top: 50.0,
            ..options()
        };
        let result = renderer.paint(&mut surface, Some(&v), &opts, &Theme::default());
        assert_eq!(result.regions.rows.scrolling.unwrap().start, 2);
        // Anchor at (1,0) spans y in [-26, 46), its icon is centered at y=4..16
        let icon = &result.interactive_bounds.expand_collapse_icons["1-0"];
        assert_eq!(icon.bounds.y, 4.0);
    }

    #[test]
    fn reused_renderer_follows_a_new_view_with_the_same_version() {
        let mut a = view(10, 10);
        a.rows[1].cells[0].row_span = 3;
        a.mark_span_coverage();
        let mut b = view(10, 10);
        b.rows[0].cells[0].row_span = 4;
        b.mark_span_coverage();
        assert_eq!(a.version, b.version);

        let opts = RenderOptions {
            scroll_top: 50.0,
            ..options()
        };
        let renderer = GridRenderer::default();
        let mut surface = RecordingSurface::new();
        renderer.paint(&mut surface, Some(&a), &opts, &Theme::default());
        let result = renderer.paint(&mut surface, Some(&b), &opts, &Theme::default());

        // Rows 2..=6 x cols 0..=2, covered (2,0) and (3,0) replaced by anchor (0,0)
        assert_eq!(result.cells_painted, 14);
        assert_eq!(result.spans.anchor_of(&b, 3, 0), Some((0, 0)));
        assert_eq!(
            hit_test(10.0, 30.0, &result, &b),
            HitTarget::Cell { row: 0, col: 0 }
        );
    }
}
