//! Pointer hit testing against the most recent paint pass.
//!
//! Small targets nest inside larger clickable cells, so kinds are checked in
//! a fixed priority: filter buttons, expand icons, header filters, then the
//! plain cell under the pointer.

use serde::Serialize;

use crate::render::bounds::{
    ExpandIconBounds, FilterButtonBounds, HeaderFilterBounds, InteractiveBounds,
};
use crate::render::RenderResult;
use crate::types::ViewResponse;

/// Target of a hit test (what was clicked)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HitTarget {
    FilterButton(FilterButtonBounds),
    ExpandIcon(ExpandIconBounds),
    HeaderFilter(HeaderFilterBounds),
    /// Anchor (row, col) of the plain cell under the pointer
    Cell { row: u32, col: u32 },
    /// Nothing (outside any interactive region)
    None,
}

/// First filter button containing the point, in registration order.
pub fn find_filter_button(
    px: f32,
    py: f32,
    registry: &InteractiveBounds,
) -> Option<&FilterButtonBounds> {
    registry
        .filter_buttons
        .values()
        .find(|e| e.bounds.contains(px, py))
}

pub fn find_expand_icon(
    px: f32,
    py: f32,
    registry: &InteractiveBounds,
) -> Option<&ExpandIconBounds> {
    registry
        .expand_collapse_icons
        .values()
        .find(|e| e.bounds.contains(px, py))
}

pub fn find_header_filter(
    px: f32,
    py: f32,
    registry: &InteractiveBounds,
) -> Option<&HeaderFilterBounds> {
    registry
        .header_filter_buttons
        .values()
        .find(|e| e.bounds.contains(px, py))
}

/// Resolve a pointer position to the topmost interactive target.
///
/// A result painted from a different view version answers `None`.
pub fn hit_test(px: f32, py: f32, result: &RenderResult, view: &ViewResponse) -> HitTarget {
    if result.view_version != view.version || !px.is_finite() || !py.is_finite() {
        return HitTarget::None;
    }
    let registry = &result.interactive_bounds;
    if let Some(button) = find_filter_button(px, py, registry) {
        return HitTarget::FilterButton(button.clone());
    }
    if let Some(icon) = find_expand_icon(px, py, registry) {
        return HitTarget::ExpandIcon(icon.clone());
    }
    if let Some(header) = find_header_filter(px, py, registry) {
        return HitTarget::HeaderFilter(header.clone());
    }

    // Painted area: the union of the region clips
    let (right, bottom) = result
        .regions
        .regions
        .iter()
        .fold((0.0_f32, 0.0_f32), |(r, b), region| {
            (
                r.max(region.clip.x + region.clip.width),
                b.max(region.clip.y + region.clip.height),
            )
        });
    if px >= right || py >= bottom {
        return HitTarget::None;
    }
    let Some((row, col)) = result.layout.cell_at(px, py) else {
        return HitTarget::None;
    };
    match result.spans.anchor_of(view, row, col) {
        Some((row, col)) => HitTarget::Cell { row, col },
        None => HitTarget::None,
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
    use crate::render::bounds::{Bounds, FilterAxis};
    use crate::render::{GridRenderer, RecordingSurface};
    use crate::types::{CellKind, RenderOptions, Theme, ViewCell, ViewRow};

    fn registry_with_overlap() -> InteractiveBounds {
        let mut registry = InteractiveBounds::new();
        registry.record_header_filter(HeaderFilterBounds {
            bounds: Bounds::new(0.0, 0.0, 100.0, 24.0),
            row: 0,
            col: 0,
            axis: FilterAxis::Row,
            has_active_filter: false,
        });
        registry.record_filter_button(FilterButtonBounds {
            bounds: Bounds::new(2.0, 2.0, 80.0, 20.0),
            field_index: 1,
            row: 0,
            col: 0,
        });
        registry
    }

    #[test]
    fn edges_are_inclusive() {
        let registry = registry_with_overlap();
        assert!(find_filter_button(2.0, 2.0, &registry).is_some());
        assert!(find_filter_button(82.0, 22.0, &registry).is_some());
        assert!(find_filter_button(82.5, 22.0, &registry).is_none());
        assert!(find_header_filter(100.0, 24.0, &registry).is_some());
    }

    #[test]
    fn first_match_wins_in_registration_order() {
        let mut registry = InteractiveBounds::new();
        for field in [4, 9] {
            registry.record_filter_button(FilterButtonBounds {
                bounds: Bounds::new(0.0, 0.0, 50.0, 50.0),
                field_index: field,
                row: 0,
                col: 0,
            });
        }
        assert_eq!(
            find_filter_button(10.0, 10.0, &registry).unwrap().field_index,
            4
        );
    }

    fn painted(view: &ViewResponse) -> RenderResult {
        let options = RenderOptions {
            frozen_row_count: Some(0),
            frozen_col_count: Some(0),
            viewport_width: 400.0,
            viewport_height: 200.0,
            ..RenderOptions::default()
        };
        let mut surface = RecordingSurface::new();
        GridRenderer::default().paint(&mut surface, Some(view), &options, &Theme::default())
    }

    #[test]
    fn expand_icon_outranks_cell_and_cells_resolve_to_anchor() {
        let mut view = ViewResponse {
            rows: (0..4)
                .map(|_| ViewRow {
                    cells: vec![ViewCell::default(); 4],
                })
                .collect(),
            ..ViewResponse::default()
        };
        view.rows[1].cells[0] = ViewCell {
            cell_type: CellKind::RowHeader,
            is_expandable: true,
            col_span: 2,
            ..ViewCell::default()
        };
        view.mark_span_coverage();
        let result = painted(&view);

        // Icon at (4, 30) .. (16, 42)
        match hit_test(10.0, 36.0, &result, &view) {
            HitTarget::ExpandIcon(icon) => {
                assert_eq!((icon.row, icon.col, icon.is_expanded), (1, 0, true));
            }
            other => panic!("expected icon, got {other:?}"),
        }
        // Covered (1,1) resolves to its anchor
        assert_eq!(
            hit_test(150.0, 36.0, &result, &view),
            HitTarget::Cell { row: 1, col: 0 }
        );
        assert_eq!(
            hit_test(350.0, 80.0, &result, &view),
            HitTarget::Cell { row: 3, col: 3 }
        );
        assert_eq!(hit_test(-1.0, 10.0, &result, &view), HitTarget::None);
        assert_eq!(hit_test(399.0, 150.0, &result, &view), HitTarget::None);
    }

    #[test]
    fn result_from_another_view_version_hits_nothing() {
        let view = ViewResponse {
            version: 3,
            rows: vec![ViewRow {
                cells: vec![ViewCell::default(); 2],
            }],
            ..ViewResponse::default()
        };
        let result = painted(&view);
        assert_eq!(
            hit_test(10.0, 10.0, &result, &view),
            HitTarget::Cell { row: 0, col: 0 }
        );

        let newer = ViewResponse {
            version: 4,
            ..view.clone()
        };
        assert_eq!(hit_test(10.0, 10.0, &result, &newer), HitTarget::None);
    }
}
