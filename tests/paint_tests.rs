//! Paint pass tests against a recording surface
//!
//! Covers filter button sizing, span skipping, policy alignment, repeat-paint
//! stability and ingestion of a captured backend view.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod fixtures;

use fixtures::{options, paint, ViewBuilder, PIVOT_VIEW_JSON};
use pivotgrid::render::{DrawCommand, FilterAxis, GridRenderer, PolicyKind, RecordingSurface};
use pivotgrid::{CellKind, CellValue, GridSession, HitTarget, Theme, ViewCell};
use test_case::test_case;

fn aligns_of(surface: &RecordingSurface, wanted: &str) -> Vec<&'static str> {
    surface
        .commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::FillText { text, align, .. } if text == wanted => Some(*align),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Filter buttons
// ============================================================================

#[test_case(40.0, 80.0 ; "narrow cell clamps to minimum")]
#[test_case(150.0, 150.0 ; "fits cell width")]
#[test_case(320.0, 200.0 ; "wide cell clamps to maximum")]
fn filter_button_width(cell_width: f32, expected: f32) {
    let view = ViewBuilder::new(2, 3)
        .kind(0, 0, CellKind::FilterLabel, "Region")
        .kind(0, 1, CellKind::FilterDropdown, "(All)")
        .filter_row(5, 0, "Region")
        .build();
    let opts = options(&[100.0, cell_width, 100.0], &[], 0, 0);
    let (result, _) = paint(&view, &opts, PolicyKind::Pivot);

    let button = &result.interactive_bounds.filter_buttons["filter-5"];
    assert_eq!(button.field_index, 5);
    assert_eq!((button.row, button.col), (0, 1));
    assert_eq!(button.bounds.x, 102.0);
    assert_eq!(button.bounds.y, 2.0);
    assert_eq!(button.bounds.width, expected);
    assert_eq!(button.bounds.height, 20.0);
}

#[test]
fn filter_label_is_right_aligned_without_bounds() {
    let view = ViewBuilder::new(1, 2)
        .kind(0, 0, CellKind::FilterLabel, "Region")
        .build();
    let (result, surface) = paint(&view, &options(&[], &[], 0, 0), PolicyKind::Pivot);
    assert!(result.interactive_bounds.is_empty());
    assert_eq!(aligns_of(&surface, "Region"), vec!["right"]);
}

// ============================================================================
// Spans
// ============================================================================

#[test]
fn block_span_is_painted_once() {
    let view = ViewBuilder::new(4, 4)
        .kind(1, 1, CellKind::RowHeader, "Block")
        .span(1, 1, 2, 2)
        .build();
    let (result, surface) = paint(&view, &options(&[], &[], 0, 0), PolicyKind::Pivot);

    assert_eq!(result.cells_painted, 13);
    assert_eq!(surface.texts().iter().filter(|t| **t == "Block").count(), 1);
    for (r, c) in [(1, 2), (2, 1), (2, 2)] {
        assert!(view.cell(r, c).unwrap().is_covered);
        assert_eq!(result.spans.anchor_of(&view, r, c), Some((1, 1)));
    }
}

#[test]
fn zero_width_column_is_skipped_but_spans_carry_on() {
    let view = ViewBuilder::new(1, 3)
        .kind(0, 0, CellKind::RowHeader, "Wide")
        .span(0, 0, 1, 3)
        .build();
    let opts = options(&[100.0, 0.0, 100.0], &[], 0, 0);
    let layout = pivotgrid::layout::GridLayout::from_options(&opts, 0, 0);
    let rect = pivotgrid::layout::cell_rect(&view, &layout, 0, 0).unwrap();
    assert_eq!(rect.width, 200.0);
}

// ============================================================================
// Policies
// ============================================================================

const FIVE: CellValue = CellValue::Number(5.0);

fn five_text() -> CellValue {
    CellValue::Text("5".to_string())
}

#[test_case(PolicyKind::Pivot, CellKind::Data, FIVE, "right" ; "pivot data")]
#[test_case(PolicyKind::Pivot, CellKind::DetailData, FIVE, "left" ; "pivot detail")]
#[test_case(PolicyKind::Tablix, CellKind::DetailData, FIVE, "right" ; "tablix numeric detail")]
#[test_case(PolicyKind::Tablix, CellKind::DetailData, five_text(), "left" ; "tablix text detail")]
#[test_case(PolicyKind::Tablix, CellKind::GrandTotal, FIVE, "right" ; "tablix total")]
fn policy_alignment(policy: PolicyKind, kind: CellKind, value: CellValue, expected: &str) {
    let view = ViewBuilder::new(1, 1)
        .cell(
            0,
            0,
            ViewCell {
                cell_type: kind,
                value,
                ..ViewCell::default()
            },
        )
        .build();
    let (_, surface) = paint(&view, &options(&[], &[], 0, 0), policy);
    assert_eq!(aligns_of(&surface, "5"), vec![expected]);
}

// ============================================================================
// Stability
// ============================================================================

#[test]
fn repeat_paint_is_identical() {
    let view = ViewBuilder::new(30, 12)
        .headers(1, 1)
        .kind(0, 0, CellKind::RowLabelHeader, "Rows")
        .kind(3, 0, CellKind::RowHeader, "Group")
        .span(3, 0, 4, 1)
        .expandable(3, 0, true)
        .number(5, 5, 42.0)
        .build();
    let mut opts = options(&[], &[], 1, 1);
    opts.scroll_top = 37.0;
    opts.scroll_left = 130.0;

    let renderer = GridRenderer::new(PolicyKind::Pivot);
    let mut first = RecordingSurface::new();
    let mut second = RecordingSurface::new();
    let a = renderer.paint(&mut first, Some(&view), &opts, &Theme::default());
    let b = renderer.paint(&mut second, Some(&view), &opts, &Theme::default());

    assert_eq!(first.commands(), second.commands());
    assert_eq!(a.interactive_bounds, b.interactive_bounds);
    assert_eq!(a.regions, b.regions);
}

// ============================================================================
// Captured view
// ============================================================================

#[test]
fn captured_pivot_view_paints_and_hit_tests() {
    let mut session = GridSession::new(RecordingSurface::new(), PolicyKind::Pivot);
    session.load_view_json(PIVOT_VIEW_JSON).unwrap();
    let view = session.view().unwrap();
    assert_eq!(view.version, 7);
    assert_eq!(view.suggested_freeze(), (2, 1));
    assert!(view.cell(3, 0).unwrap().is_covered);

    let result = session.render();
    let registry = &result.interactive_bounds;

    // Field comes from the filter row metadata
    let button = &registry.filter_buttons["filter-2"];
    assert_eq!((button.row, button.col), (0, 1));
    assert_eq!(button.bounds.width, 100.0);

    let header = &registry.header_filter_buttons["1-0"];
    assert_eq!(header.axis, FilterAxis::Row);
    assert!(header.has_active_filter);

    let icon = &registry.expand_collapse_icons["2-0"];
    assert!(icon.is_expanded);
    assert_eq!(icon.bounds.y, 66.0);

    assert_eq!(
        session.hit_test(50.0, 85.0),
        HitTarget::Cell { row: 2, col: 0 }
    );
    assert!(matches!(session.hit_test(10.0, 70.0), HitTarget::ExpandIcon(_)));
    assert!(matches!(session.hit_test(150.0, 12.0), HitTarget::FilterButton(_)));
    assert!(matches!(session.hit_test(50.0, 36.0), HitTarget::HeaderFilter(_)));
    assert_eq!(
        session.hit_test(250.0, 100.0),
        HitTarget::Cell { row: 4, col: 2 }
    );
}
