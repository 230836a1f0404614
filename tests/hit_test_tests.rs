//! Hit testing round trips against painted frames

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod fixtures;

use fixtures::{options, paint, ViewBuilder};
use pivotgrid::hit_test::hit_test;
use pivotgrid::render::PolicyKind;
use pivotgrid::{CellKind, HitTarget, ViewResponse};
use proptest::prelude::*;

fn outline_view() -> ViewResponse {
    let mut builder = ViewBuilder::new(40, 6).headers(1, 1);
    for r in 1..40 {
        builder = builder
            .kind(r, 0, CellKind::RowHeader, &format!("Item {r}"))
            .expandable(r, 0, r % 2 == 0);
    }
    builder.build()
}

#[test]
fn every_registered_icon_hits_itself() {
    let view = outline_view();
    let mut opts = options(&[], &[], 1, 1);
    opts.scroll_top = 100.0;
    opts.viewport_height = 300.0;
    let (result, _) = paint(&view, &opts, PolicyKind::Pivot);

    let icons = &result.interactive_bounds.expand_collapse_icons;
    assert!(!icons.is_empty());
    for icon in icons.values() {
        let b = icon.bounds;
        let (cx, cy) = (b.x + b.width / 2.0, b.y + b.height / 2.0);
        match hit_test(cx, cy, &result, &view) {
            HitTarget::ExpandIcon(hit) => {
                assert_eq!((hit.row, hit.col), (icon.row, icon.col));
                assert_eq!(hit.is_expanded, icon.row % 2 == 1);
            }
            other => panic!("icon {}-{} hit {other:?}", icon.row, icon.col),
        }
    }
}

#[test]
fn icons_under_the_frozen_header_are_clipped() {
    let view = outline_view();
    let mut opts = options(&[], &[], 1, 1);
    // Row 5 leading edge at 24 + 96 - 100 = 20, icon at 26..38
    opts.scroll_top = 100.0;
    let (result, _) = paint(&view, &opts, PolicyKind::Pivot);

    let icons = &result.interactive_bounds.expand_collapse_icons;
    // Row 4 (y -4..20) sits entirely under the header and is culled
    assert!(!icons.contains_key("4-0"));
    assert_eq!(result.regions.rows.scrolling.unwrap().start, 5);
    let row5 = &icons["5-0"];
    assert_eq!((row5.bounds.y, row5.bounds.height), (26.0, 12.0));
    assert_eq!(
        hit_test(10.0, 10.0, &result, &view),
        HitTarget::Cell { row: 0, col: 0 }
    );

    // Row 5 now starts at y=10; its icon (16..28) keeps only the part below the header
    opts.scroll_top = 110.0;
    let (result, _) = paint(&view, &opts, PolicyKind::Pivot);
    let row5 = &result.interactive_bounds.expand_collapse_icons["5-0"];
    assert_eq!((row5.bounds.y, row5.bounds.height), (24.0, 4.0));
    assert_eq!(
        hit_test(10.0, 20.0, &result, &view),
        HitTarget::Cell { row: 0, col: 0 }
    );
    assert!(matches!(
        hit_test(10.0, 26.0, &result, &view),
        HitTarget::ExpandIcon(_)
    ));
}

proptest! {
    #[test]
    fn pointer_resolves_to_a_painted_anchor(
        scroll_top in 0u16..800,
        scroll_left in 0u16..300,
        px in 0u16..800,
        py in 0u16..600,
    ) {
        let view = outline_view();
        let mut opts = options(&[], &[], 1, 1);
        opts.scroll_top = f32::from(scroll_top);
        opts.scroll_left = f32::from(scroll_left);
        let (result, _) = paint(&view, &opts, PolicyKind::Pivot);

        match hit_test(f32::from(px), f32::from(py), &result, &view) {
            HitTarget::Cell { row, col } => {
                prop_assert!(!view.cell(row, col).unwrap().is_covered);
                let (r0, r1, c0, c1) = result.regions.bounds().unwrap();
                prop_assert!(row >= r0 && row <= r1, "row {row} outside {r0}..={r1}");
                prop_assert!(col >= c0 && col <= c1, "col {col} outside {c0}..={c1}");
            }
            HitTarget::ExpandIcon(icon) => prop_assert_eq!(icon.col, 0),
            HitTarget::None => {}
            other => prop_assert!(false, "unexpected target {:?}", other),
        }
    }
}
