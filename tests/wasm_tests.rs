//! Browser-side smoke tests, run with `wasm-pack test --headless --chrome`
#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod fixtures;

use fixtures::PIVOT_VIEW_JSON;
use pivotgrid::render::{PolicyKind, RecordingSurface};
use pivotgrid::{GridSession, HitTarget};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn session_paints_in_the_browser() {
    let mut session = GridSession::new(RecordingSurface::new(), PolicyKind::Pivot);
    session.load_view_json(PIVOT_VIEW_JSON).unwrap();
    let painted = session.render().cells_painted;
    assert!(painted > 0);
    assert!(matches!(session.hit_test(150.0, 12.0), HitTarget::FilterButton(_)));
}

#[wasm_bindgen_test]
fn version_is_exposed() {
    assert_eq!(pivotgrid::version(), env!("CARGO_PKG_VERSION"));
}
