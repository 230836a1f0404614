//! Host-side grid session: one view, one surface, and the last paint result.

use log::debug;

use crate::error::Result;
use crate::hit_test::{hit_test, HitTarget};
use crate::layout::{GridLayout, Viewport};
use crate::render::{GridRenderer, PolicyKind, RenderResult, Surface};
use crate::types::{HoverState, RenderOptions, Theme, ViewResponse};

/// Owns the state between paints.
///
/// Any change that moves geometry (view, options, scroll, size) drops the
/// last render result, and hit tests on a stale session find nothing until
/// the next [`GridSession::render`].
pub struct GridSession<S: Surface> {
    surface: S,
    renderer: GridRenderer,
    view: Option<ViewResponse>,
    options: RenderOptions,
    theme: Theme,
    last: Option<RenderResult>,
    needs_render: bool,
}

impl<S: Surface> GridSession<S> {
    pub fn new(surface: S, policy: PolicyKind) -> Self {
        Self {
            surface,
            renderer: GridRenderer::new(policy),
            view: None,
            options: RenderOptions::default(),
            theme: Theme::default(),
            last: None,
            needs_render: true,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn view(&self) -> Option<&ViewResponse> {
        self.view.as_ref()
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Replace the view. Span coverage is normalized on the way in.
    pub fn set_view(&mut self, mut view: ViewResponse) {
        view.mark_span_coverage();
        debug!(
            "view v{} loaded: {} rows x {} cols",
            view.version,
            view.rows_len(),
            view.cols_len()
        );
        self.view = Some(view);
        self.invalidate();
    }

    /// Parse, validate and install a view from JSON.
    pub fn load_view_json(&mut self, json: &str) -> Result<()> {
        let view = ViewResponse::from_json(json)?;
        view.validate()?;
        self.set_view(view);
        Ok(())
    }

    pub fn clear_view(&mut self) {
        self.view = None;
        self.invalidate();
    }

    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
        self.invalidate();
    }

    /// Colors only; the last result stays valid.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.needs_render = true;
    }

    /// Hover keys select tints only; the last result stays valid.
    pub fn set_hover(&mut self, hover: HoverState) {
        if self.options.hover != hover {
            self.options.hover = hover;
            self.needs_render = true;
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.options.viewport_width = width.max(0.0);
        self.options.viewport_height = height.max(0.0);
        let (left, top) = self.clamped_scroll(self.options.scroll_left, self.options.scroll_top);
        self.options.scroll_left = left;
        self.options.scroll_top = top;
        self.invalidate();
    }

    /// Scroll to absolute offsets, clamped to the scrollable extent.
    /// Returns the applied offsets.
    pub fn scroll_to(&mut self, left: f32, top: f32) -> (f32, f32) {
        let (left, top) = self.clamped_scroll(left, top);
        #[allow(clippy::float_cmp)]
        let unchanged = left == self.options.scroll_left && top == self.options.scroll_top;
        if !unchanged {
            self.options.scroll_left = left;
            self.options.scroll_top = top;
            self.invalidate();
        }
        (left, top)
    }

    pub fn scroll_by(&mut self, dx: f32, dy: f32) -> (f32, f32) {
        self.scroll_to(self.options.scroll_left + dx, self.options.scroll_top + dy)
    }

    /// Paint and keep the result for hit testing.
    pub fn render(&mut self) -> &RenderResult {
        let result = self.renderer.paint(
            &mut self.surface,
            self.view.as_ref(),
            &self.options,
            &self.theme,
        );
        self.needs_render = false;
        self.last.insert(result)
    }

    /// Result of the last paint, unless it has gone stale.
    pub fn last_result(&self) -> Option<&RenderResult> {
        self.last.as_ref()
    }

    pub fn hit_test(&self, px: f32, py: f32) -> HitTarget {
        match (&self.last, &self.view) {
            (Some(result), Some(view)) => hit_test(px, py, result, view),
            _ => HitTarget::None,
        }
    }

    fn invalidate(&mut self) {
        self.last = None;
        self.needs_render = true;
    }

    fn clamped_scroll(&self, left: f32, top: f32) -> (f32, f32) {
        let Some(view) = &self.view else {
            return (0.0, 0.0);
        };
        let (suggested_rows, suggested_cols) = view.suggested_freeze();
        let layout = GridLayout::from_options(
            &self.options,
            self.options.frozen_row_count.unwrap_or(suggested_rows),
            self.options.frozen_col_count.unwrap_or(suggested_cols),
        );
        let viewport = Viewport::new(self.options.viewport_width, self.options.viewport_height);
        viewport.clamp_scroll(&layout, view.rows_len(), view.cols_len(), left, top)
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
    use crate::render::RecordingSurface;

    const VIEW: &str = r#"{
        "version": 3,
        "columnHeaderRowCount": 1,
        "rowLabelColCount": 1,
        "rows": [
            { "cells": [
                { "cellType": "rowLabelHeader", "formattedValue": "Row Labels" },
                { "cellType": "columnHeader", "formattedValue": "2024" }
            ] },
            { "cells": [
                { "cellType": "rowHeader", "formattedValue": "East", "isExpandable": true },
                { "cellType": "data", "value": { "type": "Number", "data": 10 } }
            ] }
        ]
    }"#;

    fn session() -> GridSession<RecordingSurface> {
        let mut session = GridSession::new(RecordingSurface::new(), PolicyKind::Pivot);
        session.load_view_json(VIEW).unwrap();
        session
    }

    #[test]
    fn hit_test_needs_a_fresh_render() {
        let mut session = session();
        assert_eq!(session.hit_test(10.0, 30.0), HitTarget::None);
        session.render();
        assert!(matches!(session.hit_test(10.0, 36.0), HitTarget::ExpandIcon(_)));

        session.resize(640.0, 480.0);
        assert!(session.last_result().is_none());
        assert_eq!(session.hit_test(10.0, 36.0), HitTarget::None);
    }

    #[test]
    fn hover_keeps_result_but_requests_render() {
        let mut session = session();
        session.render();
        assert!(!session.needs_render());
        session.set_hover(HoverState {
            hovered_icon_key: Some("1-0".to_string()),
            ..HoverState::default()
        });
        assert!(session.needs_render());
        assert!(session.last_result().is_some());
    }

    #[test]
    fn scroll_is_clamped_to_extent() {
        let mut session = session();
        // Two columns fit in the default 800px viewport
        assert_eq!(session.scroll_to(500.0, 500.0), (0.0, 0.0));
        session.resize(150.0, 30.0);
        // Frozen col 0 (100px) leaves 50px for 100px of scrolling column
        assert_eq!(session.scroll_by(80.0, 80.0), (50.0, 18.0));
    }

    #[test]
    fn invalid_json_is_reported() {
        let mut session = GridSession::new(RecordingSurface::new(), PolicyKind::Tablix);
        assert!(session.load_view_json("{ not json").is_err());
        assert!(session.view().is_none());
    }
}
