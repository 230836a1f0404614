//! Builders for views and render options used by the integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use pivotgrid::render::{GridRenderer, PolicyKind, RecordingSurface, RenderResult};
use pivotgrid::{
    CellKind, CellValue, FilterRow, RenderOptions, Theme, ViewCell, ViewResponse, ViewRow,
};

/// Pivot view captured from the backend: one filter row, one header row,
/// one label column and a two-row group span.
pub const PIVOT_VIEW_JSON: &str = include_str!("pivot_view.json");

/// Fluent builder over a blank `rows x cols` view.
pub struct ViewBuilder {
    view: ViewResponse,
}

impl ViewBuilder {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            view: ViewResponse {
                version: 1,
                row_count: rows,
                col_count: cols,
                rows: (0..rows)
                    .map(|_| ViewRow {
                        cells: vec![ViewCell::default(); cols],
                    })
                    .collect(),
                ..ViewResponse::default()
            },
        }
    }

    pub fn version(mut self, version: u64) -> Self {
        self.view.version = version;
        self
    }

    pub fn headers(mut self, header_rows: usize, label_cols: usize) -> Self {
        self.view.column_header_row_count = header_rows;
        self.view.row_label_col_count = label_cols;
        self
    }

    pub fn cell(mut self, row: usize, col: usize, cell: ViewCell) -> Self {
        self.view.rows[row].cells[col] = cell;
        self
    }

    pub fn kind(self, row: usize, col: usize, kind: CellKind, text: &str) -> Self {
        self.cell(
            row,
            col,
            ViewCell {
                cell_type: kind,
                formatted_value: Some(text.to_string()),
                ..ViewCell::default()
            },
        )
    }

    pub fn number(self, row: usize, col: usize, value: f64) -> Self {
        self.cell(
            row,
            col,
            ViewCell {
                cell_type: CellKind::Data,
                value: CellValue::Number(value),
                ..ViewCell::default()
            },
        )
    }

    pub fn span(mut self, row: usize, col: usize, row_span: u16, col_span: u16) -> Self {
        let cell = &mut self.view.rows[row].cells[col];
        cell.row_span = row_span;
        cell.col_span = col_span;
        self
    }

    pub fn expandable(mut self, row: usize, col: usize, collapsed: bool) -> Self {
        let cell = &mut self.view.rows[row].cells[col];
        cell.is_expandable = true;
        cell.is_collapsed = collapsed;
        self
    }

    pub fn filter_row(mut self, field_index: usize, view_row: usize, name: &str) -> Self {
        self.view.filter_row_count += 1;
        self.view.filter_rows.push(FilterRow {
            field_index,
            field_name: name.to_string(),
            view_row,
            ..FilterRow::default()
        });
        self
    }

    /// Finish the view with span coverage marked.
    pub fn build(mut self) -> ViewResponse {
        self.view.mark_span_coverage();
        self.view
    }
}

/// Options with explicit sizes and freeze counts over a 800x600 viewport.
pub fn options(
    col_widths: &[f32],
    row_heights: &[f32],
    frozen_rows: u32,
    frozen_cols: u32,
) -> RenderOptions {
    RenderOptions {
        col_widths: col_widths.to_vec(),
        row_heights: row_heights.to_vec(),
        frozen_row_count: Some(frozen_rows),
        frozen_col_count: Some(frozen_cols),
        ..RenderOptions::default()
    }
}

/// One paint pass on a fresh recording surface.
pub fn paint(
    view: &ViewResponse,
    options: &RenderOptions,
    policy: PolicyKind,
) -> (RenderResult, RecordingSurface) {
    let renderer = GridRenderer::new(policy);
    let mut surface = RecordingSurface::new();
    let result = renderer.paint(&mut surface, Some(view), options, &Theme::default());
    (result, surface)
}
