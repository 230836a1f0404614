//! View payload received from the pivot/tablix backend.
//!
//! A view is immutable for the duration of a paint pass and replaced whole
//! on every refresh. The engine never diffs two views.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::GridError;

/// Semantic kind of a cell, covering both the pivot and tablix backends.
///
/// Parsed from either the camelCase (`"rowGroupHeader"`) or PascalCase
/// (`"RowHeader"`) spelling; unknown strings become [`CellKind::Blank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum CellKind {
    /// Empty corner cell (top-left area).
    Corner,
    /// Row header label.
    RowHeader,
    /// Column header label.
    ColumnHeader,
    /// Row-axis label header carrying the row field filter dropdown.
    RowLabelHeader,
    /// Column-axis label header carrying the column field filter dropdown.
    ColumnLabelHeader,
    /// Aggregated value (pivot).
    Data,
    /// Aggregated value (tablix).
    AggregatedData,
    /// Raw detail value (tablix).
    DetailData,
    /// Row group header label (tablix).
    RowGroupHeader,
    /// Column group header label (tablix).
    ColumnGroupHeader,
    RowSubtotal,
    ColumnSubtotal,
    GrandTotalRow,
    GrandTotalColumn,
    GrandTotal,
    /// Layout filler.
    #[default]
    Blank,
    /// Filter field name, drawn with a trailing dropdown look.
    FilterLabel,
    /// Filter field button.
    FilterDropdown,
}

impl CellKind {
    /// Parse a backend cell-type string. Case of the first letter is ignored.
    pub fn parse(s: &str) -> Self {
        let mut chars = s.trim().chars();
        let normalized: String = match chars.next() {
            Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
            None => return Self::Blank,
        };
        match normalized.as_str() {
            "corner" => Self::Corner,
            "rowHeader" => Self::RowHeader,
            "columnHeader" => Self::ColumnHeader,
            "rowLabelHeader" => Self::RowLabelHeader,
            "columnLabelHeader" => Self::ColumnLabelHeader,
            "data" => Self::Data,
            "aggregatedData" => Self::AggregatedData,
            "detailData" => Self::DetailData,
            "rowGroupHeader" => Self::RowGroupHeader,
            "columnGroupHeader" => Self::ColumnGroupHeader,
            "rowSubtotal" => Self::RowSubtotal,
            "columnSubtotal" => Self::ColumnSubtotal,
            "grandTotalRow" => Self::GrandTotalRow,
            "grandTotalColumn" => Self::GrandTotalColumn,
            "grandTotal" => Self::GrandTotal,
            "filterLabel" => Self::FilterLabel,
            "filterDropdown" => Self::FilterDropdown,
            _ => Self::Blank,
        }
    }

    /// Value-bearing kinds whose text is right-aligned.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Data
                | Self::AggregatedData
                | Self::RowSubtotal
                | Self::ColumnSubtotal
                | Self::GrandTotalRow
                | Self::GrandTotalColumn
                | Self::GrandTotal
        )
    }

    pub fn is_total(self) -> bool {
        matches!(
            self,
            Self::RowSubtotal
                | Self::ColumnSubtotal
                | Self::GrandTotalRow
                | Self::GrandTotalColumn
                | Self::GrandTotal
        )
    }

    pub fn is_header(self) -> bool {
        matches!(
            self,
            Self::RowHeader
                | Self::ColumnHeader
                | Self::RowLabelHeader
                | Self::ColumnLabelHeader
                | Self::RowGroupHeader
                | Self::ColumnGroupHeader
        )
    }
}

impl From<String> for CellKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// Background style hint attached to every cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum BackgroundStyle {
    #[default]
    Normal,
    Header,
    Subtotal,
    Total,
    GrandTotal,
    /// Zebra stripe supplied by the backend.
    Alternate,
    FilterRow,
    DetailRow,
    DetailRowAlternate,
}

impl BackgroundStyle {
    /// Parse a backend style string; unknown styles fall back to `Normal`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "header" => Self::Header,
            "subtotal" => Self::Subtotal,
            "total" => Self::Total,
            "grandtotal" => Self::GrandTotal,
            "alternate" => Self::Alternate,
            "filterrow" => Self::FilterRow,
            "detailrow" => Self::DetailRow,
            "detailrowalternate" => Self::DetailRowAlternate,
            _ => Self::Normal,
        }
    }
}

impl From<String> for BackgroundStyle {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

/// Raw cell value, adjacently tagged as `{ "type": ..., "data": ... }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(String),
}

impl CellValue {
    /// Semantic value-to-string conversion used when no formatted value exists.
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) if n.is_finite() => n.to_string(),
            Self::Number(_) => "#NUM!".to_string(),
            Self::Text(s) | Self::Error(s) => s.clone(),
            Self::Boolean(true) => "TRUE".to_string(),
            Self::Boolean(false) => "FALSE".to_string(),
        }
    }
}

/// A single cell of the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewCell {
    #[serde(alias = "semanticType")]
    pub cell_type: CellKind,
    pub value: CellValue,
    pub formatted_value: Option<String>,
    pub row_span: u16,
    pub col_span: u16,
    /// True for every non-anchor cell inside another cell's span.
    #[serde(alias = "isSpanned")]
    pub is_covered: bool,
    pub indent_level: u8,
    pub is_expandable: bool,
    pub is_collapsed: bool,
    pub is_bold: bool,
    pub background_style: BackgroundStyle,
    pub number_format: Option<String>,
    pub filter_field_index: Option<usize>,
}

impl Default for ViewCell {
    fn default() -> Self {
        Self {
            cell_type: CellKind::Blank,
            value: CellValue::Empty,
            formatted_value: None,
            row_span: 1,
            col_span: 1,
            is_covered: false,
            indent_level: 0,
            is_expandable: false,
            is_collapsed: false,
            is_bold: false,
            background_style: BackgroundStyle::Normal,
            number_format: None,
            filter_field_index: None,
        }
    }
}

impl ViewCell {
    /// Row span, never less than 1.
    pub fn row_span(&self) -> u32 {
        u32::from(self.row_span.max(1))
    }

    /// Column span, never less than 1.
    pub fn col_span(&self) -> u32 {
        u32::from(self.col_span.max(1))
    }

    pub fn is_spanning(&self) -> bool {
        self.row_span() > 1 || self.col_span() > 1
    }

    /// Display text: the pre-formatted string when non-empty, else the value.
    pub fn display_text(&self) -> String {
        match self.formatted_value.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => self.value.display(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewRow {
    pub cells: Vec<ViewCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewColumn {
    pub view_col: usize,
    pub col_type: String,
    pub depth: u8,
    /// Width hint in characters.
    pub width_hint: u16,
}

/// Filter row metadata (one per page/report filter field).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterRow {
    pub field_index: usize,
    pub field_name: String,
    pub selected_values: Vec<String>,
    pub unique_values: Vec<String>,
    pub display_value: String,
    pub view_row: usize,
}

/// Row/column field summary used for header filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldSummary {
    pub field_index: usize,
    pub field_name: String,
    /// Whether this field currently hides any items.
    pub has_active_filter: bool,
}

/// The complete view as delivered by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewResponse {
    pub version: u64,
    pub row_count: usize,
    pub col_count: usize,
    #[serde(alias = "rowGroupColCount")]
    pub row_label_col_count: usize,
    pub column_header_row_count: usize,
    pub filter_row_count: usize,
    pub filter_rows: Vec<FilterRow>,
    pub row_field_summaries: Vec<FieldSummary>,
    pub column_field_summaries: Vec<FieldSummary>,
    pub rows: Vec<ViewRow>,
    pub columns: Vec<ViewColumn>,
}

impl ViewResponse {
    /// Parse a view from its JSON form.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&ViewCell> {
        self.rows
            .get(row as usize)
            .and_then(|r| r.cells.get(col as usize))
    }

    /// Number of rows actually present.
    pub fn rows_len(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    /// Width of the widest row actually present.
    pub fn cols_len(&self) -> u32 {
        let widest = self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        u32::try_from(widest).unwrap_or(u32::MAX)
    }

    pub fn row_axis_filter_active(&self) -> bool {
        self.row_field_summaries.iter().any(|s| s.has_active_filter)
    }

    pub fn column_axis_filter_active(&self) -> bool {
        self.column_field_summaries
            .iter()
            .any(|s| s.has_active_filter)
    }

    /// Filter field shown on the given view row, if any.
    pub fn filter_field_for_row(&self, row: u32) -> Option<usize> {
        self.filter_rows
            .iter()
            .find(|f| f.view_row == row as usize)
            .map(|f| f.field_index)
    }

    /// Frozen (rows, cols) matching the view's header and label areas.
    pub fn suggested_freeze(&self) -> (u32, u32) {
        let rows = self.filter_row_count + self.column_header_row_count;
        (
            u32::try_from(rows).unwrap_or(0),
            u32::try_from(self.row_label_col_count).unwrap_or(0),
        )
    }

    /// Mark every non-anchor cell inside a span footprint as covered.
    ///
    /// Pivot responses carry spans but no coverage flag. Anchors are visited
    /// row-major so an anchor already covered by an earlier span is left alone.
    /// Footprints are clipped to the rows and cells present.
    pub fn mark_span_coverage(&mut self) {
        let mut covered: HashSet<(usize, usize)> = HashSet::new();
        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.cells.iter().enumerate() {
                if cell.is_covered || covered.contains(&(r, c)) || !cell.is_spanning() {
                    continue;
                }
                let row_end = r.saturating_add(cell.row_span() as usize);
                for (tr, target) in self.rows.iter().enumerate().take(row_end).skip(r) {
                    let col_end = c
                        .saturating_add(cell.col_span() as usize)
                        .min(target.cells.len());
                    covered.extend((c..col_end).map(|tc| (tr, tc)).filter(|&pos| pos != (r, c)));
                }
            }
        }
        for (r, c) in covered {
            if let Some(cell) = self.rows.get_mut(r).and_then(|row| row.cells.get_mut(c)) {
                cell.is_covered = true;
            }
        }
    }

    /// Reject views whose structure contradicts itself.
    ///
    /// A covered cell may not carry spans of its own, and every filter row
    /// must point at a row that exists.
    pub fn validate(&self) -> crate::error::Result<()> {
        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.cells.iter().enumerate() {
                if cell.is_covered && cell.is_spanning() {
                    return Err(GridError::InvalidView(format!(
                        "covered cell {r}-{c} carries a span"
                    )));
                }
            }
        }
        if let Some(filter) = self.filter_rows.iter().find(|f| f.view_row >= self.rows.len()) {
            return Err(GridError::InvalidView(format!(
                "filter row for field {} points at missing row {}",
                filter.field_index, filter.view_row
            )));
        }
        Ok(())
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

    #[test]
    fn parses_both_cell_type_spellings() {
        assert_eq!(CellKind::parse("RowHeader"), CellKind::RowHeader);
        assert_eq!(CellKind::parse("rowGroupHeader"), CellKind::RowGroupHeader);
        assert_eq!(CellKind::parse("GrandTotal"), CellKind::GrandTotal);
        assert_eq!(CellKind::parse("filterDropdown"), CellKind::FilterDropdown);
        assert_eq!(CellKind::parse("sparkline"), CellKind::Blank);
        assert_eq!(CellKind::parse(""), CellKind::Blank);
    }

    #[test]
    fn unknown_background_is_normal() {
        assert_eq!(
            BackgroundStyle::parse("GrandTotal"),
            BackgroundStyle::GrandTotal
        );
        assert_eq!(
            BackgroundStyle::parse("filterRow"),
            BackgroundStyle::FilterRow
        );
        assert_eq!(BackgroundStyle::parse("neon"), BackgroundStyle::Normal);
    }

    #[test]
    fn deserializes_partial_cell() {
        let json = r#"{
            "cellType": "rowSubtotal",
            "value": { "type": "Number", "data": 12.5 },
            "isSpanned": true,
            "backgroundStyle": "Subtotal"
        }"#;
        let cell: ViewCell = serde_json::from_str(json).unwrap();
        assert_eq!(cell.cell_type, CellKind::RowSubtotal);
        assert_eq!(cell.value, CellValue::Number(12.5));
        assert!(cell.is_covered);
        assert_eq!(cell.row_span(), 1);
        assert_eq!(cell.col_span(), 1);
        assert_eq!(cell.background_style, BackgroundStyle::Subtotal);
        assert_eq!(cell.display_text(), "12.5");
    }

    #[test]
    fn zero_span_is_treated_as_one() {
        let cell = ViewCell {
            row_span: 0,
            col_span: 0,
            ..ViewCell::default()
        };
        assert_eq!(cell.row_span(), 1);
        assert_eq!(cell.col_span(), 1);
        assert!(!cell.is_spanning());
    }

    #[test]
    fn display_text_prefers_formatted_value() {
        let cell = ViewCell {
            value: CellValue::Number(1234.0),
            formatted_value: Some("1,234".to_string()),
            ..ViewCell::default()
        };
        assert_eq!(cell.display_text(), "1,234");

        let empty_fmt = ViewCell {
            value: CellValue::Boolean(true),
            formatted_value: Some(String::new()),
            ..ViewCell::default()
        };
        assert_eq!(empty_fmt.display_text(), "TRUE");
        assert_eq!(ViewCell::default().display_text(), "");
    }

    #[test]
    fn mark_span_coverage_covers_footprint() {
        let mut view = ViewResponse::default();
        for _ in 0..3 {
            view.rows.push(ViewRow {
                cells: vec![ViewCell::default(); 3],
            });
        }
        view.rows[1].cells[1].row_span = 2;
        view.rows[1].cells[1].col_span = 2;
        view.mark_span_coverage();

        assert!(!view.cell(1, 1).unwrap().is_covered);
        assert!(view.cell(1, 2).unwrap().is_covered);
        assert!(view.cell(2, 1).unwrap().is_covered);
        assert!(view.cell(2, 2).unwrap().is_covered);
        assert!(!view.cell(0, 0).unwrap().is_covered);

        let once = view.clone();
        view.mark_span_coverage();
        assert_eq!(once, view);
    }

    #[test]
    fn oversized_span_coverage_stops_at_the_view_edge() {
        let mut view = ViewResponse::default();
        for _ in 0..2 {
            view.rows.push(ViewRow {
                cells: vec![ViewCell::default(); 2],
            });
        }
        view.rows[0].cells[0].row_span = u16::MAX;
        view.rows[0].cells[0].col_span = u16::MAX;
        view.mark_span_coverage();

        assert!(!view.cell(0, 0).unwrap().is_covered);
        assert!(view.cell(0, 1).unwrap().is_covered);
        assert!(view.cell(1, 0).unwrap().is_covered);
        assert!(view.cell(1, 1).unwrap().is_covered);
        assert_eq!(view.rows.len(), 2);
    }

    #[test]
    fn summaries_drive_axis_filter_state() {
        let mut view = ViewResponse::default();
        assert!(!view.row_axis_filter_active());
        view.row_field_summaries.push(FieldSummary {
            field_index: 3,
            field_name: "Region".to_string(),
            has_active_filter: true,
        });
        assert!(view.row_axis_filter_active());
        assert!(!view.column_axis_filter_active());
    }

    #[test]
    fn validate_rejects_contradictions() {
        let mut view = ViewResponse::default();
        view.rows.push(ViewRow {
            cells: vec![ViewCell::default(); 2],
        });
        assert!(view.validate().is_ok());

        view.rows[0].cells[1].is_covered = true;
        view.rows[0].cells[1].col_span = 2;
        assert!(matches!(view.validate(), Err(GridError::InvalidView(_))));

        view.rows[0].cells[1].col_span = 1;
        view.filter_rows.push(FilterRow {
            view_row: 4,
            ..FilterRow::default()
        });
        assert!(matches!(view.validate(), Err(GridError::InvalidView(_))));
    }

    #[test]
    fn suggested_freeze_covers_headers_and_labels() {
        let view = ViewResponse {
            filter_row_count: 2,
            column_header_row_count: 1,
            row_label_col_count: 1,
            ..ViewResponse::default()
        };
        assert_eq!(view.suggested_freeze(), (3, 1));
    }
}
