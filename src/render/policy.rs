//! Cell-kind policies.
//!
//! The pivot and tablix backends share one painter; they differ only in how
//! a cell kind maps to alignment, weight and color. Each backend gets a
//! [`CellPolicy`] implementation selected once at construction.

use serde::{Deserialize, Serialize};

use super::backend::TextAlign;
use crate::types::{BackgroundStyle, CellKind, CellValue, Theme, ViewCell};

/// Which cell separators to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderPolicy {
    None,
    BottomOnly,
    TopOnly,
    Full,
}

/// Painter branch for a cell kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellBranch {
    /// Right-aligned bold label, no interactive bounds
    LabelWithDropdown,
    /// Clamped-width filter button
    FilterControl,
    /// Axis label header with a filter icon; the whole cell is clickable
    HeaderFilter(HeaderAxis),
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAxis {
    Row,
    Column,
}

/// Selects the policy implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PolicyKind {
    #[default]
    Pivot,
    Tablix,
}

impl PolicyKind {
    pub fn build(self) -> Box<dyn CellPolicy> {
        match self {
            Self::Pivot => Box::new(PivotPolicy),
            Self::Tablix => Box::new(TablixPolicy),
        }
    }
}

pub fn branch_of(kind: CellKind) -> CellBranch {
    match kind {
        CellKind::FilterLabel => CellBranch::LabelWithDropdown,
        CellKind::FilterDropdown => CellBranch::FilterControl,
        CellKind::RowLabelHeader => CellBranch::HeaderFilter(HeaderAxis::Row),
        CellKind::ColumnLabelHeader => CellBranch::HeaderFilter(HeaderAxis::Column),
        _ => CellBranch::Plain,
    }
}

/// Background color: a fixed style lookup plus zebra striping of `Normal`
/// rows when banding is on.
pub fn background<'t>(style: BackgroundStyle, row: u32, theme: &'t Theme, banded: bool) -> &'t str {
    match style {
        BackgroundStyle::Normal if banded && row % 2 == 1 => &theme.alternate_bg,
        BackgroundStyle::Normal => &theme.normal_bg,
        BackgroundStyle::Alternate => &theme.alternate_bg,
        BackgroundStyle::Header => &theme.header_bg,
        BackgroundStyle::Subtotal => &theme.subtotal_bg,
        BackgroundStyle::Total => &theme.total_bg,
        BackgroundStyle::GrandTotal => &theme.grand_total_bg,
        BackgroundStyle::FilterRow => &theme.filter_row_bg,
        BackgroundStyle::DetailRow => &theme.detail_row_bg,
        BackgroundStyle::DetailRowAlternate => &theme.detail_row_alternate_bg,
    }
}

pub fn border_of(style: BackgroundStyle) -> BorderPolicy {
    match style {
        BackgroundStyle::Header => BorderPolicy::BottomOnly,
        BackgroundStyle::Subtotal | BackgroundStyle::Total | BackgroundStyle::GrandTotal => {
            BorderPolicy::TopOnly
        }
        BackgroundStyle::FilterRow => BorderPolicy::Full,
        _ => BorderPolicy::None,
    }
}

/// Per-backend styling decisions for plain cells.
pub trait CellPolicy {
    fn name(&self) -> &'static str;

    fn align(&self, cell: &ViewCell) -> TextAlign;

    /// Weight before the cell's own `isBold` flag is applied.
    fn bold(&self, cell: &ViewCell) -> bool;

    fn text_color<'t>(&self, cell: &ViewCell, theme: &'t Theme) -> &'t str;

    fn is_bold(&self, cell: &ViewCell) -> bool {
        cell.is_bold || self.bold(cell)
    }
}

/// Pivot table styling.
#[derive(Debug, Clone, Copy, Default)]
pub struct PivotPolicy;

impl CellPolicy for PivotPolicy {
    fn name(&self) -> &'static str {
        "pivot"
    }

    fn align(&self, cell: &ViewCell) -> TextAlign {
        if cell.cell_type.is_numeric() {
            TextAlign::Right
        } else {
            TextAlign::Left
        }
    }

    fn bold(&self, cell: &ViewCell) -> bool {
        cell.cell_type.is_total()
            || matches!(
                cell.background_style,
                BackgroundStyle::Header | BackgroundStyle::Total | BackgroundStyle::GrandTotal
            )
    }

    fn text_color<'t>(&self, cell: &ViewCell, theme: &'t Theme) -> &'t str {
        if cell.cell_type.is_total() {
            &theme.total_text_color
        } else if cell.cell_type.is_header() || cell.background_style == BackgroundStyle::Header {
            &theme.header_text_color
        } else {
            &theme.text_color
        }
    }
}

/// Tablix (report) styling: detail values are right-aligned only when numeric.
#[derive(Debug, Clone, Copy, Default)]
pub struct TablixPolicy;

impl CellPolicy for TablixPolicy {
    fn name(&self) -> &'static str {
        "tablix"
    }

    fn align(&self, cell: &ViewCell) -> TextAlign {
        match cell.cell_type {
            CellKind::DetailData if matches!(cell.value, CellValue::Number(_)) => TextAlign::Right,
            kind if kind.is_numeric() => TextAlign::Right,
            _ => TextAlign::Left,
        }
    }

    fn bold(&self, cell: &ViewCell) -> bool {
        cell.cell_type.is_total()
            || matches!(
                cell.cell_type,
                CellKind::RowGroupHeader | CellKind::ColumnGroupHeader | CellKind::ColumnHeader
            )
    }

    fn text_color<'t>(&self, cell: &ViewCell, theme: &'t Theme) -> &'t str {
        if cell.cell_type.is_total() {
            &theme.total_text_color
        } else if cell.cell_type.is_header() {
            &theme.header_text_color
        } else {
            &theme.text_color
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn cell(kind: CellKind, value: CellValue) -> ViewCell {
        ViewCell {
            cell_type: kind,
            value,
            ..ViewCell::default()
        }
    }

    #[test_case(BackgroundStyle::Header => BorderPolicy::BottomOnly)]
    #[test_case(BackgroundStyle::Subtotal => BorderPolicy::TopOnly)]
    #[test_case(BackgroundStyle::Total => BorderPolicy::TopOnly)]
    #[test_case(BackgroundStyle::GrandTotal => BorderPolicy::TopOnly)]
    #[test_case(BackgroundStyle::FilterRow => BorderPolicy::Full)]
    #[test_case(BackgroundStyle::Normal => BorderPolicy::None)]
    #[test_case(BackgroundStyle::DetailRow => BorderPolicy::None)]
    fn border_by_style(style: BackgroundStyle) -> BorderPolicy {
        border_of(style)
    }

    #[test_case(CellKind::FilterLabel => CellBranch::LabelWithDropdown)]
    #[test_case(CellKind::FilterDropdown => CellBranch::FilterControl)]
    #[test_case(CellKind::RowLabelHeader => CellBranch::HeaderFilter(HeaderAxis::Row))]
    #[test_case(CellKind::ColumnLabelHeader => CellBranch::HeaderFilter(HeaderAxis::Column))]
    #[test_case(CellKind::Data => CellBranch::Plain)]
    #[test_case(CellKind::Blank => CellBranch::Plain)]
    fn branch_by_kind(kind: CellKind) -> CellBranch {
        branch_of(kind)
    }

    #[test]
    fn banding_only_affects_normal_rows() {
        let theme = Theme::default();
        assert_eq!(
            background(BackgroundStyle::Normal, 1, &theme, true),
            theme.alternate_bg
        );
        assert_eq!(
            background(BackgroundStyle::Normal, 2, &theme, true),
            theme.normal_bg
        );
        assert_eq!(
            background(BackgroundStyle::Normal, 1, &theme, false),
            theme.normal_bg
        );
        assert_eq!(
            background(BackgroundStyle::Header, 1, &theme, true),
            theme.header_bg
        );
    }

    #[test]
    fn tablix_detail_alignment_follows_value() {
        let policy = TablixPolicy;
        let number = cell(CellKind::DetailData, CellValue::Number(3.5));
        let text = cell(CellKind::DetailData, CellValue::Text("x".to_string()));
        assert_eq!(policy.align(&number), TextAlign::Right);
        assert_eq!(policy.align(&text), TextAlign::Left);
        assert_eq!(PivotPolicy.align(&number), TextAlign::Left);
        assert_eq!(
            PivotPolicy.align(&cell(CellKind::GrandTotal, CellValue::Empty)),
            TextAlign::Right
        );
    }

    #[test]
    fn is_bold_flag_overrides_policy() {
        let mut c = cell(CellKind::Data, CellValue::Number(1.0));
        assert!(!PivotPolicy.is_bold(&c));
        c.is_bold = true;
        assert!(PivotPolicy.is_bold(&c));
        assert_eq!(PolicyKind::Tablix.build().name(), "tablix");
    }
}
