use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 24.0;

/// Default column width in pixels
pub const DEFAULT_COL_WIDTH: f32 = 100.0;

/// Hover keys from the consuming UI. They select tinted colors only and
/// never change geometry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HoverState {
    pub hovered_filter_field_index: Option<usize>,
    /// `"{row}-{col}"` of the hovered expand/collapse icon
    pub hovered_icon_key: Option<String>,
    /// `"{row}-{col}"` of the hovered header filter cell
    pub hovered_header_filter_key: Option<String>,
}

/// Fixed pixel metrics of the painter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridMetrics {
    pub cell_padding: f32,
    /// Horizontal offset per indent level
    pub indent_width: f32,
    /// Side of the expand/collapse glyph box
    pub icon_size: f32,
    /// Gap between the expand glyph and the text
    pub icon_gap: f32,
    pub min_button_width: f32,
    pub max_button_width: f32,
    /// Inset of the filter button inside its cell
    pub button_inset: f32,
    /// Side of the header filter icon button
    pub header_icon_size: f32,
    /// Dimensions below this many pixels are hidden and sum as 0
    pub hidden_threshold: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            cell_padding: 4.0,
            indent_width: 16.0,
            icon_size: 12.0,
            icon_gap: 4.0,
            min_button_width: 80.0,
            max_button_width: 200.0,
            button_inset: 2.0,
            header_icon_size: 14.0,
            hidden_threshold: 0.5,
        }
    }
}

/// Per-paint options supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Advisory visible-range hints; they can only narrow the computed ranges
    pub start_row: Option<u32>,
    pub end_row: Option<u32>,
    pub start_col: Option<u32>,
    pub end_col: Option<u32>,

    pub row_heights: Vec<f32>,
    pub col_widths: Vec<f32>,
    /// Sparse overrides, applied on top of the arrays
    pub row_height_overrides: HashMap<u32, f32>,
    pub col_width_overrides: HashMap<u32, f32>,
    pub default_row_height: f32,
    pub default_col_width: f32,

    pub scroll_left: f32,
    pub scroll_top: f32,
    /// `None` falls back to the view's suggested freeze
    pub frozen_row_count: Option<u32>,
    pub frozen_col_count: Option<u32>,

    pub viewport_width: f32,
    pub viewport_height: f32,

    /// Stripe odd `Normal` rows with the alternate background
    pub banded_rows: bool,

    #[serde(flatten)]
    pub hover: HoverState,
    pub metrics: GridMetrics,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            start_row: None,
            end_row: None,
            start_col: None,
            end_col: None,
            row_heights: Vec::new(),
            col_widths: Vec::new(),
            row_height_overrides: HashMap::new(),
            col_width_overrides: HashMap::new(),
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_col_width: DEFAULT_COL_WIDTH,
            scroll_left: 0.0,
            scroll_top: 0.0,
            frozen_row_count: None,
            frozen_col_count: None,
            viewport_width: 800.0,
            viewport_height: 600.0,
            banded_rows: false,
            hover: HoverState::default(),
            metrics: GridMetrics::default(),
        }
    }
}

impl RenderOptions {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_hover_keys_and_sparse_overrides() {
        let json = r#"{
            "colWidths": [50, 100, 100],
            "colWidthOverrides": { "7": 0 },
            "frozenRowCount": 1,
            "scrollLeft": 30,
            "hoveredIconKey": "2-0",
            "metrics": { "minButtonWidth": 90 }
        }"#;
        let opts = RenderOptions::from_json(json).unwrap();
        assert_eq!(opts.col_widths, vec![50.0, 100.0, 100.0]);
        assert_eq!(opts.col_width_overrides.get(&7), Some(&0.0));
        assert_eq!(opts.frozen_row_count, Some(1));
        assert_eq!(opts.frozen_col_count, None);
        assert_eq!(opts.scroll_left, 30.0);
        assert_eq!(opts.hover.hovered_icon_key.as_deref(), Some("2-0"));
        assert_eq!(opts.metrics.min_button_width, 90.0);
        assert_eq!(opts.metrics.icon_size, 12.0);
        assert_eq!(opts.default_row_height, DEFAULT_ROW_HEIGHT);
    }
}
