use serde::{Deserialize, Serialize};

/// Colors and fonts used by the painter. Consumed read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub font_family: String,
    /// Font size in CSS pixels
    pub font_size: f32,

    /// Background for `Normal` cells
    pub normal_bg: String,
    /// Zebra stripe background (`Alternate`, or odd rows when banding is on)
    pub alternate_bg: String,
    pub header_bg: String,
    pub subtotal_bg: String,
    pub total_bg: String,
    pub grand_total_bg: String,
    pub filter_row_bg: String,
    pub detail_row_bg: String,
    pub detail_row_alternate_bg: String,

    pub text_color: String,
    pub header_text_color: String,
    pub total_text_color: String,
    pub filter_label_color: String,

    /// Header bottom / total top separators
    pub separator_color: String,
    /// Full border drawn around filter-row cells
    pub filter_border_color: String,

    pub button_bg: String,
    pub button_hover_bg: String,
    pub button_border: String,
    pub button_text: String,
    /// Dropdown triangles and the expand/collapse glyph strokes
    pub glyph_color: String,
    /// Funnel glyph when an axis filter is active
    pub active_filter_color: String,
    pub icon_border: String,
    pub icon_hover_bg: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "Segoe UI, Arial, sans-serif".to_string(),
            font_size: 12.0,
            normal_bg: "#FFFFFF".to_string(),
            alternate_bg: "#F7F9FC".to_string(),
            header_bg: "#DDEBF7".to_string(),
            subtotal_bg: "#EEF4FB".to_string(),
            total_bg: "#DDEBF7".to_string(),
            grand_total_bg: "#C9DDF2".to_string(),
            filter_row_bg: "#FAFAFA".to_string(),
            detail_row_bg: "#FFFFFF".to_string(),
            detail_row_alternate_bg: "#F5F5F5".to_string(),
            text_color: "#202020".to_string(),
            header_text_color: "#1F3864".to_string(),
            total_text_color: "#1F3864".to_string(),
            filter_label_color: "#404040".to_string(),
            separator_color: "#9BC2E6".to_string(),
            filter_border_color: "#D0D0D0".to_string(),
            button_bg: "#FFFFFF".to_string(),
            button_hover_bg: "#E8F0FB".to_string(),
            button_border: "#ABABAB".to_string(),
            button_text: "#202020".to_string(),
            glyph_color: "#595959".to_string(),
            active_filter_color: "#1A73E8".to_string(),
            icon_border: "#8C8C8C".to_string(),
            icon_hover_bg: "#E0E0E0".to_string(),
        }
    }
}

impl Theme {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// CSS font shorthand for the given weight.
    pub fn font(&self, bold: bool) -> String {
        let weight = if bold { "bold" } else { "normal" };
        format!("{weight} {}px {}", self.font_size, self.font_family)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let theme = Theme::from_json(r##"{ "headerBg": "#000000", "fontSize": 14 }"##).unwrap();
        assert_eq!(theme.header_bg, "#000000");
        assert_eq!(theme.font_size, 14.0);
        assert_eq!(theme.normal_bg, Theme::default().normal_bg);
    }

    #[test]
    fn font_shorthand() {
        let theme = Theme::default();
        assert_eq!(theme.font(true), "bold 12px Segoe UI, Arial, sans-serif");
        assert!(theme.font(false).starts_with("normal 12px"));
    }
}
