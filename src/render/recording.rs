//! Headless surface that records draw calls.
//!
//! Text is measured with a fixed per-character advance so layouts are
//! deterministic without a font rasterizer.

use serde::Serialize;

use super::backend::{Path, PathOp, PathPaint, Surface, TextStyle};

/// Default advance per character, in pixels
pub const DEFAULT_CHAR_ADVANCE: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: String,
    },
    StrokeRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: String,
        line_width: f64,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        font: String,
        color: String,
        align: &'static str,
    },
    FillPath {
        points: Vec<(f64, f64)>,
        color: String,
    },
    StrokePath {
        points: Vec<(f64, f64)>,
        color: String,
        width: f64,
    },
    Save,
    Clip {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    Restore,
}

#[derive(Debug, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    char_advance: f64,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::with_char_advance(DEFAULT_CHAR_ADVANCE)
    }

    pub fn with_char_advance(char_advance: f64) -> Self {
        Self {
            commands: Vec::new(),
            char_advance,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Text strings drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn points(path: &Path) -> Vec<(f64, f64)> {
    path.ops()
        .iter()
        .filter_map(|op| match *op {
            PathOp::MoveTo(x, y) | PathOp::LineTo(x, y) => Some((x, y)),
            PathOp::Close => None,
        })
        .collect()
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str, line_width: f64) {
        self.commands.push(DrawCommand::StrokeRect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
            line_width,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle<'_>) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            font: style.font.to_string(),
            color: style.color.to_string(),
            align: style.align.as_css(),
        });
    }

    fn draw_path(&mut self, path: &Path, paint: PathPaint<'_>) {
        let points = points(path);
        let command = match paint {
            PathPaint::Fill(color) => DrawCommand::FillPath {
                points,
                color: color.to_string(),
            },
            PathPaint::Stroke { color, width } => DrawCommand::StrokePath {
                points,
                color: color.to_string(),
                width,
            },
        };
        self.commands.push(command);
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_text(&mut self, text: &str, _font: &str) -> f64 {
        text.chars().count() as f64 * self.char_advance
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.commands.push(DrawCommand::Clip { x, y, w, h });
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::render::backend::TextAlign;

    #[test]
    fn records_in_order_and_measures_by_char() {
        let mut surface = RecordingSurface::with_char_advance(5.0);
        surface.save();
        surface.fill_rect(0.0, 0.0, 10.0, 10.0, "#FFFFFF");
        let style = TextStyle {
            font: "12px Arial",
            color: "#000000",
            align: TextAlign::Right,
        };
        surface.fill_text("abc", 10.0, 5.0, &style);
        surface.restore();

        assert_eq!(surface.commands().len(), 4);
        assert_eq!(surface.commands()[0], DrawCommand::Save);
        assert_eq!(surface.texts(), vec!["abc"]);
        assert_eq!(surface.measure_text("héllo", "12px Arial"), 25.0);
    }
}
