//! Raster surface trait for pluggable drawing targets.
//!
//! The painter only needs five primitives plus text measurement, so any
//! 2D target (Canvas 2D in the browser, the recording surface in tests and
//! the CLI) can sit behind [`Surface`]. Coordinates are CSS pixels.

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Text drawing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle<'a> {
    /// CSS font shorthand, e.g. `"bold 12px Arial"`
    pub font: &'a str,
    pub color: &'a str,
    pub align: TextAlign,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Close,
}

/// A polyline/polygon built from move/line/close operations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.ops.push(PathOp::MoveTo(x, y));
        self
    }

    #[must_use]
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.ops.push(PathOp::LineTo(x, y));
        self
    }

    #[must_use]
    pub fn close(mut self) -> Self {
        self.ops.push(PathOp::Close);
        self
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// How a path is rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathPaint<'a> {
    Fill(&'a str),
    Stroke { color: &'a str, width: f64 },
}

/// Trait for raster drawing targets
///
/// The text baseline is the vertical middle: `y` passed to `fill_text` is
/// the line's center.
pub trait Surface {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str, line_width: f64);

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle<'_>);

    fn draw_path(&mut self, path: &Path, paint: PathPaint<'_>);

    /// Advance width of `text` rendered with `font`.
    fn measure_text(&mut self, text: &str, font: &str) -> f64;

    /// Push the drawing state. Paired with [`Surface::restore`].
    fn save(&mut self) {}

    /// Intersect the current clip with a rectangle.
    fn clip_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {}

    fn restore(&mut self) {}
}

/// Snap a coordinate to the pixel center for crisp 1px lines.
pub fn crisp(x: f64) -> f64 {
    x.floor() + 0.5
}

/// Draw a 1px-aligned line segment.
pub fn stroke_line(
    surface: &mut dyn Surface,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    width: f64,
    color: &str,
) {
    let path = Path::new()
        .move_to(crisp(x1), crisp(y1))
        .line_to(crisp(x2), crisp(y2));
    surface.draw_path(&path, PathPaint::Stroke { color, width });
}
