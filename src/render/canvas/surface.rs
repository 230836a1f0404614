//! [`Surface`] over a `CanvasRenderingContext2d`, with text widths cached
//! per font.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::Result;
use crate::render::backend::{Path, PathOp, PathPaint, Surface, TextStyle};
use crate::render::text::WidthCache;

const TEXT_WIDTH_CACHE_CAP: usize = 4096;

/// [`Surface`] over a `CanvasRenderingContext2d`.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    dpr: f64,
    /// Font currently set on the context, to skip redundant `set_font` calls
    current_font: String,
    text_widths: WidthCache,
}

impl CanvasSurface {
    /// Create a surface from an HtmlCanvasElement
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "Failed to get 2d context")?
            .ok_or("No 2d context available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;
        ctx.set_text_baseline("middle");

        Ok(Self {
            canvas,
            ctx,
            dpr: 1.0,
            current_font: String::new(),
            text_widths: WidthCache::new(TEXT_WIDTH_CACHE_CAP),
        })
    }

    /// Resize the backing store to `css_w x css_h` logical pixels at `dpr`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resize(&mut self, css_w: f32, css_h: f32, dpr: f32) -> Result<()> {
        let dpr = if dpr.is_finite() && dpr > 0.0 { f64::from(dpr) } else { 1.0 };
        self.dpr = dpr;
        self.canvas
            .set_width((f64::from(css_w.max(0.0)) * dpr).round() as u32);
        self.canvas
            .set_height((f64::from(css_h.max(0.0)) * dpr).round() as u32);
        // Resizing resets the context state
        self.ctx
            .set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(|_| crate::error::GridError::Render("set_transform failed".to_string()))?;
        self.ctx.set_text_baseline("middle");
        self.current_font.clear();
        self.text_widths.clear();
        Ok(())
    }

    /// Clear the whole canvas.
    pub fn clear(&self) {
        let w = f64::from(self.canvas.width()) / self.dpr;
        let h = f64::from(self.canvas.height()) / self.dpr;
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn set_font(&mut self, font: &str) {
        if self.current_font != font {
            self.ctx.set_font(font);
            self.current_font.clear();
            self.current_font.push_str(font);
        }
    }

    fn trace_path(&self, path: &Path) {
        self.ctx.begin_path();
        for op in path.ops() {
            match *op {
                PathOp::MoveTo(x, y) => self.ctx.move_to(x, y),
                PathOp::LineTo(x, y) => self.ctx.line_to(x, y),
                PathOp::Close => self.ctx.close_path(),
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(x, y, w, h);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle<'_>) {
        self.set_font(style.font);
        self.ctx.set_fill_style_str(style.color);
        self.ctx.set_text_align(style.align.as_css());
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn draw_path(&mut self, path: &Path, paint: PathPaint<'_>) {
        if path.is_empty() {
            return;
        }
        self.trace_path(path);
        match paint {
            PathPaint::Fill(color) => {
                self.ctx.set_fill_style_str(color);
                self.ctx.fill();
            }
            PathPaint::Stroke { color, width } => {
                self.ctx.set_stroke_style_str(color);
                self.ctx.set_line_width(width);
                self.ctx.stroke();
            }
        }
    }

    fn measure_text(&mut self, text: &str, font: &str) -> f64 {
        if let Some(width) = self.text_widths.width(font, text) {
            return width;
        }
        self.set_font(font);
        let width = self
            .ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(0.0);
        self.text_widths.remember(font, text, width);
        width
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.begin_path();
        self.ctx.rect(x, y, w, h);
        self.ctx.clip();
    }

    fn restore(&mut self) {
        self.ctx.restore();
        // restore() may bring back an older font
        self.current_font.clear();
    }
}
