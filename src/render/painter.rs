//! Cell painter.
//!
//! Background and border are drawn first for every cell, then exactly one
//! kind-specific branch runs. The painter never fails: missing display
//! values render as empty text.

use super::backend::{crisp, stroke_line, Path, PathPaint, Surface, TextAlign, TextStyle};
use super::bounds::{
    cell_key, Bounds, ExpandIconBounds, FilterAxis, FilterButtonBounds, HeaderFilterBounds,
};
use super::colors::hover_tint;
use super::policy::{
    background, border_of, branch_of, BorderPolicy, CellBranch, CellPolicy, HeaderAxis,
};
use super::text::fit_text;
use crate::types::{GridMetrics, HoverState, Theme, ViewCell, ViewResponse};

/// Dropdown triangle width
const ARROW_SIZE: f64 = 8.0;
/// Background shift of a hovered header filter cell
const HOVER_TINT: f64 = 0.06;

/// Read-only inputs shared by every cell of one paint pass.
pub struct PaintContext<'a> {
    pub view: &'a ViewResponse,
    pub theme: &'a Theme,
    pub metrics: &'a GridMetrics,
    pub hover: &'a HoverState,
    pub policy: &'a dyn CellPolicy,
    pub banded_rows: bool,
    pub row_filter_active: bool,
    pub column_filter_active: bool,
}

/// One resolved cell: its data and the final drawn rectangle.
#[derive(Debug, Clone, Copy)]
pub struct CellPaint<'a> {
    pub cell: &'a ViewCell,
    pub row: u32,
    pub col: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Interactive sub-elements drawn for a cell, before clipping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellPaintOutput {
    pub icon: Option<ExpandIconBounds>,
    pub filter_button: Option<FilterButtonBounds>,
    pub header_filter: Option<HeaderFilterBounds>,
}

/// Paint one cell and report its interactive bounds.
pub fn paint_cell(
    surface: &mut dyn Surface,
    ctx: &PaintContext<'_>,
    cell: &CellPaint<'_>,
) -> CellPaintOutput {
    if cell.width <= 0.0 || cell.height <= 0.0 {
        return CellPaintOutput::default();
    }
    let branch = branch_of(cell.cell.cell_type);
    let key = cell_key(cell.row, cell.col);
    let whole_cell_hovered = matches!(branch, CellBranch::HeaderFilter(_))
        && ctx.hover.hovered_header_filter_key.as_deref() == Some(key.as_str());
    paint_background(surface, ctx, cell, whole_cell_hovered);

    match branch {
        CellBranch::LabelWithDropdown => {
            paint_filter_label(surface, ctx, cell);
            CellPaintOutput::default()
        }
        CellBranch::FilterControl => CellPaintOutput {
            filter_button: paint_filter_button(surface, ctx, cell),
            ..CellPaintOutput::default()
        },
        CellBranch::HeaderFilter(axis) => CellPaintOutput {
            header_filter: Some(paint_header_filter(surface, ctx, cell, axis)),
            ..CellPaintOutput::default()
        },
        CellBranch::Plain => CellPaintOutput {
            icon: paint_plain(surface, ctx, cell),
            ..CellPaintOutput::default()
        },
    }
}

fn paint_background(
    surface: &mut dyn Surface,
    ctx: &PaintContext<'_>,
    cell: &CellPaint<'_>,
    hovered: bool,
) {
    let (x, y) = (f64::from(cell.x), f64::from(cell.y));
    let (w, h) = (f64::from(cell.width), f64::from(cell.height));
    let style = cell.cell.background_style;
    let theme = ctx.theme;

    let bg = background(style, cell.row, theme, ctx.banded_rows);
    if hovered {
        surface.fill_rect(x, y, w, h, &hover_tint(bg, HOVER_TINT));
    } else {
        surface.fill_rect(x, y, w, h, bg);
    }

    match border_of(style) {
        BorderPolicy::None => {}
        BorderPolicy::BottomOnly => {
            stroke_line(
                surface,
                x,
                y + h - 1.0,
                x + w,
                y + h - 1.0,
                1.0,
                &theme.separator_color,
            );
        }
        BorderPolicy::TopOnly => {
            stroke_line(surface, x, y, x + w, y, 1.0, &theme.separator_color);
        }
        BorderPolicy::Full => {
            surface.stroke_rect(
                crisp(x),
                crisp(y),
                (w - 1.0).max(0.0),
                (h - 1.0).max(0.0),
                &theme.filter_border_color,
                1.0,
            );
        }
    }
}

/// Filter field name with a trailing dropdown look: right-aligned bold text.
fn paint_filter_label(surface: &mut dyn Surface, ctx: &PaintContext<'_>, cell: &CellPaint<'_>) {
    let padding = f64::from(ctx.metrics.cell_padding);
    let right = f64::from(cell.x + cell.width) - padding;
    let left = f64::from(cell.x) + padding;
    let font = ctx.theme.font(true);
    draw_text(
        surface,
        &cell.cell.display_text(),
        left,
        right,
        center_y(cell),
        TextAlign::Right,
        &font,
        &ctx.theme.filter_label_color,
    );
}

fn paint_filter_button(
    surface: &mut dyn Surface,
    ctx: &PaintContext<'_>,
    cell: &CellPaint<'_>,
) -> Option<FilterButtonBounds> {
    let m = ctx.metrics;
    let theme = ctx.theme;
    let button_w = m.min_button_width.max(cell.width.min(m.max_button_width));
    let button_h = (cell.height - 2.0 * m.button_inset).max(0.0);
    let bx = cell.x + m.button_inset;
    let by = cell.y + m.button_inset;

    let field_index = cell
        .cell
        .filter_field_index
        .or_else(|| ctx.view.filter_field_for_row(cell.row));
    let hovered = field_index.is_some() && ctx.hover.hovered_filter_field_index == field_index;
    let bg = if hovered {
        &theme.button_hover_bg
    } else {
        &theme.button_bg
    };

    let (x, y) = (f64::from(bx), f64::from(by));
    let (w, h) = (f64::from(button_w), f64::from(button_h));
    surface.fill_rect(x, y, w, h, bg);
    surface.stroke_rect(
        crisp(x),
        crisp(y),
        (w - 1.0).max(0.0),
        (h - 1.0).max(0.0),
        &theme.button_border,
        1.0,
    );

    let padding = f64::from(m.cell_padding);
    let arrow_x = x + w - padding - ARROW_SIZE;
    let mid = y + h / 2.0;
    surface.draw_path(
        &down_triangle(arrow_x, mid - ARROW_SIZE / 4.0, ARROW_SIZE),
        PathPaint::Fill(&theme.glyph_color),
    );

    let font = ctx.theme.font(false);
    draw_text(
        surface,
        &cell.cell.display_text(),
        x + padding,
        arrow_x - padding,
        mid,
        TextAlign::Left,
        &font,
        &theme.button_text,
    );

    match field_index {
        Some(field_index) => Some(FilterButtonBounds {
            bounds: Bounds::new(bx, by, button_w, button_h),
            field_index,
            row: cell.row,
            col: cell.col,
        }),
        None => {
            log::debug!(
                "filter button at {} has no field; drawn without bounds",
                cell_key(cell.row, cell.col)
            );
            None
        }
    }
}

fn paint_header_filter(
    surface: &mut dyn Surface,
    ctx: &PaintContext<'_>,
    cell: &CellPaint<'_>,
    axis: HeaderAxis,
) -> HeaderFilterBounds {
    let m = ctx.metrics;
    let theme = ctx.theme;
    let (axis, active) = match axis {
        HeaderAxis::Row => (FilterAxis::Row, ctx.row_filter_active),
        HeaderAxis::Column => (FilterAxis::Column, ctx.column_filter_active),
    };
    let key = cell_key(cell.row, cell.col);
    let hovered = ctx.hover.hovered_header_filter_key.as_deref() == Some(key.as_str());

    let padding = f64::from(m.cell_padding);
    let size = f64::from(m.header_icon_size);
    let ix = f64::from(cell.x + cell.width) - padding - size;
    let iy = f64::from(cell.y) + (f64::from(cell.height) - size) / 2.0;

    let bg = if hovered {
        &theme.icon_hover_bg
    } else {
        &theme.button_bg
    };
    surface.fill_rect(ix, iy, size, size, bg);
    surface.stroke_rect(
        crisp(ix),
        crisp(iy),
        size - 1.0,
        size - 1.0,
        &theme.icon_border,
        1.0,
    );
    if active {
        surface.draw_path(
            &funnel(ix, iy, size),
            PathPaint::Fill(&theme.active_filter_color),
        );
    } else {
        let arrow = (size / 2.0).min(ARROW_SIZE);
        let ax = ix + (size - arrow) / 2.0;
        let ay = iy + size / 2.0 - arrow / 4.0;
        surface.draw_path(
            &down_triangle(ax, ay, arrow),
            PathPaint::Fill(&theme.glyph_color),
        );
    }

    let font = theme.font(ctx.policy.is_bold(cell.cell));
    draw_text(
        surface,
        &cell.cell.display_text(),
        f64::from(cell.x) + padding,
        ix - padding,
        center_y(cell),
        TextAlign::Left,
        &font,
        &theme.header_text_color,
    );

    HeaderFilterBounds {
        bounds: Bounds::new(cell.x, cell.y, cell.width, cell.height),
        row: cell.row,
        col: cell.col,
        axis,
        has_active_filter: active,
    }
}

/// Data and label cells: optional expand glyph after the indent, then text.
fn paint_plain(
    surface: &mut dyn Surface,
    ctx: &PaintContext<'_>,
    cell: &CellPaint<'_>,
) -> Option<ExpandIconBounds> {
    let m = ctx.metrics;
    let theme = ctx.theme;
    let data = cell.cell;
    let indent = m.indent_width * f32::from(data.indent_level);
    let mut text_left = cell.x + m.cell_padding + indent;

    let icon = if data.is_expandable {
        let ix = text_left;
        let iy = cell.y + (cell.height - m.icon_size) / 2.0;
        let key = cell_key(cell.row, cell.col);
        let hovered = ctx.hover.hovered_icon_key.as_deref() == Some(key.as_str());
        draw_expand_glyph(
            surface,
            theme,
            f64::from(ix),
            f64::from(iy),
            f64::from(m.icon_size),
            data.is_collapsed,
            hovered,
        );
        text_left += m.icon_size + m.icon_gap;
        Some(ExpandIconBounds {
            bounds: Bounds::new(ix, iy, m.icon_size, m.icon_size),
            row: cell.row,
            col: cell.col,
            is_expanded: !data.is_collapsed,
        })
    } else {
        None
    };

    let font = theme.font(ctx.policy.is_bold(data));
    draw_text(
        surface,
        &data.display_text(),
        f64::from(text_left),
        f64::from(cell.x + cell.width - m.cell_padding),
        center_y(cell),
        ctx.policy.align(data),
        &font,
        ctx.policy.text_color(data, theme),
    );
    icon
}

/// Minus-in-box; a vertical stroke turns it into a plus when collapsed.
fn draw_expand_glyph(
    surface: &mut dyn Surface,
    theme: &Theme,
    x: f64,
    y: f64,
    size: f64,
    collapsed: bool,
    hovered: bool,
) {
    let bg = if hovered {
        &theme.icon_hover_bg
    } else {
        &theme.button_bg
    };
    surface.fill_rect(x, y, size, size, bg);
    surface.stroke_rect(
        crisp(x),
        crisp(y),
        size - 1.0,
        size - 1.0,
        &theme.icon_border,
        1.0,
    );

    let inset = (size / 4.0).floor();
    let mid = y + size / 2.0;
    stroke_line(
        surface,
        x + inset,
        mid,
        x + size - inset,
        mid,
        1.0,
        &theme.glyph_color,
    );
    if collapsed {
        let center = x + size / 2.0;
        stroke_line(
            surface,
            center,
            y + inset,
            center,
            y + size - inset,
            1.0,
            &theme.glyph_color,
        );
    }
}

fn down_triangle(x: f64, y: f64, size: f64) -> Path {
    Path::new()
        .move_to(x, y)
        .line_to(x + size, y)
        .line_to(x + size / 2.0, y + size / 2.0)
        .close()
}

fn funnel(x: f64, y: f64, size: f64) -> Path {
    let inset = size * 0.2;
    let left = x + inset;
    let right = x + size - inset;
    let top = y + inset;
    let bottom = y + size - inset;
    let neck = size * 0.1;
    let center = x + size / 2.0;
    let waist = y + size * 0.5;
    Path::new()
        .move_to(left, top)
        .line_to(right, top)
        .line_to(center + neck, waist)
        .line_to(center + neck, bottom)
        .line_to(center - neck, bottom)
        .line_to(center - neck, waist)
        .close()
}

fn center_y(cell: &CellPaint<'_>) -> f64 {
    f64::from(cell.y) + f64::from(cell.height) / 2.0
}

/// Draw text within `[left, right]`, truncated to fit. Nothing is drawn when
/// the text is empty or the span has no room.
#[allow(clippy::too_many_arguments)]
fn draw_text(
    surface: &mut dyn Surface,
    text: &str,
    left: f64,
    right: f64,
    y: f64,
    align: TextAlign,
    font: &str,
    color: &str,
) {
    let available = right - left;
    if text.is_empty() || available <= 0.0 {
        return;
    }
    let fitted = fit_text(surface, text, available, font);
    let x = match align {
        TextAlign::Left => left,
        TextAlign::Center => left + available / 2.0,
        TextAlign::Right => right,
    };
    let style = TextStyle { font, color, align };
    surface.fill_text(&fitted, x, y, &style);
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
    use crate::render::policy::PivotPolicy;
    use crate::render::recording::{DrawCommand, RecordingSurface};
    use crate::types::{BackgroundStyle, CellKind, CellValue, FilterRow};

    struct Fixture {
        view: ViewResponse,
        theme: Theme,
        metrics: GridMetrics,
        hover: HoverState,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                view: ViewResponse::default(),
                theme: Theme::default(),
                metrics: GridMetrics::default(),
                hover: HoverState::default(),
            }
        }

        fn ctx(&self, row_active: bool) -> PaintContext<'_> {
            PaintContext {
                view: &self.view,
                theme: &self.theme,
                metrics: &self.metrics,
                hover: &self.hover,
                policy: &PivotPolicy,
                banded_rows: false,
                row_filter_active: row_active,
                column_filter_active: false,
            }
        }
    }

    fn at<'a>(cell: &'a ViewCell, width: f32) -> CellPaint<'a> {
        CellPaint {
            cell,
            row: 2,
            col: 1,
            x: 10.0,
            y: 20.0,
            width,
            height: 24.0,
        }
    }

    #[test]
    fn filter_button_width_clamps_to_minimum() {
        let fx = Fixture::new();
        let cell = ViewCell {
            cell_type: CellKind::FilterDropdown,
            filter_field_index: Some(4),
            formatted_value: Some("(All)".to_string()),
            ..ViewCell::default()
        };
        let mut surface = RecordingSurface::new();
        let out = paint_cell(&mut surface, &fx.ctx(false), &at(&cell, 40.0));
        let button = out.filter_button.unwrap();
        assert_eq!(button.field_index, 4);
        assert_eq!(button.bounds, Bounds::new(12.0, 22.0, 80.0, 20.0));
        assert!(out.icon.is_none());
        assert!(out.header_filter.is_none());
    }

    #[test]
    fn filter_button_width_clamps_to_maximum() {
        let fx = Fixture::new();
        let cell = ViewCell {
            cell_type: CellKind::FilterDropdown,
            filter_field_index: Some(0),
            ..ViewCell::default()
        };
        let mut surface = RecordingSurface::new();
        let out = paint_cell(&mut surface, &fx.ctx(false), &at(&cell, 500.0));
        assert_eq!(out.filter_button.unwrap().bounds.width, 200.0);
    }

    #[test]
    fn filter_button_resolves_field_from_filter_row() {
        let mut fx = Fixture::new();
        fx.view.filter_rows.push(FilterRow {
            field_index: 7,
            view_row: 2,
            ..FilterRow::default()
        });
        let cell = ViewCell {
            cell_type: CellKind::FilterDropdown,
            ..ViewCell::default()
        };
        let mut surface = RecordingSurface::new();
        let out = paint_cell(&mut surface, &fx.ctx(false), &at(&cell, 120.0));
        assert_eq!(out.filter_button.unwrap().field_index, 7);

        fx.view.filter_rows.clear();
        let out = paint_cell(&mut surface, &fx.ctx(false), &at(&cell, 120.0));
        assert!(out.filter_button.is_none());
    }

    #[test]
    fn filter_label_is_right_aligned_bold_without_bounds() {
        let fx = Fixture::new();
        let cell = ViewCell {
            cell_type: CellKind::FilterLabel,
            formatted_value: Some("Region".to_string()),
            ..ViewCell::default()
        };
        let mut surface = RecordingSurface::new();
        let out = paint_cell(&mut surface, &fx.ctx(false), &at(&cell, 100.0));
        assert_eq!(out, CellPaintOutput::default());
        let text = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillText {
                    text,
                    font,
                    align,
                    x,
                    ..
                } => Some((text.clone(), font.clone(), *align, *x)),
                _ => None,
            })
            .unwrap();
        assert_eq!(text.0, "Region");
        assert!(text.1.starts_with("bold"));
        assert_eq!(text.2, "right");
        assert_eq!(text.3, 106.0);
    }

    #[test]
    fn header_filter_returns_whole_cell_and_funnel_when_active() {
        let fx = Fixture::new();
        let cell = ViewCell {
            cell_type: CellKind::RowLabelHeader,
            formatted_value: Some("Row Labels".to_string()),
            ..ViewCell::default()
        };
        let mut surface = RecordingSurface::new();
        let out = paint_cell(&mut surface, &fx.ctx(true), &at(&cell, 120.0));
        let header = out.header_filter.unwrap();
        assert_eq!(header.bounds, Bounds::new(10.0, 20.0, 120.0, 24.0));
        assert_eq!(header.axis, FilterAxis::Row);
        assert!(header.has_active_filter);
        let funnel_drawn = surface.commands().iter().any(|c| match c {
            DrawCommand::FillPath { points, color } => {
                points.len() == 6 && *color == fx.theme.active_filter_color
            }
            _ => false,
        });
        assert!(funnel_drawn);
    }

    #[test]
    fn hovered_header_filter_tints_background() {
        let mut fx = Fixture::new();
        fx.hover.hovered_header_filter_key = Some("2-1".to_string());
        let cell = ViewCell {
            cell_type: CellKind::ColumnLabelHeader,
            ..ViewCell::default()
        };
        let mut surface = RecordingSurface::new();
        let out = paint_cell(&mut surface, &fx.ctx(false), &at(&cell, 120.0));
        assert_eq!(out.header_filter.unwrap().axis, FilterAxis::Column);
        match &surface.commands()[0] {
            DrawCommand::FillRect { color, .. } => assert_eq!(color, "#F0F0F0"),
            other => panic!("expected background fill, got {other:?}"),
        }
    }

    #[test]
    fn expand_icon_reports_inverse_of_collapsed() {
        let fx = Fixture::new();
        let cell = ViewCell {
            cell_type: CellKind::RowHeader,
            is_expandable: true,
            is_collapsed: true,
            indent_level: 1,
            formatted_value: Some("East".to_string()),
            ..ViewCell::default()
        };
        let mut surface = RecordingSurface::new();
        let out = paint_cell(&mut surface, &fx.ctx(false), &at(&cell, 150.0));
        let icon = out.icon.unwrap();
        assert!(!icon.is_expanded);
        // x + padding + indent; vertically centered in the 24px row
        assert_eq!(icon.bounds, Bounds::new(30.0, 26.0, 12.0, 12.0));
        // Collapsed glyph draws both strokes of the plus
        let strokes = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokePath { .. }))
            .count();
        assert_eq!(strokes, 2);
    }

    #[test]
    fn numeric_text_right_aligned_and_truncated() {
        let fx = Fixture::new();
        let cell = ViewCell {
            cell_type: CellKind::Data,
            value: CellValue::Number(1_234_567.0),
            ..ViewCell::default()
        };
        let mut surface = RecordingSurface::new();
        // 7px per char: 40px box minus padding leaves 32px
        paint_cell(&mut surface, &fx.ctx(false), &at(&cell, 40.0));
        assert_eq!(surface.texts(), vec!["1..."]);
    }

    #[test]
    fn borders_follow_background_style() {
        let fx = Fixture::new();
        let header = ViewCell {
            background_style: BackgroundStyle::Header,
            ..ViewCell::default()
        };
        let mut surface = RecordingSurface::new();
        paint_cell(&mut surface, &fx.ctx(false), &at(&header, 50.0));
        let line = surface
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::StrokePath { points, .. } => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(line, vec![(10.5, 43.5), (60.5, 43.5)]);

        let filter_row = ViewCell {
            background_style: BackgroundStyle::FilterRow,
            ..ViewCell::default()
        };
        surface.clear();
        paint_cell(&mut surface, &fx.ctx(false), &at(&filter_row, 50.0));
        assert!(surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::StrokeRect { .. })));
    }

    #[test]
    fn zero_sized_cells_draw_nothing() {
        let fx = Fixture::new();
        let cell = ViewCell::default();
        let mut surface = RecordingSurface::new();
        let out = paint_cell(&mut surface, &fx.ctx(false), &at(&cell, 0.0));
        assert_eq!(out, CellPaintOutput::default());
        assert!(surface.commands().is_empty());
    }
}
