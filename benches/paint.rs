//! Benchmarks for the paint pass and hit testing.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation, clippy::indexing_slicing)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pivotgrid::hit_test::hit_test;
use pivotgrid::render::{GridRenderer, RecordingSurface};
use pivotgrid::{CellKind, CellValue, RenderOptions, Theme, ViewCell, ViewResponse, ViewRow};

/// Pivot-shaped view: one header row, one label column, spans every 10 rows.
fn synthetic_view(rows: usize, cols: usize) -> ViewResponse {
    let mut view = ViewResponse {
        version: 1,
        column_header_row_count: 1,
        row_label_col_count: 1,
        ..ViewResponse::default()
    };
    for r in 0..rows {
        let cells = (0..cols)
            .map(|c| match (r, c) {
                (0, _) => ViewCell {
                    cell_type: CellKind::ColumnHeader,
                    formatted_value: Some(format!("Col {c}")),
                    ..ViewCell::default()
                },
                (_, 0) => ViewCell {
                    cell_type: CellKind::RowHeader,
                    formatted_value: Some(format!("Row {r}")),
                    is_expandable: r % 10 == 1,
                    row_span: if r % 10 == 1 { 3 } else { 1 },
                    ..ViewCell::default()
                },
                _ => ViewCell {
                    cell_type: CellKind::Data,
                    value: CellValue::Number((r * c) as f64),
                    ..ViewCell::default()
                },
            })
            .collect();
        view.rows.push(ViewRow { cells });
    }
    view.mark_span_coverage();
    view
}

fn bench_paint(c: &mut Criterion) {
    let mut group = c.benchmark_group("paint");
    let theme = Theme::default();
    for size in [100usize, 1_000, 10_000] {
        let view = synthetic_view(size, 50);
        let options = RenderOptions {
            viewport_width: 1920.0,
            viewport_height: 1080.0,
            scroll_top: (size as f32) * 12.0,
            ..RenderOptions::default()
        };
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &view, |b, view| {
            let renderer = GridRenderer::default();
            let mut surface = RecordingSurface::new();
            b.iter(|| {
                surface.clear();
                renderer.paint(&mut surface, Some(black_box(view)), &options, &theme)
            });
        });
    }
    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let view = synthetic_view(1_000, 50);
    let renderer = GridRenderer::default();
    let mut surface = RecordingSurface::new();
    let options = RenderOptions::default();
    let result = renderer.paint(&mut surface, Some(&view), &options, &Theme::default());

    c.bench_function("hit_test_grid", |b| {
        b.iter(|| {
            for y in (0..600).step_by(13) {
                for x in (0..800).step_by(17) {
                    black_box(hit_test(x as f32, y as f32, &result, &view));
                }
            }
        });
    });
}

criterion_group!(benches, bench_paint, bench_hit_test);
criterion_main!(benches);
