//! Benchmarks for render range calculation and overlay refresh.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use paneview::layout::render_calc::compute;
use paneview::layout::AxisLayout;
use paneview::surface::MemorySurfaceProvider;
use paneview::{GridSettings, NativeScroll, Overlays};

fn row_sizes(count: u32) -> Vec<f64> {
    (0..count).map(|i| f64::from(20 + i % 7)).collect()
}

/// Linear walk against binary search on growing axes
fn bench_render_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_range");

    for count in [1_000_u32, 100_000, 1_000_000] {
        let sizes = row_sizes(count);
        let layout = AxisLayout::from_sizes(&sizes);
        let offset = layout.total() * 0.75;
        group.throughput(Throughput::Elements(u64::from(count)));

        group.bench_with_input(BenchmarkId::new("linear", count), &count, |b, &count| {
            b.iter(|| {
                compute(
                    black_box(count),
                    |i| sizes[i as usize],
                    black_box(600.0),
                    black_box(offset),
                    1,
                )
            })
        });
        group.bench_with_input(BenchmarkId::new("binary_search", count), &count, |b, &count| {
            b.iter(|| layout.render_range(0, black_box(count), black_box(600.0), black_box(offset), 1))
        });
    }

    group.finish();
}

/// Building an axis from a million explicit sizes
fn bench_axis_layout(c: &mut Criterion) {
    let sizes = row_sizes(1_000_000);
    c.bench_function("axis_layout_1m", |b| {
        b.iter(|| AxisLayout::from_sizes(black_box(&sizes)))
    });
}

/// Full refresh of every pane after a scroll on a large grid
fn bench_overlay_scroll(c: &mut Criterion) {
    let mut settings = GridSettings::new(1_000_000, 200);
    settings.frozen_columns_left = 2;
    settings.frozen_rows_top = 1;
    settings.frozen_rows_bottom = 1;
    settings.row_header_count = 1;
    settings.column_header_count = 1;

    let mut provider = MemorySurfaceProvider::new();
    let mut overlays = Overlays::new(settings, &mut provider).expect("Failed to build overlays");
    overlays.on_resize(1280.0, 800.0).expect("Failed to resize");

    let mut top = 0.0;
    c.bench_function("overlay_scroll_1m_rows", |b| {
        b.iter(|| {
            top = (top + 97.0) % 1_000_000.0;
            overlays
                .on_scroll(black_box(NativeScroll { left: 40.0, top }))
                .expect("Failed to scroll")
        })
    });
}

criterion_group!(
    benches,
    bench_render_range,
    bench_axis_layout,
    bench_overlay_scroll
);
criterion_main!(benches);
