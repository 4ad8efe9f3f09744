//! Render range tests
//!
//! Properties of the render range over irregular item sizes: every visible
//! item is covered, ranges move forward with the scroll offset, and the
//! binary-search path agrees with the linear walk.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use paneview::layout::render_calc::compute;
use paneview::layout::AxisLayout;
use test_case::test_case;

/// Whole-pixel sizes between 15 and 39, with every 17th item hidden.
fn irregular_sizes(count: u32) -> Vec<f64> {
    (0..count)
        .map(|i| {
            if i % 17 == 16 {
                0.0
            } else {
                f64::from(15 + (i * 7) % 25)
            }
        })
        .collect()
}

fn offsets(content: f64, extent: f64) -> Vec<f64> {
    let max = (content - extent).max(0.0);
    (0..=40).map(|step| (max * f64::from(step) / 40.0).floor()).collect()
}

// =============================================================================
// COVERAGE
// =============================================================================

#[test_case(200, 120.0, 0 ; "no overscan")]
#[test_case(200, 120.0, 2 ; "overscan two")]
#[test_case(500, 37.5, 1 ; "fractional extent")]
#[test_case(3, 400.0, 1 ; "extent larger than content")]
fn test_every_visible_item_is_rendered(count: u32, extent: f64, overscan: u32) {
    let sizes = irregular_sizes(count);
    let layout = AxisLayout::from_sizes(&sizes);

    for offset in offsets(layout.total(), extent) {
        let range = layout
            .render_range(0, count, extent, offset, overscan)
            .unwrap();
        for index in 0..count {
            let leading = layout.position(index);
            let size = sizes[index as usize];
            let visible = size > 0.0 && leading + size > offset && leading < offset + extent;
            if visible {
                assert!(
                    range.contains(index),
                    "item {index} visible at offset {offset} but range is {range:?}"
                );
            }
        }
        assert_eq!(range.start_position, layout.position(range.start));
    }
}

#[test]
fn test_range_moves_forward_with_offset() {
    let layout = AxisLayout::from_sizes(&irregular_sizes(300));
    let mut previous = layout.render_range(0, 300, 150.0, 0.0, 1).unwrap();

    for offset in offsets(layout.total(), 150.0).into_iter().skip(1) {
        let range = layout.render_range(0, 300, 150.0, offset, 1).unwrap();
        assert!(range.start >= previous.start);
        assert!(range.end >= previous.end);
        previous = range;
    }
}

#[test]
fn test_overscan_never_leaves_bounds() {
    let layout = AxisLayout::from_sizes(&irregular_sizes(50));

    let top = layout.render_range(5, 45, 100.0, 0.0, 10).unwrap();
    assert_eq!(top.start, 5);

    let bottom = layout
        .render_range(5, 45, 100.0, layout.total(), 10)
        .unwrap();
    assert_eq!(bottom.end, 44);
}

// =============================================================================
// LINEAR AND BINARY SEARCH AGREE
// =============================================================================

#[test_case(1, 0 ; "single item")]
#[test_case(40, 0 ; "short axis")]
#[test_case(1_000, 1 ; "long axis")]
#[test_case(1_000, 3 ; "long axis wide overscan")]
fn test_binary_search_matches_linear_walk(count: u32, overscan: u32) {
    let sizes = irregular_sizes(count);
    let layout = AxisLayout::from_sizes(&sizes);
    let extent = 230.0;

    for offset in offsets(layout.total(), extent) {
        let linear = compute(count, |i| sizes[i as usize], extent, offset, overscan);
        let binary = layout.render_range(0, count, extent, offset, overscan);
        assert_eq!(linear, binary, "offset {offset}");
    }
}

#[test]
fn test_sub_range_matches_linear_walk_shifted() {
    let sizes = irregular_sizes(120);
    let layout = AxisLayout::from_sizes(&sizes);
    let (first, end) = (4, 110);
    let tail = &sizes[first as usize..end as usize];

    for offset in [0.0, 333.0, 1_000.0, 5_000.0] {
        let linear = compute(end - first, |i| tail[i as usize], 180.0, offset, 1)
            .map(|range| range.offset_by(first, layout.position(first)));
        let binary = layout.render_range(first, end, 180.0, offset, 1);
        assert_eq!(linear, binary, "offset {offset}");
    }
}

// =============================================================================
// EMPTY AXES
// =============================================================================

#[test]
fn test_no_range_iff_no_items() {
    assert_eq!(compute(0, |_| 20.0, 100.0, 0.0, 1), None);
    assert!(compute(1, |_| 0.0, 100.0, 0.0, 1).is_some());

    let layout = AxisLayout::from_sizes(&irregular_sizes(10));
    assert_eq!(layout.render_range(10, 10, 100.0, 0.0, 1), None);
    assert_eq!(layout.render_range(3, 3, 100.0, 0.0, 1), None);
    assert!(layout.render_range(9, 10, 100.0, 0.0, 1).is_some());
}
