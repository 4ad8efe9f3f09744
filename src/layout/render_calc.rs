//! Render range calculation.
//!
//! Given an item count, a sizing function, the visible extent and the scroll
//! offset, decide which items have to be materialized and where the first of
//! them starts.

use serde::Serialize;

/// Inclusive index range to materialize along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRange {
    /// First index to render (inclusive)
    pub start: u32,
    /// Last index to render (inclusive)
    pub end: u32,
    /// Pixel position of `start`, measured from the first item
    pub start_position: f64,
}

impl RenderRange {
    /// Number of items in the range. Never 0; an empty axis has no range at all.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Check whether `index` lies inside the range.
    pub fn contains(&self, index: u32) -> bool {
        index >= self.start && index <= self.end
    }

    /// Shift a range computed over a sub-sequence of items back into the
    /// coordinates of the whole axis.
    pub fn offset_by(self, first_index: u32, base_position: f64) -> Self {
        Self {
            start: self.start + first_index,
            end: self.end + first_index,
            start_position: self.start_position + base_position,
        }
    }
}

/// Clamp a scroll offset into `[0, content - extent]`. NaN and negative offsets become 0.
pub fn clamp_offset(offset: f64, content: f64, extent: f64) -> f64 {
    let max = (content - extent).max(0.0);
    if offset.is_finite() {
        offset.clamp(0.0, max)
    } else if offset.is_infinite() && offset.is_sign_positive() {
        max
    } else {
        0.0
    }
}

/// Compute the render range by walking the items from index 0.
///
/// Returns `None` when `total` is 0. Offsets past the content clamp to the last
/// full page.
pub fn compute<F>(
    total: u32,
    size_of: F,
    viewport_extent: f64,
    scroll_offset: f64,
    overscan: u32,
) -> Option<RenderRange>
where
    F: Fn(u32) -> f64,
{
    if total == 0 {
        return None;
    }
    let extent = viewport_extent.max(0.0);
    let content: f64 = (0..total).map(&size_of).sum();
    let offset = clamp_offset(scroll_offset, content, extent);

    // First item whose trailing edge lies past the offset
    let mut first = 0;
    let mut first_position = 0.0;
    while first < total - 1 {
        let size = size_of(first);
        if first_position + size > offset {
            break;
        }
        first_position += size;
        first += 1;
    }

    // Last item whose leading edge lies before the far edge of the viewport
    let far_edge = offset + extent;
    let mut last = first;
    let mut position = first_position + size_of(first);
    while last < total - 1 && position < far_edge {
        last += 1;
        position += size_of(last);
    }

    let start = first.saturating_sub(overscan);
    let start_position = first_position - (start..first).map(&size_of).sum::<f64>();
    let end = last.saturating_add(overscan).min(total - 1);

    Some(RenderRange {
        start,
        end,
        start_position,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_axis_has_no_range() {
        assert_eq!(compute(0, |_| 20.0, 100.0, 0.0, 1), None);
    }

    #[test]
    fn test_uniform_rows_at_top() {
        let range = compute(100, |_| 20.0, 100.0, 0.0, 0).unwrap();
        assert_eq!(range.start, 0);
        assert_eq!(range.end, 4);
        assert_eq!(range.start_position, 0.0);
    }

    #[test]
    fn test_partial_row_is_included() {
        let range = compute(100, |_| 20.0, 100.0, 10.0, 0).unwrap();
        assert_eq!(range.start, 0);
        assert_eq!(range.end, 5);
    }

    #[test]
    fn test_overscan_extends_both_sides() {
        let range = compute(100, |_| 20.0, 100.0, 200.0, 2).unwrap();
        assert_eq!(range.start, 8);
        assert_eq!(range.end, 16);
        assert_eq!(range.start_position, 160.0);
    }

    #[test]
    fn test_offset_past_content_clamps_to_last_page() {
        let range = compute(10, |_| 20.0, 100.0, 10_000.0, 0).unwrap();
        assert_eq!(range.start, 5);
        assert_eq!(range.end, 9);
        assert_eq!(range.start_position, 100.0);
    }

    #[test]
    fn test_non_uniform_sizes() {
        let sizes = [10.0, 50.0, 5.0, 5.0, 100.0, 20.0];
        let range = compute(6, |i| sizes[i as usize], 30.0, 55.0, 0).unwrap();
        // 55 lies inside item 1 (10..60); 85 lies inside item 4 (70..170)
        assert_eq!(range.start, 1);
        assert_eq!(range.end, 4);
        assert_eq!(range.start_position, 10.0);
    }

    #[test]
    fn test_content_smaller_than_viewport() {
        let range = compute(3, |_| 20.0, 500.0, 40.0, 0).unwrap();
        assert_eq!(range.start, 0);
        assert_eq!(range.end, 2);
    }

    #[test]
    fn test_offset_by_maps_back_to_axis() {
        let range = RenderRange {
            start: 0,
            end: 3,
            start_position: 0.0,
        }
        .offset_by(2, 100.0);
        assert_eq!(range.start, 2);
        assert_eq!(range.end, 5);
        assert_eq!(range.start_position, 100.0);
        assert_eq!(range.len(), 4);
        assert!(range.contains(5));
        assert!(!range.contains(1));
    }

    #[test]
    fn test_nan_offset_is_treated_as_zero() {
        let range = compute(10, |_| 20.0, 40.0, f64::NAN, 0).unwrap();
        assert_eq!(range.start, 0);
    }
}
