//! Sizes and positions along one axis.
//!
//! Most items share a default size. Only the items that differ (custom sizes,
//! hidden items) are stored, sorted by index, together with the running sum of
//! their differences from the default. Memory depends on the number of
//! overrides, never on the item count; positions cost O(log k) and hit
//! testing O(log n * log k).

use super::render_calc::{clamp_offset, RenderRange};

/// Sizes and cumulative positions of the rows or the columns of a grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisLayout {
    count: u32,
    default_size: f64,
    /// Items whose size differs from the default, sorted by index
    overrides: Vec<(u32, f64)>,
    /// `corrections[k]` = sum of `size - default_size` over `overrides[..k]`
    corrections: Vec<f64>,
}

impl AxisLayout {
    /// Build an axis of `count` items of `default_size`, with per-item
    /// overrides (hidden items are overrides of size 0).
    ///
    /// Overrides past the end are ignored; for a repeated index the first one wins.
    pub fn new(
        count: u32,
        default_size: f64,
        overrides: impl IntoIterator<Item = (u32, f64)>,
    ) -> Self {
        let mut overrides: Vec<(u32, f64)> = overrides
            .into_iter()
            .filter(|(index, _)| *index < count)
            .collect();
        overrides.sort_by_key(|(index, _)| *index);
        overrides.dedup_by_key(|(index, _)| *index);
        overrides.retain(|(_, size)| (size - default_size).abs() > 0.0);

        let mut corrections = Vec::with_capacity(overrides.len() + 1);
        let mut running = 0.0;
        corrections.push(running);
        for (_, size) in &overrides {
            running += size - default_size;
            corrections.push(running);
        }

        Self {
            count,
            default_size,
            overrides,
            corrections,
        }
    }

    /// Build an axis from explicit item sizes.
    pub fn from_sizes(sizes: &[f64]) -> Self {
        let count = u32::try_from(sizes.len()).unwrap_or(u32::MAX);
        let default_size = sizes.first().copied().unwrap_or(0.0);
        Self::new(
            count,
            default_size,
            (0..count).zip(sizes.iter().copied()),
        )
    }

    /// Number of items on the axis.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Size shared by every item without an override.
    pub fn default_size(&self) -> f64 {
        self.default_size
    }

    /// Items whose size differs from the default, sorted by index.
    pub fn overrides(&self) -> &[(u32, f64)] {
        &self.overrides
    }

    /// Size of the item at `index` (0 past the end).
    pub fn size(&self, index: u32) -> f64 {
        if index >= self.count {
            return 0.0;
        }
        match self.overrides.get(self.overrides_before(index)) {
            Some((at, size)) if *at == index => *size,
            _ => self.default_size,
        }
    }

    /// Leading edge of the item at `index`. Indices past the end return the total.
    pub fn position(&self, index: u32) -> f64 {
        let index = index.min(self.count);
        let correction = self
            .corrections
            .get(self.overrides_before(index))
            .copied()
            .unwrap_or(0.0);
        f64::from(index) * self.default_size + correction
    }

    /// Sum of sizes over the half-open range `[from, to)`.
    pub fn sum(&self, from: u32, to: u32) -> f64 {
        if to <= from {
            return 0.0;
        }
        self.position(to) - self.position(from)
    }

    /// Total extent of the axis.
    pub fn total(&self) -> f64 {
        self.position(self.count)
    }

    /// Find the item containing `position` (binary search).
    ///
    /// Positions before the axis map to the first item and positions at or past
    /// the end map to the last one. Zero-sized items are never returned when a
    /// sized item starts at the same edge.
    pub fn index_at(&self, position: f64) -> Option<u32> {
        let last = self.count.checked_sub(1)?;
        Some(self.first_ending_after(position).min(last))
    }

    /// Render range over the items `[first, end)` of this axis for a viewport
    /// of `extent` pixels scrolled by `offset` pixels.
    ///
    /// Produces the same range as [`super::render_calc::compute`] run over the
    /// same items, using binary search instead of a linear walk. The returned
    /// indices and start position are in whole-axis coordinates.
    pub fn render_range(
        &self,
        first: u32,
        end: u32,
        extent: f64,
        offset: f64,
        overscan: u32,
    ) -> Option<RenderRange> {
        let end = end.min(self.count);
        if end <= first {
            return None;
        }
        let last = end - 1;
        let base = self.position(first);
        let extent = extent.max(0.0);
        let offset = clamp_offset(offset, self.sum(first, end), extent);

        let mut visible_start = self.first_ending_after(base + offset).max(first);
        visible_start = visible_start.min(last);
        let far_edge = base + offset + extent;
        let mut visible_end = visible_start;
        if self.position(visible_start + 1) < far_edge {
            visible_end = self.first_ending_at_or_after(far_edge).min(last);
        }

        let start = visible_start.saturating_sub(overscan).max(first);
        let end = visible_end.saturating_add(overscan).min(last);
        Some(RenderRange {
            start,
            end,
            start_position: self.position(start),
        })
    }

    /// Smallest index whose trailing edge is strictly greater than `position`.
    fn first_ending_after(&self, position: f64) -> u32 {
        self.first_trailing_edge(|edge| edge > position)
    }

    /// Smallest index whose trailing edge is at or past `position`.
    fn first_ending_at_or_after(&self, position: f64) -> u32 {
        self.first_trailing_edge(|edge| edge >= position)
    }

    /// Smallest index whose trailing edge satisfies `reached` (`count` if none).
    /// Trailing edges never decrease, so `reached` flips at most once.
    fn first_trailing_edge(&self, reached: impl Fn(f64) -> bool) -> u32 {
        let (mut low, mut high) = (0, self.count);
        while low < high {
            let mid = low + (high - low) / 2;
            if reached(self.position(mid + 1)) {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        low
    }

    fn overrides_before(&self, index: u32) -> usize {
        self.overrides.partition_point(|(at, _)| *at < index)
    }
}
