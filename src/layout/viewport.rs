//! Viewport state: the single logical scroll position and the visible size.

use serde::Serialize;

use super::{Axis, GridLayout};

/// Viewport state - the visible area of the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    /// Visible width in pixels (scrollbars included)
    pub visible_width: f64,
    /// Visible height in pixels (scrollbars included)
    pub visible_height: f64,
    /// Logical vertical scroll offset within the scrolling rows
    pub scroll_top: f64,
    /// Logical horizontal scroll offset within the scrolling columns
    pub scroll_left: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportState {
    /// Create a new viewport with default values
    pub fn new() -> Self {
        Self {
            visible_width: 800.0,
            visible_height: 600.0,
            scroll_top: 0.0,
            scroll_left: 0.0,
        }
    }

    /// Create a viewport of the given visible size, scrolled to the origin
    pub fn with_size(width: f64, height: f64) -> Self {
        let mut viewport = Self::new();
        viewport.resize(width, height);
        viewport
    }

    /// Visible extent along `axis`.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.visible_width,
            Axis::Vertical => self.visible_height,
        }
    }

    /// Logical scroll offset along `axis`.
    pub fn scroll(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.scroll_left,
            Axis::Vertical => self.scroll_top,
        }
    }

    /// Set the logical scroll offset along `axis` without clamping.
    pub fn set_scroll_axis(&mut self, axis: Axis, offset: f64) {
        match axis {
            Axis::Horizontal => self.scroll_left = offset,
            Axis::Vertical => self.scroll_top = offset,
        }
    }

    /// Clamp scroll position to the valid range.
    ///
    /// `workspace` gives the visible extent along each axis after scrollbar
    /// allowances, as `(width, height)`.
    pub fn clamp_scroll(&mut self, layout: &GridLayout, workspace: (f64, f64)) {
        let max_left = layout.max_scroll(Axis::Horizontal, workspace.0);
        let max_top = layout.max_scroll(Axis::Vertical, workspace.1);
        self.scroll_left = clamp(self.scroll_left, max_left);
        self.scroll_top = clamp(self.scroll_top, max_top);
    }

    /// Scroll by delta amounts and return the applied delta
    pub fn scroll_by(
        &mut self,
        delta_x: f64,
        delta_y: f64,
        layout: &GridLayout,
        workspace: (f64, f64),
    ) -> (f64, f64) {
        let (old_x, old_y) = (self.scroll_left, self.scroll_top);
        self.scroll_left += delta_x;
        self.scroll_top += delta_y;
        self.clamp_scroll(layout, workspace);
        (self.scroll_left - old_x, self.scroll_top - old_y)
    }

    /// Set absolute scroll position
    pub fn set_scroll(&mut self, x: f64, y: f64, layout: &GridLayout, workspace: (f64, f64)) {
        self.scroll_left = x;
        self.scroll_top = y;
        self.clamp_scroll(layout, workspace);
    }

    /// Resize the viewport. Negative or non-finite sizes become 0.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.visible_width = sanitize(width);
        self.visible_height = sanitize(height);
    }

    /// Screen position of the leading edge of item `index` along `axis`.
    ///
    /// Frozen and header-adjacent items sit at a fixed position; scrolling
    /// items are shifted by the scroll offset.
    pub fn screen_position(&self, axis: Axis, index: u32, layout: &GridLayout) -> f64 {
        let header = layout.header_extent(axis);
        let sizes = layout.axis(axis);
        let (first, end) = layout.scrollable_bounds(axis);
        if index < first {
            header + sizes.position(index)
        } else if index >= end && end < sizes.count() {
            // Trailing frozen items are pinned to the far edge of the workspace
            let pinned = layout.pinned_trailing_extent(axis);
            let pinned_top = (self.extent(axis) - pinned)
                .min(header + sizes.sum(0, first) + sizes.sum(first, end));
            pinned_top + sizes.sum(end, index)
        } else {
            header + sizes.position(index) - self.scroll(axis)
        }
    }
}

fn clamp(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

fn sanitize(size: f64) -> f64 {
    if size.is_finite() {
        size.max(0.0)
    } else {
        0.0
    }
}
