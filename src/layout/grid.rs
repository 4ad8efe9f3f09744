//! Pre-computed layout data for a grid.
//!
//! Column widths and row heights are resolved once per settings change (and
//! once per workspace width when columns stretch), so every consumer (render
//! calculators, pane geometry, scroll-to math) reads the same sizes.

use super::axis::AxisLayout;
use super::stretch::stretch_axis;
use super::Axis;
use crate::settings::{GridSettings, StretchPolicy};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Pre-computed layout data for a grid
#[derive(Debug, Clone, Default)]
pub struct GridLayout {
    /// Resolved (possibly stretched) column widths
    pub columns: AxisLayout,
    /// Resolved row heights
    pub rows: AxisLayout,
    /// Column widths before stretching
    base_columns: AxisLayout,
    /// Number of frozen columns at the left edge
    pub frozen_cols: u32,
    /// Number of frozen rows at the top edge
    pub frozen_rows_top: u32,
    /// Number of frozen rows at the bottom edge
    pub frozen_rows_bottom: u32,
    /// Width of the row header strip in pixels (0 if headers not shown)
    pub row_header_width: f64,
    /// Height of the column header strip in pixels (0 if headers not shown)
    pub col_header_height: f64,
    stretch: StretchPolicy,
    /// Workspace width the columns were last stretched for
    stretched_for: Option<f64>,
}

/// Rectangle representing a cell's bounds in grid coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl GridLayout {
    /// Resolve sizes from settings. Columns are not stretched until
    /// [`GridLayout::stretch_columns`] is called with a workspace width.
    pub fn new(settings: &GridSettings) -> Self {
        let base_columns = axis_from_settings(
            settings.total_columns,
            settings.default_column_width,
            &settings.column_widths,
            &settings.hidden_columns,
        );
        let rows = axis_from_settings(
            settings.total_rows,
            settings.default_row_height,
            &settings.row_heights,
            &settings.hidden_rows,
        );

        Self {
            columns: base_columns.clone(),
            rows,
            base_columns,
            frozen_cols: settings.fixed_columns_left(),
            frozen_rows_top: settings.fixed_rows_top(),
            frozen_rows_bottom: settings.fixed_rows_bottom(),
            row_header_width: settings.row_headers_width(),
            col_header_height: settings.column_headers_height(),
            stretch: settings.stretch_h,
            stretched_for: None,
        }
    }

    /// Re-resolve column widths for a workspace of `workspace_width` pixels.
    ///
    /// Returns true when any column width changed. Widths are only recomputed
    /// when the workspace width differs from the previous call.
    pub fn stretch_columns(&mut self, workspace_width: f64) -> bool {
        if self.stretch == StretchPolicy::None {
            return false;
        }
        if self
            .stretched_for
            .is_some_and(|width| (width - workspace_width).abs() <= f64::EPSILON)
        {
            return false;
        }
        self.stretched_for = Some(workspace_width);

        let available = (workspace_width - self.row_header_width).max(0.0);
        let columns = stretch_axis(&self.base_columns, self.stretch, available)
            .unwrap_or_else(|| self.base_columns.clone());
        if columns == self.columns {
            return false;
        }
        self.columns = columns;
        true
    }

    /// Sizes along `axis`.
    pub fn axis(&self, axis: Axis) -> &AxisLayout {
        match axis {
            Axis::Horizontal => &self.columns,
            Axis::Vertical => &self.rows,
        }
    }

    /// Column width at index (0 past the end)
    pub fn column_width(&self, col: u32) -> f64 {
        self.columns.size(col)
    }

    /// Row height at index (0 past the end)
    pub fn row_height(&self, row: u32) -> f64 {
        self.rows.size(row)
    }

    /// Sum of column widths over `[from, to)`
    pub fn sum_column_widths(&self, from: u32, to: u32) -> f64 {
        self.columns.sum(from, to)
    }

    /// Sum of row heights over `[from, to)`
    pub fn sum_row_heights(&self, from: u32, to: u32) -> f64 {
        self.rows.sum(from, to)
    }

    /// Total width of all columns (headers excluded)
    pub fn total_width(&self) -> f64 {
        self.columns.total()
    }

    /// Total height of all rows (headers excluded)
    pub fn total_height(&self) -> f64 {
        self.rows.total()
    }

    /// Width of the frozen columns (0 if none)
    pub fn frozen_cols_width(&self) -> f64 {
        self.columns.sum(0, self.frozen_cols)
    }

    /// Height of the frozen top rows (0 if none)
    pub fn frozen_top_height(&self) -> f64 {
        self.rows.sum(0, self.frozen_rows_top)
    }

    /// Height of the frozen bottom rows (0 if none)
    pub fn frozen_bottom_height(&self) -> f64 {
        let count = self.rows.count();
        self.rows
            .sum(count.saturating_sub(self.frozen_rows_bottom), count)
    }

    /// Header strip extent preceding the first item along `axis`.
    pub fn header_extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.row_header_width,
            Axis::Vertical => self.col_header_height,
        }
    }

    /// Total extent along `axis` including the header strip.
    pub fn content_extent(&self, axis: Axis) -> f64 {
        self.header_extent(axis) + self.axis(axis).total()
    }

    /// Half-open index bounds `[first, end)` of the items that scroll along `axis`.
    pub fn scrollable_bounds(&self, axis: Axis) -> (u32, u32) {
        match axis {
            Axis::Horizontal => (self.frozen_cols, self.columns.count()),
            Axis::Vertical => {
                let end = self.rows.count().saturating_sub(self.frozen_rows_bottom);
                (self.frozen_rows_top.min(end), end)
            }
        }
    }

    /// Pinned extent at the leading edge of `axis` (headers plus frozen items).
    pub fn pinned_leading_extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.row_header_width + self.frozen_cols_width(),
            Axis::Vertical => self.col_header_height + self.frozen_top_height(),
        }
    }

    /// Pinned extent at the trailing edge of `axis`.
    pub fn pinned_trailing_extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => 0.0,
            Axis::Vertical => self.frozen_bottom_height(),
        }
    }

    /// Total size of the scrolling items along `axis`.
    pub fn scrollable_content(&self, axis: Axis) -> f64 {
        let (first, end) = self.scrollable_bounds(axis);
        self.axis(axis).sum(first, end)
    }

    /// Visible extent left for scrolling items in a workspace of `workspace` pixels.
    pub fn scrollable_extent(&self, axis: Axis, workspace: f64) -> f64 {
        (workspace - self.pinned_leading_extent(axis) - self.pinned_trailing_extent(axis))
            .max(0.0)
    }

    /// Largest logical scroll offset along `axis`.
    pub fn max_scroll(&self, axis: Axis, workspace: f64) -> f64 {
        (self.scrollable_content(axis) - self.scrollable_extent(axis, workspace)).max(0.0)
    }

    /// Cell bounds in grid coordinates (headers excluded)
    pub fn cell_rect(&self, row: u32, col: u32) -> CellRect {
        CellRect {
            x: self.columns.position(col),
            y: self.rows.position(row),
            width: self.columns.size(col),
            height: self.rows.size(row),
        }
    }

    /// Find the item under a screen coordinate along `axis`.
    ///
    /// `screen` is measured from the leading edge of the grid, `scroll` is the
    /// logical scroll offset and `workspace` the visible extent. Returns `None`
    /// over the header strip or past the content.
    pub fn index_at_screen(
        &self,
        axis: Axis,
        screen: f64,
        scroll: f64,
        workspace: f64,
    ) -> Option<u32> {
        let header = self.header_extent(axis);
        if screen < header {
            return None;
        }
        let layout = self.axis(axis);
        let (first, end) = self.scrollable_bounds(axis);
        let local = screen - header;
        let leading = layout.sum(0, first);

        if local < leading {
            return layout.index_at(local);
        }

        let trailing = self.pinned_trailing_extent(axis);
        if trailing > 0.0 {
            let pinned_top = (workspace - trailing).min(header + leading + layout.sum(first, end));
            if screen >= pinned_top {
                let index = layout.index_at(layout.position(end) + (screen - pinned_top))?;
                return (index >= end && screen < pinned_top + trailing).then_some(index);
            }
        }

        let position = local + scroll;
        if position >= layout.position(end) {
            return None;
        }
        layout.index_at(position)
    }

    /// Find the `(row, col)` under a screen point, honoring frozen regions.
    pub fn cell_at_screen(
        &self,
        x: f64,
        y: f64,
        scroll: (f64, f64),
        workspace: (f64, f64),
    ) -> Option<(u32, u32)> {
        let col = self.index_at_screen(Axis::Horizontal, x, scroll.0, workspace.0)?;
        let row = self.index_at_screen(Axis::Vertical, y, scroll.1, workspace.1)?;
        Some((row, col))
    }
}

/// Sparse axis from the default size plus custom sizes; hidden items win over custom sizes.
fn axis_from_settings(
    count: u32,
    default_size: f64,
    sizes: &HashMap<u32, f64>,
    hidden: &HashSet<u32>,
) -> AxisLayout {
    let overrides: BTreeMap<u32, f64> = sizes
        .iter()
        .map(|(index, size)| (*index, *size))
        .chain(hidden.iter().map(|index| (*index, 0.0)))
        .collect();
    AxisLayout::new(count, default_size, overrides)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn settings(rows: u32, cols: u32) -> GridSettings {
        GridSettings::new(rows, cols)
    }

    #[test]
    fn test_basic_layout() {
        let layout = GridLayout::new(&settings(10, 5));
        assert_eq!(layout.total_width(), 5.0 * crate::settings::DEFAULT_COLUMN_WIDTH);
        assert_eq!(layout.total_height(), 10.0 * crate::settings::DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_overrides_and_hidden() {
        let mut s = settings(4, 4);
        s.column_widths.insert(1, 120.0);
        s.hidden_columns.insert(2);
        s.row_heights.insert(0, 40.0);
        let layout = GridLayout::new(&s);

        assert_eq!(layout.column_width(1), 120.0);
        assert_eq!(layout.column_width(2), 0.0);
        assert_eq!(layout.row_height(0), 40.0);
        assert_eq!(layout.sum_column_widths(0, 4), 50.0 + 120.0 + 0.0 + 50.0);
    }

    #[test]
    fn test_cell_rect() {
        let layout = GridLayout::new(&settings(10, 5));
        let rect = layout.cell_rect(1, 2);
        assert_eq!(rect.x, 100.0);
        assert_eq!(rect.y, 23.0);
        assert_eq!(rect.width, 50.0);
        assert_eq!(rect.height, 23.0);
    }

    #[test]
    fn test_frozen_extents() {
        let mut s = settings(20, 10);
        s.frozen_columns_left = 2;
        s.frozen_rows_top = 1;
        s.frozen_rows_bottom = 2;
        s.row_header_count = 1;
        let layout = GridLayout::new(&s);

        assert_eq!(layout.frozen_cols_width(), 100.0);
        assert_eq!(layout.pinned_leading_extent(Axis::Horizontal), 150.0);
        assert_eq!(layout.frozen_bottom_height(), 46.0);
        assert_eq!(layout.scrollable_bounds(Axis::Vertical), (1, 18));
        assert_eq!(layout.scrollable_bounds(Axis::Horizontal), (2, 10));
    }

    #[test]
    fn test_max_scroll() {
        let mut s = settings(1, 10);
        s.frozen_columns_left = 2;
        let layout = GridLayout::new(&s);
        // 400px of scrolling columns in a 120px scrolling area
        assert_eq!(layout.max_scroll(Axis::Horizontal, 220.0), 280.0);
        assert_eq!(layout.max_scroll(Axis::Horizontal, 10_000.0), 0.0);
    }

    #[test]
    fn test_stretch_columns_uses_workspace_width() {
        let mut s = settings(1, 3);
        s.stretch_h = StretchPolicy::Last;
        s.row_header_count = 1;
        let mut layout = GridLayout::new(&s);

        assert!(layout.stretch_columns(450.0));
        assert_eq!(layout.column_width(2), 300.0);
        assert!(!layout.stretch_columns(450.0));
        assert_eq!(layout.total_width() + layout.row_header_width, 450.0);

        // Shrinking below the content width restores the configured widths
        assert!(layout.stretch_columns(100.0));
        assert_eq!(layout.column_width(2), 50.0);
    }

    #[test]
    fn test_stretch_skips_hidden_columns() {
        let mut s = settings(1, 3);
        s.stretch_h = StretchPolicy::Last;
        s.hidden_columns.insert(2);
        let mut layout = GridLayout::new(&s);

        assert!(layout.stretch_columns(400.0));
        assert_eq!(layout.column_width(2), 0.0);
        assert_eq!(layout.column_width(1), 350.0);
        assert_eq!(layout.total_width(), 400.0);
    }

    #[test]
    fn test_huge_grid_is_sparse() {
        let mut s = settings(u32::MAX, u32::MAX);
        s.hidden_rows.insert(7);
        s.row_heights.insert(7, 99.0);
        s.column_widths.insert(u32::MAX - 1, 80.0);
        let layout = GridLayout::new(&s);

        assert_eq!(layout.rows.overrides().len(), 1);
        assert_eq!(layout.row_height(7), 0.0);
        assert_eq!(layout.row_height(u32::MAX - 1), 23.0);
        assert_eq!(layout.total_height(), f64::from(u32::MAX - 1) * 23.0);
        assert_eq!(layout.column_width(u32::MAX - 1), 80.0);
        assert_eq!(layout.columns.index_at(f64::MAX), Some(u32::MAX - 1));
    }

    #[test]
    fn test_index_at_screen_with_frozen_columns() {
        let mut s = settings(1, 10);
        s.frozen_columns_left = 2;
        let layout = GridLayout::new(&s);

        assert_eq!(layout.index_at_screen(Axis::Horizontal, 60.0, 150.0, 220.0), Some(1));
        // Screen x 100 is the first scrolling column slot; scrolled by 150px that is column 5
        assert_eq!(layout.index_at_screen(Axis::Horizontal, 100.0, 150.0, 220.0), Some(5));
    }

    #[test]
    fn test_index_at_screen_bottom_rows() {
        let mut s = settings(100, 1);
        s.frozen_rows_bottom = 2;
        let layout = GridLayout::new(&s);

        // Workspace 230px: bottom strip occupies 184..230
        assert_eq!(layout.index_at_screen(Axis::Vertical, 190.0, 500.0, 230.0), Some(98));
        assert_eq!(layout.index_at_screen(Axis::Vertical, 220.0, 500.0, 230.0), Some(99));
        assert_eq!(layout.index_at_screen(Axis::Vertical, 0.0, 46.0, 230.0), Some(2));
    }

    #[test]
    fn test_cell_at_screen() {
        let mut s = settings(100, 10);
        s.frozen_columns_left = 1;
        s.frozen_rows_top = 1;
        let layout = GridLayout::new(&s);

        assert_eq!(layout.cell_at_screen(10.0, 10.0, (500.0, 500.0), (300.0, 200.0)), Some((0, 0)));
        // Scrolled by one column and two rows
        assert_eq!(layout.cell_at_screen(60.0, 30.0, (50.0, 46.0), (300.0, 200.0)), Some((3, 2)));
    }

    #[test]
    fn test_index_at_screen_header_is_none() {
        let mut s = settings(10, 10);
        s.column_header_count = 1;
        let layout = GridLayout::new(&s);
        assert_eq!(layout.index_at_screen(Axis::Vertical, 5.0, 0.0, 200.0), None);
        assert_eq!(layout.index_at_screen(Axis::Vertical, 30.0, 0.0, 200.0), Some(0));
    }
}
