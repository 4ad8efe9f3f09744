//! Grid configuration.
//!
//! `GridSettings` is the configuration provider the overlay engine reads from.
//! It deserializes from camelCase JSON so hosts can pass the same object they
//! would hand to a JavaScript grid.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{PaneError, Result};
use crate::overlay::PaneKind;

/// Default column width in pixels
pub const DEFAULT_COLUMN_WIDTH: f64 = 50.0;

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f64 = 23.0;

/// Default width of one row header column in pixels
pub const DEFAULT_ROW_HEADER_WIDTH: f64 = 50.0;

/// Default height of one column header row in pixels
pub const DEFAULT_COLUMN_HEADER_HEIGHT: f64 = 25.0;

/// Default native scrollbar thickness in pixels
pub const DEFAULT_SCROLLBAR_SIZE: f64 = 17.0;

/// Extra rows/cols rendered around the viewport to reduce popping during scroll.
pub const DEFAULT_OVERSCAN: u32 = 1;

/// How leftover horizontal space is distributed over the columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StretchPolicy {
    /// Columns keep their configured widths.
    #[default]
    None,
    /// Only the last column grows.
    Last,
    /// Every column grows proportionally to its configured width.
    All,
}

/// Axis along which overflow outside the grid container is prevented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreventOverflow {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Element that owns the native scrollbars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollContainer {
    /// The page itself scrolls; panes may grow to their natural size.
    Window,
    /// An inner element with a fixed size scrolls.
    #[default]
    Element,
}

/// Named settings consumed by the overlay engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridSettings {
    pub total_rows: u32,
    pub total_columns: u32,
    pub frozen_columns_left: u32,
    pub frozen_rows_top: u32,
    pub frozen_rows_bottom: u32,
    /// Number of row header columns rendered left of column 0
    pub row_header_count: u32,
    /// Number of column header rows rendered above row 0
    pub column_header_count: u32,
    pub row_header_width: f64,
    pub column_header_height: f64,
    pub default_column_width: f64,
    pub default_row_height: f64,
    /// Per-column width overrides
    pub column_widths: HashMap<u32, f64>,
    /// Per-row height overrides
    pub row_heights: HashMap<u32, f64>,
    pub hidden_columns: HashSet<u32>,
    pub hidden_rows: HashSet<u32>,
    #[serde(rename = "stretchH")]
    pub stretch_h: StretchPolicy,
    pub prevent_overflow: PreventOverflow,
    pub scroll_container: ScrollContainer,
    pub overscan: u32,
    pub scrollbar_size: f64,
    /// Extra pixels added when a scroll-to aligns a target beyond the rendered range
    /// to the trailing edge.
    pub trailing_edge_compensation: f64,
    /// Pane kinds to construct. The master pane is always constructed.
    pub panes: Vec<PaneKind>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            total_rows: 0,
            total_columns: 0,
            frozen_columns_left: 0,
            frozen_rows_top: 0,
            frozen_rows_bottom: 0,
            row_header_count: 0,
            column_header_count: 0,
            row_header_width: DEFAULT_ROW_HEADER_WIDTH,
            column_header_height: DEFAULT_COLUMN_HEADER_HEIGHT,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            column_widths: HashMap::new(),
            row_heights: HashMap::new(),
            hidden_columns: HashSet::new(),
            hidden_rows: HashSet::new(),
            stretch_h: StretchPolicy::None,
            prevent_overflow: PreventOverflow::None,
            scroll_container: ScrollContainer::Element,
            overscan: DEFAULT_OVERSCAN,
            scrollbar_size: DEFAULT_SCROLLBAR_SIZE,
            trailing_edge_compensation: 0.0,
            panes: PaneKind::ALL.to_vec(),
        }
    }
}

impl GridSettings {
    /// Create settings for a grid of the given size with every other value defaulted.
    pub fn new(total_rows: u32, total_columns: u32) -> Self {
        Self {
            total_rows,
            total_columns,
            ..Self::default()
        }
    }

    /// Parse settings from JSON and validate them.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a size is negative or non-finite.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file.
    ///
    /// # Errors
    /// Returns `PaneError::Io` if the file cannot be read, otherwise as [`GridSettings::from_json`].
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject sizes the layout cannot place. Counts are never rejected; the
    /// layout clamps them instead.
    ///
    /// # Errors
    /// Returns `PaneError::InvalidSetting` naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        check_size("rowHeaderWidth", self.row_header_width)?;
        check_size("columnHeaderHeight", self.column_header_height)?;
        check_size("defaultColumnWidth", self.default_column_width)?;
        check_size("defaultRowHeight", self.default_row_height)?;
        check_size("scrollbarSize", self.scrollbar_size)?;
        check_size("trailingEdgeCompensation", self.trailing_edge_compensation)?;
        for (col, width) in &self.column_widths {
            check_size(&format!("columnWidths[{col}]"), *width)?;
        }
        for (row, height) in &self.row_heights {
            check_size(&format!("rowHeights[{row}]"), *height)?;
        }
        Ok(())
    }

    /// Frozen left columns, clamped to the column count.
    pub fn fixed_columns_left(&self) -> u32 {
        self.frozen_columns_left.min(self.total_columns)
    }

    /// Frozen top rows, clamped to the row count.
    pub fn fixed_rows_top(&self) -> u32 {
        self.frozen_rows_top.min(self.total_rows)
    }

    /// Frozen bottom rows, clamped so they never overlap the frozen top rows.
    pub fn fixed_rows_bottom(&self) -> u32 {
        self.frozen_rows_bottom
            .min(self.total_rows.saturating_sub(self.fixed_rows_top()))
    }

    /// Total width of the row header strip.
    pub fn row_headers_width(&self) -> f64 {
        f64::from(self.row_header_count) * self.row_header_width
    }

    /// Total height of the column header strip.
    pub fn column_headers_height(&self) -> f64 {
        f64::from(self.column_header_count) * self.column_header_height
    }

    /// True when some columns stay pinned at the left edge.
    pub fn has_left_strip(&self) -> bool {
        self.fixed_columns_left() > 0 || self.row_header_count > 0
    }

    /// True when some rows stay pinned at the top edge.
    pub fn has_top_strip(&self) -> bool {
        self.fixed_rows_top() > 0 || self.column_header_count > 0
    }

    /// True when some rows stay pinned at the bottom edge.
    pub fn has_bottom_strip(&self) -> bool {
        self.fixed_rows_bottom() > 0
    }
}

fn check_size(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PaneError::InvalidSetting(format!(
            "{name} must be a finite, non-negative size (got {value})"
        )))
    }
}
