//! Layout engine for grid geometry and viewport virtualization.
//!
//! This module handles:
//! - Pre-computing row/column positions from sizes (including stretched widths)
//! - Render range calculation for the visible part of each axis
//! - Managing viewport state (logical scroll position, visible size)
//! - Binary search for cell lookup at screen coordinates

mod axis;
mod grid;
pub mod render_calc;
pub mod stretch;
mod viewport;

use serde::{Deserialize, Serialize};

pub use axis::AxisLayout;
pub use grid::{CellRect, GridLayout};
pub use render_calc::RenderRange;
pub use viewport::ViewportState;

/// One of the two grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Axis {
    /// Columns, scrolled by `scroll_left`
    Horizontal,
    /// Rows, scrolled by `scroll_top`
    Vertical,
}

impl Axis {
    /// Both axes, horizontal first.
    pub const BOTH: [Axis; 2] = [Axis::Horizontal, Axis::Vertical];

    /// The other axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}
