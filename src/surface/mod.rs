//! Render surface abstraction.
//!
//! The overlay engine never touches a concrete rendering technology. Every
//! pane owns a [`Surface`]: something that can report its measurements and
//! accept new sizes, content offsets, positions and scroll offsets.
//!
//! Reads and writes are split into two phases: the engine first collects
//! [`SurfaceMetrics`] from every surface, then queues writes into a
//! [`SurfaceUpdate`] per pane and flushes all of them at the end of a refresh.

mod memory;

#[cfg(target_arch = "wasm32")]
mod dom;

use serde::Serialize;

use crate::layout::Axis;
use crate::overlay::PaneKind;

pub use memory::{MemorySurface, MemorySurfaceProvider, SurfaceState};

#[cfg(target_arch = "wasm32")]
pub use dom::{DomSurface, DomSurfaceProvider};

/// Outer size of a surface along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Extent {
    /// Explicit size in pixels
    Px(f64),
    /// Natural size of the content
    Auto,
}

impl Extent {
    /// Pixel value, if explicit.
    pub fn px(self) -> Option<f64> {
        match self {
            Self::Px(value) => Some(value),
            Self::Auto => None,
        }
    }
}

/// Measurements read from a surface before any write of a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceMetrics {
    /// False when the surface is not part of a visible layout tree
    pub attached: bool,
    pub width: f64,
    pub height: f64,
    pub scroll_left: f64,
    pub scroll_top: f64,
    /// Parent-relative static offset (left)
    pub offset_left: f64,
    /// Parent-relative static offset (top)
    pub offset_top: f64,
}

impl SurfaceMetrics {
    /// Metrics of a surface that is not attached to a layout tree.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Native scroll offset along `axis`.
    pub fn scroll(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.scroll_left,
            Axis::Vertical => self.scroll_top,
        }
    }

    /// Parent-relative static offset along `axis`.
    pub fn static_offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.offset_left,
            Axis::Vertical => self.offset_top,
        }
    }
}

/// A measurable, positionable rectangular render surface.
pub trait Surface {
    /// Read the current measurements.
    fn metrics(&self) -> SurfaceMetrics;

    /// Set the outer size along `axis`.
    fn set_outer_size(&mut self, axis: Axis, extent: Extent);

    /// Offset the content inside the surface along `axis` (`None` = natural position).
    fn set_content_offset(&mut self, axis: Axis, offset: Option<f64>);

    /// Position the surface inside its parent along `axis` (`None` = natural position).
    fn set_position(&mut self, axis: Axis, position: Option<f64>);

    /// Set the native scroll offset along `axis`.
    fn set_scroll_offset(&mut self, axis: Axis, offset: f64);

    /// Padding after the content along `axis`, used to make room for a scrollbar.
    fn set_padding_end(&mut self, axis: Axis, padding: f64);
}

/// Creates the surface owned by each pane (the clone of the main table).
pub trait SurfaceProvider {
    fn create_surface(&mut self, kind: PaneKind) -> Box<dyn Surface>;
}

/// Per-axis pending value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisPair<T> {
    pub horizontal: T,
    pub vertical: T,
}

impl<T: Copy> AxisPair<T> {
    pub fn get(&self, axis: Axis) -> T {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    pub fn set(&mut self, axis: Axis, value: T) {
        match axis {
            Axis::Horizontal => self.horizontal = value,
            Axis::Vertical => self.vertical = value,
        }
    }
}

/// Writes queued for one surface during a refresh.
///
/// `None` means "leave untouched"; for content offsets and positions the
/// inner `Option` carries the natural-position case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceUpdate {
    pub outer_size: AxisPair<Option<Extent>>,
    pub content_offset: AxisPair<Option<Option<f64>>>,
    pub position: AxisPair<Option<Option<f64>>>,
    pub scroll_offset: AxisPair<Option<f64>>,
    pub padding_end: AxisPair<Option<f64>>,
}

impl SurfaceUpdate {
    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the queued writes to `surface`, then clear them.
    pub fn flush(&mut self, surface: &mut dyn Surface) {
        for axis in Axis::BOTH {
            if let Some(extent) = self.outer_size.get(axis) {
                surface.set_outer_size(axis, extent);
            }
            if let Some(offset) = self.content_offset.get(axis) {
                surface.set_content_offset(axis, offset);
            }
            if let Some(position) = self.position.get(axis) {
                surface.set_position(axis, position);
            }
            if let Some(padding) = self.padding_end.get(axis) {
                surface.set_padding_end(axis, padding);
            }
            if let Some(offset) = self.scroll_offset.get(axis) {
                surface.set_scroll_offset(axis, offset);
            }
        }
        *self = Self::default();
    }
}
