//! Per-refresh context shared by every pane.
//!
//! A refresh measures every surface first and stores the readings in a
//! [`FrameSnapshot`]; panes then plan their writes from a [`Frame`] that only
//! borrows immutable state, so no pane ever reads a value another pane has
//! just written.

use std::collections::HashMap;

use serde::Serialize;

use super::PaneKind;
use crate::layout::{Axis, GridLayout, RenderRange, ViewportState};
use crate::scroll::Scrollbars;
use crate::settings::GridSettings;
use crate::surface::SurfaceMetrics;

/// Render ranges of one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRanges {
    pub rows: Option<RenderRange>,
    pub columns: Option<RenderRange>,
}

impl FrameRanges {
    pub fn get(&self, axis: Axis) -> Option<RenderRange> {
        match axis {
            Axis::Horizontal => self.columns,
            Axis::Vertical => self.rows,
        }
    }

    pub fn set(&mut self, axis: Axis, range: Option<RenderRange>) {
        match axis {
            Axis::Horizontal => self.columns = range,
            Axis::Vertical => self.rows = range,
        }
    }
}

/// Surface measurements taken before any write of a refresh.
#[derive(Debug, Clone, Default)]
pub struct FrameSnapshot {
    metrics: HashMap<PaneKind, SurfaceMetrics>,
    /// Metrics of the injected scroll target, if any
    pub scroll_target: Option<SurfaceMetrics>,
}

impl FrameSnapshot {
    pub fn new(
        metrics: impl IntoIterator<Item = (PaneKind, SurfaceMetrics)>,
        scroll_target: Option<SurfaceMetrics>,
    ) -> Self {
        Self {
            metrics: metrics.into_iter().collect(),
            scroll_target,
        }
    }

    /// Metrics of the pane's surface; detached metrics when the pane was not measured.
    pub fn metrics(&self, kind: PaneKind) -> SurfaceMetrics {
        self.metrics.get(&kind).copied().unwrap_or_default()
    }

    /// Offset of the grid inside its scroll container, taken from the main pane.
    pub fn parent_offset(&self, axis: Axis) -> f64 {
        self.metrics(PaneKind::Master).static_offset(axis)
    }
}

/// Read-only view handed to panes while they plan a refresh.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub settings: &'a GridSettings,
    pub layout: &'a GridLayout,
    pub viewport: &'a ViewportState,
    pub scrollbars: Scrollbars,
    pub ranges: &'a FrameRanges,
    pub snapshot: &'a FrameSnapshot,
}

impl Frame<'_> {
    /// Visible extent along `axis` minus the crossing scrollbar.
    pub fn workspace(&self, axis: Axis) -> f64 {
        (self.viewport.extent(axis) - self.scrollbars.allowance(axis)).max(0.0)
    }

    /// Workspace as `(width, height)`.
    pub fn workspace_size(&self) -> (f64, f64) {
        (self.workspace(Axis::Horizontal), self.workspace(Axis::Vertical))
    }

    /// Extent available to scrolling items along `axis`: the workspace minus
    /// the header strip and the trailing pinned items.
    pub fn viewport_extent(&self, axis: Axis) -> f64 {
        (self.workspace(axis)
            - self.layout.header_extent(axis)
            - self.layout.pinned_trailing_extent(axis))
        .max(0.0)
    }
}
