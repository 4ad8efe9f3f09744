//! The overlay coordinator.
//!
//! `Overlays` owns the viewport, the layout, the scroll proxy and every pane.
//! A refresh runs in phases:
//!
//! 1. resolve stretching and scrollbars, clamp the viewport, compute ranges
//! 2. measure every surface into a [`FrameSnapshot`]
//! 3. plan each pane's writes in refresh order
//! 4. flush the writes
//!
//! A pending scroll-to request is resolved after the first pass and the
//! phases run once more. Listeners are notified last.

use serde::Serialize;
use tracing::{debug, trace};

use super::frame::{Frame, FrameRanges, FrameSnapshot};
use super::pane::{PaneOverlay, PaneSnapshot};
use super::registry::PaneRegistry;
use super::PaneKind;
use crate::error::Result;
use crate::layout::{Axis, GridLayout, ViewportState};
use crate::scroll::{NativeScroll, ScrollAnchor, ScrollEdge, ScrollProxy, Scrollbars};
use crate::settings::GridSettings;
use crate::surface::{AxisPair, Surface, SurfaceMetrics, SurfaceProvider};

/// Sent to listeners for each axis whose logical scroll offset moved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollNotification {
    pub axis: Axis,
    pub scroll_left: f64,
    pub scroll_top: f64,
    /// Change along `axis` since the previous refresh
    pub delta: f64,
}

/// Receives scroll notifications and computed render ranges.
pub trait OverlayListener {
    fn on_scroll(&mut self, _event: &ScrollNotification) {}

    fn on_ranges(&mut self, _ranges: &FrameRanges) {}
}

/// Serializable state of the whole overlay system.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySnapshot {
    pub viewport: ViewportState,
    pub scrollbars: Scrollbars,
    pub ranges: FrameRanges,
    pub panes: Vec<PaneSnapshot>,
}

impl OverlaySnapshot {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `PaneError::Json` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Keeps the pinned panes aligned with the main scrolling pane.
pub struct Overlays {
    settings: GridSettings,
    layout: GridLayout,
    viewport: ViewportState,
    scrollbars: Scrollbars,
    ranges: FrameRanges,
    proxy: ScrollProxy,
    /// Panes in refresh order, master last
    panes: Vec<PaneOverlay>,
    pending_scroll: AxisPair<Option<ScrollAnchor>>,
    /// Axes whose logical offset must be written back to the scroll element
    write_back: AxisPair<bool>,
    listeners: Vec<Box<dyn OverlayListener>>,
    emitted_ranges: Option<FrameRanges>,
}

impl std::fmt::Debug for Overlays {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlays")
            .field("viewport", &self.viewport)
            .field("scrollbars", &self.scrollbars)
            .field("ranges", &self.ranges)
            .field("proxy", &self.proxy)
            .field("panes", &self.panes)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Overlays {
    /// Build every pane listed in `settings.panes` with surfaces from `provider`.
    ///
    /// # Errors
    /// Returns `PaneError::InvalidSetting` if the settings fail validation.
    pub fn new(settings: GridSettings, provider: &mut dyn SurfaceProvider) -> Result<Self> {
        Self::with_registry(settings, provider, &PaneRegistry::standard())
    }

    /// Like [`Overlays::new`] with a custom registry.
    ///
    /// # Errors
    /// Returns `PaneError::InvalidSetting` if the settings fail validation.
    pub fn with_registry(
        settings: GridSettings,
        provider: &mut dyn SurfaceProvider,
        registry: &PaneRegistry,
    ) -> Result<Self> {
        settings.validate()?;
        let panes = registry.build(&settings, provider);
        debug!(
            panes = panes.len(),
            rows = settings.total_rows,
            columns = settings.total_columns,
            "overlays created"
        );

        Ok(Self {
            layout: GridLayout::new(&settings),
            proxy: ScrollProxy::new(&settings),
            settings,
            viewport: ViewportState::new(),
            scrollbars: Scrollbars::default(),
            ranges: FrameRanges::default(),
            panes,
            pending_scroll: AxisPair::default(),
            write_back: AxisPair::default(),
            listeners: Vec::new(),
            emitted_ranges: None,
        })
    }

    /// Use `target` as the scroll element instead of the master surface.
    pub fn set_scroll_target(&mut self, target: Box<dyn Surface>) {
        self.proxy.set_target(target);
    }

    pub fn add_listener(&mut self, listener: Box<dyn OverlayListener>) {
        self.listeners.push(listener);
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn scrollbars(&self) -> Scrollbars {
        self.scrollbars
    }

    /// Render ranges computed by the last refresh.
    pub fn ranges(&self) -> FrameRanges {
        self.ranges
    }

    pub fn scroll_proxy(&self) -> &ScrollProxy {
        &self.proxy
    }

    pub fn pane(&self, kind: PaneKind) -> Option<&PaneOverlay> {
        self.panes.iter().find(|pane| pane.kind() == kind)
    }

    /// Panes in refresh order.
    pub fn panes(&self) -> &[PaneOverlay] {
        &self.panes
    }

    /// Visible extent minus scrollbar allowances, as `(width, height)`.
    pub fn workspace(&self) -> (f64, f64) {
        let width = self.viewport.visible_width - self.scrollbars.allowance(Axis::Horizontal);
        let height = self.viewport.visible_height - self.scrollbars.allowance(Axis::Vertical);
        (width.max(0.0), height.max(0.0))
    }

    fn workspace_along(&self, axis: Axis) -> f64 {
        let (width, height) = self.workspace();
        match axis {
            Axis::Horizontal => width,
            Axis::Vertical => height,
        }
    }

    fn master_metrics(&self) -> SurfaceMetrics {
        self.pane(PaneKind::Master)
            .map(PaneOverlay::metrics)
            .unwrap_or_default()
    }

    /// Effective native scroll offset of the scroll element along `axis`.
    pub fn observed_scroll_position(&self, axis: Axis) -> f64 {
        match self.pane(PaneKind::Master) {
            Some(master) => master.observed_scroll_position(&self.proxy, axis),
            None => self.proxy.observed(axis).unwrap_or(0.0),
        }
    }

    /// Cell under a point measured from the grid's top-left corner.
    pub fn cell_at_screen(&self, x: f64, y: f64) -> Option<(u32, u32)> {
        self.layout.cell_at_screen(
            x,
            y,
            (self.viewport.scroll_left, self.viewport.scroll_top),
            self.workspace(),
        )
    }

    /// Recompute and reposition every pane.
    ///
    /// `force` recomputes pane geometry even when it is already adjusted.
    ///
    /// # Errors
    /// Returns `PaneError::Configuration` if a pane cannot position its content.
    pub fn refresh(&mut self, force: bool) -> Result<()> {
        let before = self.viewport;
        self.run(force, before)
    }

    /// Handle a native scroll event from the scroll element.
    ///
    /// # Errors
    /// Returns `PaneError::Configuration` if a pane cannot position its content.
    pub fn on_scroll(&mut self, native: NativeScroll) -> Result<()> {
        let before = self.viewport;
        let master = self.master_metrics();
        let parent_offset = (
            master.static_offset(Axis::Horizontal),
            master.static_offset(Axis::Vertical),
        );
        let (left, top) = self.proxy.normalize(native, parent_offset);
        trace!(native_left = native.left, native_top = native.top, left, top, "scroll");
        self.viewport.scroll_left = left;
        self.viewport.scroll_top = top;
        self.run(false, before)
    }

    /// Read the native offsets from the scroll element, then handle them as a scroll event.
    ///
    /// # Errors
    /// Returns `PaneError::Configuration` if a pane cannot position its content.
    pub fn on_surface_scroll(&mut self) -> Result<()> {
        let native = NativeScroll {
            left: self.observed_scroll_position(Axis::Horizontal),
            top: self.observed_scroll_position(Axis::Vertical),
        };
        self.on_scroll(native)
    }

    /// Handle a change of the visible size.
    ///
    /// # Errors
    /// Returns `PaneError::Configuration` if a pane cannot position its content.
    pub fn on_resize(&mut self, width: f64, height: f64) -> Result<()> {
        let before = self.viewport;
        self.viewport.resize(width, height);
        for pane in &mut self.panes {
            pane.invalidate_geometry();
        }
        debug!(width, height, "resize");
        self.run(false, before)
    }

    /// Replace the settings. Panes switch between active and inactive in place;
    /// the set of constructed panes does not change.
    ///
    /// # Errors
    /// Returns `PaneError::InvalidSetting` if the settings fail validation, or
    /// `PaneError::Configuration` if a pane cannot position its content.
    pub fn update_settings(&mut self, settings: GridSettings) -> Result<()> {
        settings.validate()?;
        let before = self.viewport;
        self.layout = GridLayout::new(&settings);
        self.proxy.update_settings(&settings);
        for pane in &mut self.panes {
            pane.update_settings(&settings);
        }
        self.settings = settings;
        debug!(
            rows = self.settings.total_rows,
            columns = self.settings.total_columns,
            "settings updated"
        );
        self.run(false, before)
    }

    /// Scroll by a pixel delta and return the delta actually applied.
    ///
    /// # Errors
    /// Returns `PaneError::Configuration` if a pane cannot position its content.
    pub fn scroll_by(&mut self, delta_x: f64, delta_y: f64) -> Result<(f64, f64)> {
        let before = self.viewport;
        let workspace = self.workspace();
        let applied = self
            .viewport
            .scroll_by(delta_x, delta_y, &self.layout, workspace);
        if applied.0.abs() > f64::EPSILON {
            self.write_back.horizontal = true;
        }
        if applied.1.abs() > f64::EPSILON {
            self.write_back.vertical = true;
        }
        self.run(false, before)?;
        Ok(applied)
    }

    /// Align item `anchor.index` along `axis` to the requested edge.
    /// Indices past the end are clamped to the last item.
    ///
    /// # Errors
    /// Returns `PaneError::Configuration` if a pane cannot position its content.
    pub fn scroll_to(&mut self, axis: Axis, anchor: ScrollAnchor) -> Result<()> {
        let before = self.viewport;
        if let Some(last) = self.layout.axis(axis).count().checked_sub(1) {
            let index = anchor.index.min(last);
            self.pending_scroll.set(axis, Some(ScrollAnchor { index, ..anchor }));
        }
        self.run(false, before)
    }

    /// Bring a cell into view.
    ///
    /// With `edge` set, both axes are aligned to that edge. Without it, each
    /// axis scrolls the minimal distance (not at all when the cell is already
    /// fully visible). Pinned rows and columns never scroll.
    ///
    /// # Errors
    /// Returns `PaneError::Configuration` if a pane cannot position its content.
    pub fn scroll_to_cell(&mut self, row: u32, column: u32, edge: Option<ScrollEdge>) -> Result<()> {
        let before = self.viewport;
        for (axis, index) in [(Axis::Horizontal, column), (Axis::Vertical, row)] {
            if let Some(anchor) = self.anchor_for(axis, index, edge) {
                self.pending_scroll.set(axis, Some(anchor));
            }
        }
        self.run(false, before)
    }

    fn anchor_for(&self, axis: Axis, index: u32, edge: Option<ScrollEdge>) -> Option<ScrollAnchor> {
        let sizes = self.layout.axis(axis);
        let index = index.min(sizes.count().checked_sub(1)?);
        let (first, end) = self.layout.scrollable_bounds(axis);
        if index < first || index >= end {
            return None;
        }
        if let Some(edge) = edge {
            return Some(ScrollAnchor { index, edge });
        }

        let scroll = self.viewport.scroll(axis);
        let extent = self
            .layout
            .scrollable_extent(axis, self.workspace_along(axis));
        let leading = sizes.sum(first, index);
        let trailing = leading + sizes.size(index);
        if leading < scroll {
            Some(ScrollAnchor::leading(index))
        } else if trailing > scroll + extent {
            Some(ScrollAnchor::trailing(index))
        } else {
            None
        }
    }

    /// Serializable state after the last refresh.
    pub fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            viewport: self.viewport,
            scrollbars: self.scrollbars,
            ranges: self.ranges,
            panes: self.panes.iter().map(PaneOverlay::snapshot).collect(),
        }
    }

    fn run(&mut self, force: bool, before: ViewportState) -> Result<()> {
        self.refresh_passes(force)?;
        self.notify(&before, force);
        Ok(())
    }

    fn refresh_passes(&mut self, force: bool) -> Result<()> {
        self.update_frame();
        self.apply_frame(force)?;

        if self.pending_scroll.horizontal.is_some() || self.pending_scroll.vertical.is_some() {
            self.resolve_scroll_anchors();
            self.update_frame();
            self.apply_frame(force)?;
        }
        Ok(())
    }

    fn update_frame(&mut self) {
        self.scrollbars = self
            .proxy
            .resolve_scrollbars(&mut self.layout, &self.viewport);
        let workspace = self.workspace();
        self.viewport.clamp_scroll(&self.layout, workspace);

        for axis in Axis::BOTH {
            let (first, end) = self.layout.scrollable_bounds(axis);
            let extent = self
                .layout
                .scrollable_extent(axis, self.workspace_along(axis));
            let range = self.layout.axis(axis).render_range(
                first,
                end,
                extent,
                self.viewport.scroll(axis),
                self.settings.overscan,
            );
            self.ranges.set(axis, range);
        }
        trace!(
            rows = ?self.ranges.rows,
            columns = ?self.ranges.columns,
            scrollbars = ?self.scrollbars,
            "frame"
        );
    }

    fn measure(&self) -> FrameSnapshot {
        FrameSnapshot::new(
            self.panes.iter().map(|pane| (pane.kind(), pane.metrics())),
            self.proxy.target_metrics(),
        )
    }

    fn apply_frame(&mut self, force: bool) -> Result<()> {
        let snapshot = self.measure();
        let written_back = self.queue_write_backs(&snapshot);

        let frame = Frame {
            settings: &self.settings,
            layout: &self.layout,
            viewport: &self.viewport,
            scrollbars: self.scrollbars,
            ranges: &self.ranges,
            snapshot: &snapshot,
        };
        let planned = self.panes.iter_mut().try_for_each(|pane| -> Result<()> {
            pane.adjust_geometry(&frame, force);
            pane.reposition_content(&frame)?;
            pane.sync_offset_across_pinned_axis(&frame);
            Ok(())
        });

        if let Err(err) = planned {
            // Nothing of a failed frame reaches the surfaces
            for pane in &mut self.panes {
                pane.discard_pending();
            }
            self.proxy.discard_pending();
            for axis in Axis::BOTH {
                if written_back.get(axis) {
                    self.write_back.set(axis, true);
                }
            }
            return Err(err);
        }

        for pane in &mut self.panes {
            pane.flush();
        }
        self.proxy.flush();
        Ok(())
    }

    /// Queue pending write-backs and return the axes that were queued.
    fn queue_write_backs(&mut self, snapshot: &FrameSnapshot) -> AxisPair<bool> {
        let mut queued = AxisPair::default();
        for axis in Axis::BOTH {
            if !self.write_back.get(axis) {
                continue;
            }
            self.write_back.set(axis, false);
            queued.set(axis, true);
            let native =
                self.proxy
                    .to_native(axis, self.viewport.scroll(axis), snapshot.parent_offset(axis));
            if self.proxy.queue_write_back(axis, native) {
                continue;
            }
            if let Some(master) = self
                .panes
                .iter_mut()
                .find(|pane| pane.kind() == PaneKind::Master)
            {
                master.queue_scroll(axis, native);
            }
        }
        queued
    }

    fn resolve_scroll_anchors(&mut self) {
        let snapshot = self.measure();
        let frame = Frame {
            settings: &self.settings,
            layout: &self.layout,
            viewport: &self.viewport,
            scrollbars: self.scrollbars,
            ranges: &self.ranges,
            snapshot: &snapshot,
        };

        let mut targets = Vec::new();
        for axis in Axis::BOTH {
            let Some(anchor) = self.pending_scroll.get(axis) else {
                continue;
            };
            let controller = PaneKind::scroll_controller(axis);
            let pane = self
                .panes
                .iter()
                .find(|pane| pane.kind() == controller && pane.is_active())
                .or_else(|| self.panes.iter().find(|pane| pane.kind() == PaneKind::Master));
            let Some(pane) = pane else {
                continue;
            };
            let native = pane.scroll_to_index(&frame, axis, anchor.index, anchor.edge);
            let logical = self
                .proxy
                .to_logical(axis, native, snapshot.parent_offset(axis));
            debug!(
                ?axis,
                index = anchor.index,
                edge = ?anchor.edge,
                pane = pane.kind().name(),
                native,
                logical,
                "scroll to"
            );
            targets.push((axis, logical));
        }

        self.pending_scroll = AxisPair::default();
        for (axis, logical) in targets {
            self.viewport.set_scroll_axis(axis, logical);
            self.write_back.set(axis, true);
        }
    }

    fn notify(&mut self, before: &ViewportState, force: bool) {
        let moved: Vec<ScrollNotification> = Axis::BOTH
            .into_iter()
            .filter_map(|axis| {
                let delta = self.viewport.scroll(axis) - before.scroll(axis);
                (delta.abs() > f64::EPSILON).then_some(ScrollNotification {
                    axis,
                    scroll_left: self.viewport.scroll_left,
                    scroll_top: self.viewport.scroll_top,
                    delta,
                })
            })
            .collect();
        let ranges_changed = force || self.emitted_ranges != Some(self.ranges);

        for listener in &mut self.listeners {
            for event in &moved {
                listener.on_scroll(event);
            }
            if ranges_changed {
                listener.on_ranges(&self.ranges);
            }
        }
        if ranges_changed {
            self.emitted_ranges = Some(self.ranges);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::layout::render_calc::RenderRange;
    use crate::surface::{Extent, MemorySurfaceProvider};

    #[test]
    fn test_failed_frame_writes_nothing() {
        let mut settings = GridSettings::new(100, 10);
        settings.frozen_columns_left = 2;
        settings.frozen_rows_top = 1;
        let mut provider = MemorySurfaceProvider::new();
        let mut overlays = Overlays::new(settings, &mut provider).unwrap();
        overlays.on_resize(220.0, 230.0).unwrap();
        let left = provider.surface(PaneKind::Left).unwrap();
        let writes = left.state().writes;

        // Left plans a scroll sync, then Top cannot place its columns
        overlays.viewport.scroll_top = 46.0;
        overlays.write_back.vertical = true;
        overlays.ranges.columns = Some(RenderRange {
            start: 2,
            end: 5,
            start_position: f64::NAN,
        });
        assert!(overlays.apply_frame(false).is_err());
        assert_eq!(left.state().writes, writes);
        assert!(overlays.write_back.vertical);

        overlays.viewport.scroll_top = 0.0;
        overlays.refresh(false).unwrap();
        assert_eq!(left.state().scroll.vertical, 0.0);
        let master = provider.surface(PaneKind::Master).unwrap();
        assert_eq!(master.state().scroll.vertical, 0.0);
        assert_eq!(left.state().height, Extent::Px(213.0));
    }
}
