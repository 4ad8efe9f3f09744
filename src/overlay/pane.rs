//! A single pane overlay: one surface plus the per-kind geometry rules.

use serde::Serialize;
use tracing::{debug, error, trace};

use super::frame::Frame;
use super::PaneKind;
use crate::error::{PaneError, Result};
use crate::layout::Axis;
use crate::scroll::{ScrollEdge, ScrollProxy};
use crate::settings::{GridSettings, PreventOverflow, ScrollContainer};
use crate::surface::{AxisPair, Extent, Surface, SurfaceMetrics, SurfaceUpdate};

/// Outer geometry of a pane as last planned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneGeometry {
    pub width: Extent,
    pub height: Extent,
    /// Vertical position inside the parent (`None` = natural position)
    pub top: Option<f64>,
    /// Padding below the content, reserved for the horizontal scrollbar
    pub padding_bottom: f64,
}

impl PaneGeometry {
    fn collapsed(kind: PaneKind, previous: Option<PaneGeometry>) -> Self {
        let mut geometry = previous.unwrap_or(Self {
            width: Extent::Auto,
            height: Extent::Auto,
            top: None,
            padding_bottom: 0.0,
        });
        match kind.varying_axis() {
            Some(Axis::Horizontal) => geometry.width = Extent::Px(0.0),
            Some(Axis::Vertical) => geometry.height = Extent::Px(0.0),
            None => {
                geometry.width = Extent::Px(0.0);
                geometry.height = Extent::Px(0.0);
            }
        }
        geometry
    }
}

/// Serializable view of a pane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneSnapshot {
    pub kind: PaneKind,
    pub active: bool,
    pub attached: bool,
    pub geometry: Option<PaneGeometry>,
    pub content_left: Option<f64>,
    pub content_top: Option<f64>,
}

/// A pinned region of the grid, or the main scrolling region.
pub struct PaneOverlay {
    kind: PaneKind,
    surface: Box<dyn Surface>,
    active: bool,
    sizes_adjusted: bool,
    geometry: Option<PaneGeometry>,
    content_offset: AxisPair<Option<f64>>,
    pending: SurfaceUpdate,
}

impl std::fmt::Debug for PaneOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaneOverlay")
            .field("kind", &self.kind)
            .field("active", &self.active)
            .field("sizes_adjusted", &self.sizes_adjusted)
            .field("geometry", &self.geometry)
            .finish()
    }
}

impl PaneOverlay {
    pub fn new(kind: PaneKind, surface: Box<dyn Surface>, settings: &GridSettings) -> Self {
        Self {
            kind,
            surface,
            active: kind.should_be_rendered(settings),
            sizes_adjusted: false,
            geometry: None,
            content_offset: AxisPair::default(),
            pending: SurfaceUpdate::default(),
        }
    }

    pub fn kind(&self) -> PaneKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn sizes_adjusted(&self) -> bool {
        self.sizes_adjusted
    }

    /// Geometry planned by the last refresh.
    pub fn geometry(&self) -> Option<PaneGeometry> {
        self.geometry
    }

    /// Content offset planned by the last refresh along `axis`.
    pub fn content_offset(&self, axis: Axis) -> Option<f64> {
        self.content_offset.get(axis)
    }

    pub fn metrics(&self) -> SurfaceMetrics {
        self.surface.metrics()
    }

    pub fn should_be_rendered(&self, settings: &GridSettings) -> bool {
        self.kind.should_be_rendered(settings)
    }

    /// Re-evaluate activity for new settings and drop the adjusted flag.
    /// Returns true when the pane switched between active and inactive.
    pub fn update_settings(&mut self, settings: &GridSettings) -> bool {
        let active = self.should_be_rendered(settings);
        let changed = active != self.active;
        if changed {
            debug!(pane = self.kind.name(), active, "pane activity changed");
        }
        self.active = active;
        self.sizes_adjusted = false;
        changed
    }

    /// Force the next non-forced `adjust_geometry` to recompute.
    pub fn invalidate_geometry(&mut self) {
        self.sizes_adjusted = false;
    }

    /// Recompute the outer geometry of the surface.
    pub fn adjust_geometry(&mut self, frame: &Frame<'_>, force: bool) {
        if !frame.snapshot.metrics(self.kind).attached {
            trace!(pane = self.kind.name(), "surface detached, geometry skipped");
            return;
        }
        if !self.active {
            self.collapse();
            return;
        }
        if self.sizes_adjusted && !force {
            return;
        }

        let geometry = self.compute_geometry(frame);
        self.queue_geometry(geometry);
        self.geometry = Some(geometry);
        if !force {
            self.sizes_adjusted = true;
        }
    }

    fn collapse(&mut self) {
        let geometry = PaneGeometry::collapsed(self.kind, self.geometry);
        if self.geometry == Some(geometry) {
            return;
        }
        self.queue_geometry(geometry);
        self.geometry = Some(geometry);
        self.sizes_adjusted = false;
    }

    fn queue_geometry(&mut self, geometry: PaneGeometry) {
        self.pending.outer_size.set(Axis::Horizontal, Some(geometry.width));
        self.pending.outer_size.set(Axis::Vertical, Some(geometry.height));
        if self.kind.is_bottom_anchored() {
            self.pending.position.set(Axis::Vertical, Some(geometry.top));
        }
        if self.kind == PaneKind::Master {
            self.pending
                .padding_end
                .set(Axis::Vertical, Some(geometry.padding_bottom));
        }
    }

    fn compute_geometry(&self, frame: &Frame<'_>) -> PaneGeometry {
        let settings = frame.settings;
        let layout = frame.layout;
        let page_scrolls = settings.scroll_container == ScrollContainer::Window;

        let left_width = layout.pinned_leading_extent(Axis::Horizontal);
        let top_height = layout.pinned_leading_extent(Axis::Vertical);
        let bottom_height = layout.pinned_trailing_extent(Axis::Vertical);

        let visible_height = frame
            .workspace(Axis::Vertical)
            .min(layout.content_extent(Axis::Vertical));
        let clipped_height =
            if page_scrolls && settings.prevent_overflow != PreventOverflow::Vertical {
                Extent::Auto
            } else {
                Extent::Px(visible_height)
            };
        let clipped_width =
            if page_scrolls && settings.prevent_overflow != PreventOverflow::Horizontal {
                Extent::Auto
            } else {
                Extent::Px(
                    frame
                        .workspace(Axis::Horizontal)
                        .min(layout.content_extent(Axis::Horizontal)),
                )
            };
        let bottom_top = Some((visible_height - bottom_height).max(0.0));

        let (width, height, top) = match self.kind {
            PaneKind::Master => {
                if page_scrolls {
                    (Extent::Auto, Extent::Auto, None)
                } else {
                    (
                        Extent::Px(frame.viewport.visible_width),
                        Extent::Px(frame.viewport.visible_height),
                        None,
                    )
                }
            }
            PaneKind::Left => (Extent::Px(left_width), clipped_height, None),
            PaneKind::Top => (clipped_width, Extent::Px(top_height), None),
            PaneKind::Bottom => (clipped_width, Extent::Px(bottom_height), bottom_top),
            PaneKind::TopLeftCorner => (Extent::Px(left_width), Extent::Px(top_height), None),
            PaneKind::BottomLeftCorner => {
                (Extent::Px(left_width), Extent::Px(bottom_height), bottom_top)
            }
        };

        PaneGeometry {
            width,
            height,
            top,
            padding_bottom: if self.kind == PaneKind::Master {
                frame.scrollbars.allowance(Axis::Vertical)
            } else {
                0.0
            },
        }
    }

    /// Move the content so the first rendered item sits at its grid position.
    ///
    /// # Errors
    /// `PaneError::Configuration` when an axis has scrolling items but no usable
    /// render range.
    pub fn reposition_content(&mut self, frame: &Frame<'_>) -> Result<()> {
        if !self.active || !frame.snapshot.metrics(self.kind).attached {
            return Ok(());
        }
        for axis in self.kind.scrolling_axes() {
            let (first, end) = frame.layout.scrollable_bounds(axis);
            let offset = match frame.ranges.get(axis) {
                Some(range) if range.start_position.is_finite() => Some(range.start_position),
                None if end <= first => None,
                range => {
                    let message = format!(
                        "{} pane has no usable {axis:?} render range ({range:?}) for {} items",
                        self.kind.name(),
                        end - first
                    );
                    error!("{message}");
                    return Err(PaneError::Configuration(message));
                }
            };
            if self.content_offset.get(axis) != offset || self.geometry.is_none() {
                self.pending.content_offset.set(axis, Some(offset));
            }
            self.content_offset.set(axis, offset);
        }
        Ok(())
    }

    /// Mirror the main scroll offset into a single-axis pane's own scroll offset.
    pub fn sync_offset_across_pinned_axis(&mut self, frame: &Frame<'_>) {
        if !self.kind.is_single_axis() || !self.active {
            return;
        }
        let metrics = frame.snapshot.metrics(self.kind);
        if !metrics.attached {
            return;
        }
        for axis in self.kind.scrolling_axes() {
            let target = frame.viewport.scroll(axis);
            if (metrics.scroll(axis) - target).abs() > f64::EPSILON {
                self.pending.scroll_offset.set(axis, Some(target));
            }
        }
    }

    /// Native scroll offset that brings `target` to the given edge along `axis`.
    pub fn scroll_to_index(
        &self,
        frame: &Frame<'_>,
        axis: Axis,
        target: u32,
        edge: ScrollEdge,
    ) -> f64 {
        let sizes = frame.layout.axis(axis);
        let (first, _) = frame.layout.scrollable_bounds(axis);
        let parent_offset = self.table_parent_offset(frame, axis);

        match edge {
            ScrollEdge::Leading => parent_offset + sizes.sum(first, target),
            ScrollEdge::Trailing => {
                let beyond_rendered = frame
                    .ranges
                    .get(axis)
                    .map_or(true, |range| target > range.end);
                let compensation = if beyond_rendered {
                    frame.settings.trailing_edge_compensation
                } else {
                    0.0
                };
                parent_offset + sizes.sum(0, target.saturating_add(1))
                    - frame.viewport_extent(axis)
                    + compensation
            }
        }
    }

    /// Effective native scroll offset: the proxy's injected target when there
    /// is one, this pane's surface otherwise.
    pub fn observed_scroll_position(&self, proxy: &ScrollProxy, axis: Axis) -> f64 {
        proxy
            .observed(axis)
            .unwrap_or_else(|| self.surface.metrics().scroll(axis))
    }

    /// Static offset of the grid inside the scrolling page along `axis`.
    pub fn table_parent_offset(&self, frame: &Frame<'_>, axis: Axis) -> f64 {
        let prevented = match axis {
            Axis::Horizontal => frame.settings.prevent_overflow == PreventOverflow::Horizontal,
            Axis::Vertical => frame.settings.prevent_overflow == PreventOverflow::Vertical,
        };
        if frame.settings.scroll_container == ScrollContainer::Window && !prevented {
            frame.snapshot.parent_offset(axis)
        } else {
            0.0
        }
    }

    /// Queue a native scroll write on this pane's own surface.
    pub fn queue_scroll(&mut self, axis: Axis, native: f64) {
        self.pending.scroll_offset.set(axis, Some(native));
    }

    /// Drop queued writes and forget the planned state, so the next refresh
    /// plans and writes everything again.
    pub(crate) fn discard_pending(&mut self) {
        self.pending = SurfaceUpdate::default();
        self.sizes_adjusted = false;
        self.geometry = None;
        self.content_offset = AxisPair::default();
    }

    /// Apply queued writes to the surface.
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        trace!(pane = self.kind.name(), update = ?self.pending, "flush");
        self.pending.flush(self.surface.as_mut());
    }

    pub fn snapshot(&self) -> PaneSnapshot {
        PaneSnapshot {
            kind: self.kind,
            active: self.active,
            attached: self.surface.metrics().attached,
            geometry: self.geometry,
            content_left: self.content_offset.horizontal,
            content_top: self.content_offset.vertical,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::layout::{GridLayout, RenderRange, ViewportState};
    use crate::overlay::frame::{FrameRanges, FrameSnapshot};
    use crate::scroll::Scrollbars;
    use crate::surface::MemorySurface;

    struct Fixture {
        settings: GridSettings,
        layout: GridLayout,
        viewport: ViewportState,
        ranges: FrameRanges,
        snapshot: FrameSnapshot,
    }

    impl Fixture {
        fn new(settings: GridSettings, width: f64, height: f64) -> Self {
            let layout = GridLayout::new(&settings);
            let snapshot = FrameSnapshot::new(
                PaneKind::ALL.map(|kind| (kind, MemorySurface::attached(0.0, 0.0).metrics())),
                None,
            );
            Self {
                settings,
                layout,
                viewport: ViewportState::with_size(width, height),
                ranges: FrameRanges::default(),
                snapshot,
            }
        }

        fn frame(&self) -> Frame<'_> {
            Frame {
                settings: &self.settings,
                layout: &self.layout,
                viewport: &self.viewport,
                scrollbars: Scrollbars {
                    horizontal: false,
                    vertical: false,
                    size: self.settings.scrollbar_size,
                },
                ranges: &self.ranges,
                snapshot: &self.snapshot,
            }
        }
    }

    fn frozen_left(count: u32) -> GridSettings {
        let mut settings = GridSettings::new(5, 10);
        settings.frozen_columns_left = count;
        settings
    }

    fn pane(kind: PaneKind, settings: &GridSettings) -> (PaneOverlay, MemorySurface) {
        let surface = MemorySurface::attached(0.0, 0.0);
        (PaneOverlay::new(kind, Box::new(surface.clone()), settings), surface)
    }

    #[test]
    fn test_left_geometry() {
        let fixture = Fixture::new(frozen_left(2), 220.0, 300.0);
        let (mut left, surface) = pane(PaneKind::Left, &fixture.settings);

        left.adjust_geometry(&fixture.frame(), false);
        left.flush();

        let state = surface.state();
        assert_eq!(state.width, Extent::Px(100.0));
        assert_eq!(state.height, Extent::Px(5.0 * 23.0));
        assert!(left.sizes_adjusted());
    }

    #[test]
    fn test_adjust_geometry_is_idempotent() {
        let fixture = Fixture::new(frozen_left(2), 220.0, 300.0);
        let (mut left, surface) = pane(PaneKind::Left, &fixture.settings);

        left.adjust_geometry(&fixture.frame(), false);
        left.flush();
        let first = surface.state();

        left.adjust_geometry(&fixture.frame(), false);
        left.flush();
        assert_eq!(surface.state(), first);

        left.adjust_geometry(&fixture.frame(), true);
        left.flush();
        let forced = surface.state();
        assert_eq!(forced.width, first.width);
        assert_eq!(forced.height, first.height);
    }

    #[test]
    fn test_inactive_left_collapses_height() {
        let fixture = Fixture::new(frozen_left(0), 220.0, 300.0);
        let (mut left, surface) = pane(PaneKind::Left, &fixture.settings);
        assert!(!left.is_active());

        left.adjust_geometry(&fixture.frame(), false);
        left.flush();
        assert_eq!(surface.state().height, Extent::Px(0.0));
        assert!(!left.sizes_adjusted());
    }

    #[test]
    fn test_detached_surface_is_skipped() {
        let mut fixture = Fixture::new(frozen_left(2), 220.0, 300.0);
        fixture.snapshot = FrameSnapshot::new([(PaneKind::Left, SurfaceMetrics::detached())], None);
        let (mut left, surface) = pane(PaneKind::Left, &fixture.settings);

        left.adjust_geometry(&fixture.frame(), true);
        left.reposition_content(&fixture.frame()).unwrap();
        left.sync_offset_across_pinned_axis(&fixture.frame());
        left.flush();
        assert_eq!(surface.state().writes, 0);
    }

    #[test]
    fn test_reposition_uses_range_start() {
        let mut fixture = Fixture::new(frozen_left(2), 220.0, 300.0);
        fixture.ranges.columns = Some(RenderRange {
            start: 4,
            end: 7,
            start_position: 200.0,
        });
        fixture.ranges.rows = Some(RenderRange {
            start: 0,
            end: 4,
            start_position: 0.0,
        });
        let (mut master, surface) = pane(PaneKind::Master, &fixture.settings);

        master.reposition_content(&fixture.frame()).unwrap();
        master.flush();
        assert_eq!(surface.state().content_offset.horizontal, Some(200.0));
        assert_eq!(surface.state().content_offset.vertical, Some(0.0));
    }

    #[test]
    fn test_reposition_without_range_is_a_configuration_fault() {
        let fixture = Fixture::new(frozen_left(2), 220.0, 300.0);
        let (mut master, _surface) = pane(PaneKind::Master, &fixture.settings);

        let err = master.reposition_content(&fixture.frame()).unwrap_err();
        assert!(matches!(err, PaneError::Configuration(_)));
    }

    #[test]
    fn test_reposition_empty_axis_uses_natural_position() {
        let fixture = Fixture::new(GridSettings::new(0, 0), 220.0, 300.0);
        let (mut master, surface) = pane(PaneKind::Master, &fixture.settings);

        master.reposition_content(&fixture.frame()).unwrap();
        master.flush();
        assert_eq!(surface.state().content_offset.horizontal, None);
    }

    #[test]
    fn test_scroll_to_index_edges() {
        let fixture = Fixture::new(frozen_left(2), 220.0, 300.0);
        let (left, _surface) = pane(PaneKind::Left, &fixture.settings);
        let frame = fixture.frame();

        assert_eq!(left.scroll_to_index(&frame, Axis::Horizontal, 9, ScrollEdge::Trailing), 280.0);
        assert_eq!(left.scroll_to_index(&frame, Axis::Horizontal, 5, ScrollEdge::Leading), 150.0);
        assert_eq!(left.scroll_to_index(&frame, Axis::Horizontal, 1, ScrollEdge::Leading), 0.0);
    }

    #[test]
    fn test_trailing_compensation_only_beyond_rendered() {
        let mut settings = frozen_left(2);
        settings.trailing_edge_compensation = 3.0;
        let mut fixture = Fixture::new(settings, 220.0, 300.0);
        fixture.ranges.columns = Some(RenderRange {
            start: 2,
            end: 5,
            start_position: 100.0,
        });
        let (left, _surface) = pane(PaneKind::Left, &fixture.settings);
        let frame = fixture.frame();

        assert_eq!(left.scroll_to_index(&frame, Axis::Horizontal, 9, ScrollEdge::Trailing), 283.0);
        assert_eq!(left.scroll_to_index(&frame, Axis::Horizontal, 5, ScrollEdge::Trailing), 80.0);
    }

    #[test]
    fn test_sync_mirrors_main_scroll() {
        let mut fixture = Fixture::new(frozen_left(2), 220.0, 100.0);
        fixture.viewport.scroll_top = 46.0;
        let (mut left, surface) = pane(PaneKind::Left, &fixture.settings);

        left.sync_offset_across_pinned_axis(&fixture.frame());
        left.flush();
        assert_eq!(surface.metrics().scroll_top, 46.0);
        assert_eq!(surface.metrics().scroll_left, 0.0);
    }
}
