//! Scroll proxy: native scroll offsets <-> logical scroll position.
//!
//! The native offset reported by the scroll container differs from the
//! logical offset the render calculators use when the page itself scrolls
//! (the grid's static offset inside the page is part of the native value).
//! The proxy also decides which scrollbars are showing, since that decides
//! how much of the visible size is usable.

use serde::{Deserialize, Serialize};

use crate::layout::{Axis, GridLayout, ViewportState};
use crate::settings::{GridSettings, PreventOverflow, ScrollContainer};
use crate::surface::{Surface, SurfaceMetrics, SurfaceUpdate};

/// Which native scrollbars are showing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scrollbars {
    pub horizontal: bool,
    pub vertical: bool,
    /// Scrollbar thickness in pixels
    pub size: f64,
}

impl Scrollbars {
    /// Pixels taken from the visible extent along `axis` by the crossing scrollbar.
    pub fn allowance(&self, axis: Axis) -> f64 {
        let showing = match axis {
            Axis::Horizontal => self.vertical,
            Axis::Vertical => self.horizontal,
        };
        if showing {
            self.size
        } else {
            0.0
        }
    }
}

/// Native scroll offsets as reported by the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NativeScroll {
    pub left: f64,
    pub top: f64,
}

/// Edge of the viewport a scroll-to target is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollEdge {
    #[default]
    Leading,
    Trailing,
}

/// One-shot scroll-to request along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollAnchor {
    pub index: u32,
    pub edge: ScrollEdge,
}

impl ScrollAnchor {
    pub fn leading(index: u32) -> Self {
        Self {
            index,
            edge: ScrollEdge::Leading,
        }
    }

    pub fn trailing(index: u32) -> Self {
        Self {
            index,
            edge: ScrollEdge::Trailing,
        }
    }
}

/// Translates between native and logical scroll offsets.
pub struct ScrollProxy {
    container: ScrollContainer,
    prevent_overflow: PreventOverflow,
    scrollbar_size: f64,
    /// Override scroll element, injected once at setup
    target: Option<Box<dyn Surface>>,
    pending: SurfaceUpdate,
}

impl std::fmt::Debug for ScrollProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollProxy")
            .field("container", &self.container)
            .field("prevent_overflow", &self.prevent_overflow)
            .field("scrollbar_size", &self.scrollbar_size)
            .field("has_target", &self.target.is_some())
            .finish()
    }
}

impl ScrollProxy {
    pub fn new(settings: &GridSettings) -> Self {
        Self {
            container: settings.scroll_container,
            prevent_overflow: settings.prevent_overflow,
            scrollbar_size: settings.scrollbar_size,
            target: None,
            pending: SurfaceUpdate::default(),
        }
    }

    /// Use `target` as the scroll element instead of the main pane's surface.
    pub fn with_target(mut self, target: Box<dyn Surface>) -> Self {
        self.target = Some(target);
        self
    }

    pub fn set_target(&mut self, target: Box<dyn Surface>) {
        self.target = Some(target);
    }

    pub fn update_settings(&mut self, settings: &GridSettings) {
        self.container = settings.scroll_container;
        self.prevent_overflow = settings.prevent_overflow;
        self.scrollbar_size = settings.scrollbar_size;
    }

    /// Measurements of the override target, if one is injected.
    pub fn target_metrics(&self) -> Option<SurfaceMetrics> {
        self.target.as_ref().map(|target| target.metrics())
    }

    /// Native scroll offset of the override target along `axis`.
    pub fn observed(&self, axis: Axis) -> Option<f64> {
        self.target_metrics().map(|metrics| metrics.scroll(axis))
    }

    /// Decide which scrollbars show, stretching columns into the remaining width.
    ///
    /// The vertical scrollbar narrows the workspace, which changes stretched
    /// widths, which can bring in the horizontal scrollbar, which shortens the
    /// workspace: at most one extra pass settles it.
    pub fn resolve_scrollbars(&self, layout: &mut GridLayout, viewport: &ViewportState) -> Scrollbars {
        let size = self.scrollbar_size;
        let content_height = layout.content_extent(Axis::Vertical);
        let mut vertical = content_height > viewport.visible_height;
        let width_for = |vertical: bool| viewport.visible_width - if vertical { size } else { 0.0 };

        layout.stretch_columns(width_for(vertical));
        let mut horizontal = layout.content_extent(Axis::Horizontal) > width_for(vertical);

        if horizontal && !vertical && content_height > viewport.visible_height - size {
            vertical = true;
            layout.stretch_columns(width_for(vertical));
            horizontal = layout.content_extent(Axis::Horizontal) > width_for(vertical);
        }

        Scrollbars {
            horizontal,
            vertical,
            size,
        }
    }

    /// True when the container's static offset is part of the native offset along `axis`.
    pub fn applies_parent_offset(&self, axis: Axis) -> bool {
        let prevented = match axis {
            Axis::Horizontal => self.prevent_overflow == PreventOverflow::Horizontal,
            Axis::Vertical => self.prevent_overflow == PreventOverflow::Vertical,
        };
        self.container == ScrollContainer::Window && !prevented
    }

    /// Native offset to logical offset along `axis`.
    pub fn to_logical(&self, axis: Axis, native: f64, parent_offset: f64) -> f64 {
        let logical = if self.applies_parent_offset(axis) {
            native - parent_offset
        } else {
            native
        };
        if logical.is_finite() {
            logical.max(0.0)
        } else {
            0.0
        }
    }

    /// Logical offset to native offset along `axis`.
    pub fn to_native(&self, axis: Axis, logical: f64, parent_offset: f64) -> f64 {
        if self.applies_parent_offset(axis) {
            logical + parent_offset
        } else {
            logical
        }
    }

    /// Normalize a native scroll event into logical `(left, top)`.
    pub fn normalize(&self, native: NativeScroll, parent_offset: (f64, f64)) -> (f64, f64) {
        (
            self.to_logical(Axis::Horizontal, native.left, parent_offset.0),
            self.to_logical(Axis::Vertical, native.top, parent_offset.1),
        )
    }

    /// Queue a native write-back on the override target. Returns false when no
    /// target is injected and the caller has to write to the main pane instead.
    pub fn queue_write_back(&mut self, axis: Axis, native: f64) -> bool {
        if self.target.is_none() {
            return false;
        }
        self.pending.scroll_offset.set(axis, Some(native));
        true
    }

    /// Apply queued writes to the override target.
    pub fn flush(&mut self) {
        if let Some(target) = self.target.as_deref_mut() {
            self.pending.flush(target);
        }
    }

    /// Drop queued writes without applying them.
    pub(crate) fn discard_pending(&mut self) {
        self.pending = SurfaceUpdate::default();
    }
}
