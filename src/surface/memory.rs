//! Headless surface used by the CLI, the JSON export and the tests.
//!
//! A `MemorySurface` is a cheap handle onto shared state, so a test can keep a
//! clone of the handle after the coordinator has taken ownership of the boxed
//! surface and inspect what was written.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{AxisPair, Extent, Surface, SurfaceMetrics, SurfaceProvider};
use crate::layout::Axis;
use crate::overlay::PaneKind;

/// Everything written to a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub attached: bool,
    /// Natural size reported while the outer size is `Auto`
    pub natural_width: f64,
    pub natural_height: f64,
    pub width: Extent,
    pub height: Extent,
    pub content_offset: AxisPair<Option<f64>>,
    pub position: AxisPair<Option<f64>>,
    pub scroll: AxisPair<f64>,
    pub padding_end: AxisPair<f64>,
    pub static_offset: AxisPair<f64>,
    /// Number of write calls received
    pub writes: u32,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            attached: true,
            natural_width: 0.0,
            natural_height: 0.0,
            width: Extent::Auto,
            height: Extent::Auto,
            content_offset: AxisPair::default(),
            position: AxisPair::default(),
            scroll: AxisPair::default(),
            padding_end: AxisPair::default(),
            static_offset: AxisPair::default(),
            writes: 0,
        }
    }
}

/// In-memory [`Surface`] sharing its state between clones.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    state: Rc<RefCell<SurfaceState>>,
}

impl MemorySurface {
    /// An attached surface with the given natural size.
    pub fn attached(natural_width: f64, natural_height: f64) -> Self {
        let surface = Self::default();
        {
            let mut state = surface.state.borrow_mut();
            state.natural_width = natural_width;
            state.natural_height = natural_height;
        }
        surface
    }

    /// A surface that is not part of any layout tree.
    pub fn detached() -> Self {
        let surface = Self::default();
        surface.state.borrow_mut().attached = false;
        surface
    }

    /// Copy of the current state.
    pub fn state(&self) -> SurfaceState {
        self.state.borrow().clone()
    }

    /// Attach or detach the surface.
    pub fn set_attached(&self, attached: bool) {
        self.state.borrow_mut().attached = attached;
    }

    /// Set the parent-relative static offset (e.g. the grid's offset in the page).
    pub fn set_static_offset(&self, axis: Axis, offset: f64) {
        self.state.borrow_mut().static_offset.set(axis, offset);
    }

    /// Simulate a native scroll (user input) without counting it as a write.
    pub fn scroll_natively(&self, axis: Axis, offset: f64) {
        self.state.borrow_mut().scroll.set(axis, offset);
    }

    fn write(&self, apply: impl FnOnce(&mut SurfaceState)) {
        let mut state = self.state.borrow_mut();
        apply(&mut state);
        state.writes += 1;
    }
}

impl Surface for MemorySurface {
    fn metrics(&self) -> SurfaceMetrics {
        let state = self.state.borrow();
        if !state.attached {
            return SurfaceMetrics::detached();
        }
        SurfaceMetrics {
            attached: true,
            width: state.width.px().unwrap_or(state.natural_width),
            height: state.height.px().unwrap_or(state.natural_height),
            scroll_left: state.scroll.horizontal,
            scroll_top: state.scroll.vertical,
            offset_left: state.static_offset.horizontal,
            offset_top: state.static_offset.vertical,
        }
    }

    fn set_outer_size(&mut self, axis: Axis, extent: Extent) {
        self.write(|state| match axis {
            Axis::Horizontal => state.width = extent,
            Axis::Vertical => state.height = extent,
        });
    }

    fn set_content_offset(&mut self, axis: Axis, offset: Option<f64>) {
        self.write(|state| state.content_offset.set(axis, offset));
    }

    fn set_position(&mut self, axis: Axis, position: Option<f64>) {
        self.write(|state| state.position.set(axis, position));
    }

    fn set_scroll_offset(&mut self, axis: Axis, offset: f64) {
        self.write(|state| state.scroll.set(axis, offset));
    }

    fn set_padding_end(&mut self, axis: Axis, padding: f64) {
        self.write(|state| state.padding_end.set(axis, padding));
    }
}

/// Hands out [`MemorySurface`]s and remembers a handle per pane kind.
#[derive(Debug, Clone, Default)]
pub struct MemorySurfaceProvider {
    surfaces: HashMap<PaneKind, MemorySurface>,
    natural_width: f64,
    natural_height: f64,
}

impl MemorySurfaceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Natural size reported by surfaces created from now on.
    pub fn with_natural_size(mut self, width: f64, height: f64) -> Self {
        self.natural_width = width;
        self.natural_height = height;
        self
    }

    /// Handle onto the surface created for `kind`.
    pub fn surface(&self, kind: PaneKind) -> Option<MemorySurface> {
        self.surfaces.get(&kind).cloned()
    }
}

impl SurfaceProvider for MemorySurfaceProvider {
    fn create_surface(&mut self, kind: PaneKind) -> Box<dyn Surface> {
        let surface = MemorySurface::attached(self.natural_width, self.natural_height);
        self.surfaces.insert(kind, surface.clone());
        Box::new(surface)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_surface_reports_nothing() {
        let surface = MemorySurface::detached();
        let metrics = surface.metrics();
        assert!(!metrics.attached);
        assert_eq!(metrics.width, 0.0);
    }

    #[test]
    fn test_clones_share_state() {
        let mut surface = MemorySurface::attached(10.0, 10.0);
        let handle = surface.clone();
        surface.set_outer_size(Axis::Horizontal, Extent::Px(120.0));
        assert_eq!(handle.metrics().width, 120.0);
        assert_eq!(handle.state().writes, 1);
    }

    #[test]
    fn test_provider_keeps_handles() {
        let mut provider = MemorySurfaceProvider::new().with_natural_size(5.0, 6.0);
        let boxed = provider.create_surface(PaneKind::Left);
        assert_eq!(boxed.metrics().height, 6.0);
        assert!(provider.surface(PaneKind::Left).is_some());
        assert!(provider.surface(PaneKind::Top).is_none());
    }
}
