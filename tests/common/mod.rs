//! Common test utilities for the overlay integration tests.
//!
//! `Harness` wires an `Overlays` instance to memory surfaces and keeps the
//! provider around so tests can inspect what each pane's surface received.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use paneview::overlay::{FrameRanges, OverlayListener, Overlays, PaneKind, ScrollNotification};
use paneview::surface::{MemorySurface, MemorySurfaceProvider};
use paneview::GridSettings;

// ============================================================================
// Settings Helpers
// ============================================================================

/// Grid of `rows` x `cols` default-sized cells.
#[must_use]
pub fn grid(rows: u32, cols: u32) -> GridSettings {
    GridSettings::new(rows, cols)
}

/// 10 columns of 50px with the first two frozen, as in the Left-pane scenarios.
#[must_use]
pub fn frozen_left_grid(rows: u32) -> GridSettings {
    let mut settings = GridSettings::new(rows, 10);
    settings.frozen_columns_left = 2;
    settings
}

// ============================================================================
// Harness
// ============================================================================

/// Overlays backed by memory surfaces.
pub struct Harness {
    pub overlays: Overlays,
    pub provider: MemorySurfaceProvider,
}

impl Harness {
    /// Build and size the overlays, which runs the first refresh.
    pub fn new(settings: GridSettings, width: f64, height: f64) -> Self {
        let mut harness = Self::r#unsized(settings);
        harness.overlays.on_resize(width, height).expect("resize failed");
        harness
    }

    /// Build the overlays without running any refresh.
    pub fn r#unsized(settings: GridSettings) -> Self {
        let mut provider = MemorySurfaceProvider::new();
        let overlays = Overlays::new(settings, &mut provider).expect("invalid settings");
        Self { overlays, provider }
    }

    /// Handle onto the surface created for `kind`.
    pub fn surface(&self, kind: PaneKind) -> MemorySurface {
        self.provider
            .surface(kind)
            .unwrap_or_else(|| panic!("no surface for {kind:?}"))
    }

    /// Total number of writes received by every surface.
    pub fn total_writes(&self) -> u32 {
        PaneKind::ALL
            .iter()
            .filter_map(|kind| self.provider.surface(*kind))
            .map(|surface| surface.state().writes)
            .sum()
    }
}

// ============================================================================
// Listener
// ============================================================================

/// Records every notification it receives.
#[derive(Clone, Default)]
pub struct Recorder {
    pub scrolls: Rc<RefCell<Vec<ScrollNotification>>>,
    pub ranges: Rc<RefCell<Vec<FrameRanges>>>,
}

impl Recorder {
    pub fn scroll_count(&self) -> usize {
        self.scrolls.borrow().len()
    }

    pub fn ranges_count(&self) -> usize {
        self.ranges.borrow().len()
    }
}

impl OverlayListener for Recorder {
    fn on_scroll(&mut self, event: &ScrollNotification) {
        self.scrolls.borrow_mut().push(*event);
    }

    fn on_ranges(&mut self, ranges: &FrameRanges) {
        self.ranges.borrow_mut().push(*ranges);
    }
}
