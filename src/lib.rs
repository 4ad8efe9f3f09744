//! paneview - frozen panes for virtualized grids
//!
//! Keeps the pinned regions of a very large grid (frozen columns, frozen top
//! and bottom rows, row and column headers, and their corners) aligned with
//! the main scrolling region:
//! - Render range calculation per axis with overscan
//! - Column stretching and scrollbar allowances
//! - Per-pane geometry, content offsets and scroll synchronization
//! - Scroll-to-cell and relative scrolling through a scroll proxy
//!
//! The engine talks to render surfaces through the [`surface::Surface`]
//! trait: `DomSurface` drives HTML elements in the browser, `MemorySurface`
//! keeps everything in memory for headless hosts and tests.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { PaneView } from 'paneview';
//! await init();
//! const view = new PaneView(container, holder, spreader, {
//!   totalRows: 100000, totalColumns: 50, frozenColumnsLeft: 2,
//! });
//! view.setRangesCallback(({ rows, columns }) => renderCells(rows, columns));
//! ```

pub mod error;
pub mod layout;
pub mod overlay;
pub mod scroll;
pub mod settings;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{PaneError, Result};
pub use layout::{Axis, GridLayout, RenderRange, ViewportState};
pub use overlay::{
    FrameRanges, OverlayListener, OverlaySnapshot, Overlays, PaneKind, PaneOverlay,
    ScrollNotification,
};
pub use scroll::{NativeScroll, ScrollAnchor, ScrollEdge};
pub use settings::GridSettings;

#[cfg(target_arch = "wasm32")]
pub use viewer::PaneView;

/// Run the overlay engine headlessly and return its state.
///
/// Panes are backed by memory surfaces; `scroll` is treated as a native
/// scroll event after sizing the viewport to `width` x `height`.
///
/// # Errors
/// Returns an error if the settings are invalid or a pane cannot position its content.
pub fn compute_snapshot(
    settings: GridSettings,
    width: f64,
    height: f64,
    scroll: NativeScroll,
) -> Result<OverlaySnapshot> {
    let mut provider = surface::MemorySurfaceProvider::new();
    let mut overlays = Overlays::new(settings, &mut provider)?;
    overlays.on_resize(width, height)?;
    overlays.on_scroll(scroll)?;
    Ok(overlays.snapshot())
}

/// Compute overlay geometry for a settings JSON string and return it as JSON.
///
/// # Errors
/// Returns an error if the settings are invalid or a pane cannot position its content.
#[wasm_bindgen]
pub fn compute_overlays_json(
    settings_json: &str,
    width: f64,
    height: f64,
    scroll_left: f64,
    scroll_top: f64,
) -> std::result::Result<String, JsValue> {
    let settings =
        GridSettings::from_json(settings_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let scroll = NativeScroll {
        left: scroll_left,
        top: scroll_top,
    };
    compute_snapshot(settings, width, height, scroll)
        .and_then(|snapshot| snapshot.to_json())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
