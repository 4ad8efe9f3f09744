//! `PaneView`: the WASM-exported entry point for DOM hosts.
//!
//! The host owns the main table: a scrolling holder element with a spreader
//! child it renders cells into. `PaneView` creates the pinned clones next to
//! it, keeps them aligned on every native scroll event, and reports render
//! ranges back through callbacks so the host knows which cells to draw.

mod listener;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, HtmlElement};

use crate::error::Result;
use crate::overlay::Overlays;
use crate::scroll::ScrollEdge;
use crate::settings::{GridSettings, ScrollContainer};
use crate::surface::{DomSurface, DomSurfaceProvider};

use listener::{Callbacks, JsListener};

type ScrollClosure = Closure<dyn FnMut(web_sys::Event)>;

/// Frozen-pane overlays for a DOM grid.
#[wasm_bindgen]
pub struct PaneView {
    overlays: Rc<RefCell<Overlays>>,
    callbacks: Rc<RefCell<Callbacks>>,
    holder: HtmlElement,
    scroll_target: EventTarget,
    scroll_closure: Option<ScrollClosure>,
}

#[wasm_bindgen]
impl PaneView {
    /// Create overlays for the table in `holder`/`spreader`; clones are
    /// appended to `container`. `settings` is a `GridSettings` object.
    ///
    /// # Errors
    /// Returns an error if the settings are invalid or there is no document.
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: HtmlElement,
        holder: HtmlElement,
        spreader: HtmlElement,
        settings: JsValue,
    ) -> std::result::Result<PaneView, JsValue> {
        console_error_panic_hook::set_once();

        let settings: GridSettings = serde_wasm_bindgen::from_value(settings)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let mut provider =
            DomSurfaceProvider::new(document.clone(), container, holder.clone(), spreader);
        let mut overlays = Overlays::new(settings, &mut provider)?;

        let page_scrolls = overlays.settings().scroll_container == ScrollContainer::Window;
        if page_scrolls {
            if let Some(root) = document
                .scrolling_element()
                .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            {
                overlays.set_scroll_target(Box::new(DomSurface::new(root.clone(), root)));
            }
        }

        let callbacks = Rc::new(RefCell::new(Callbacks::default()));
        overlays.add_listener(Box::new(JsListener::new(Rc::clone(&callbacks))));
        overlays.on_resize(
            f64::from(holder.client_width()),
            f64::from(holder.client_height()),
        )?;

        let scroll_target: EventTarget = if page_scrolls {
            window.into()
        } else {
            holder.clone().into()
        };
        let mut view = Self {
            overlays: Rc::new(RefCell::new(overlays)),
            callbacks,
            holder,
            scroll_target,
            scroll_closure: None,
        };
        view.attach_scroll_listener();
        Ok(view)
    }

    fn attach_scroll_listener(&mut self) {
        let weak = Rc::downgrade(&self.overlays);
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let Some(overlays) = weak.upgrade() else {
                return;
            };
            // A callback may scroll the holder while a refresh is running
            let Ok(mut overlays) = overlays.try_borrow_mut() else {
                tracing::debug!("scroll event during refresh ignored");
                return;
            };
            if let Err(err) = overlays.on_surface_scroll() {
                tracing::error!("scroll refresh failed: {err}");
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        if let Err(err) = self
            .scroll_target
            .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
        {
            tracing::warn!("failed to attach scroll listener: {err:?}");
        }
        self.scroll_closure = Some(closure);
    }

    fn with_overlays<T>(
        &self,
        apply: impl FnOnce(&mut Overlays) -> Result<T>,
    ) -> std::result::Result<T, JsValue> {
        let mut overlays = self
            .overlays
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("refresh already in progress"))?;
        apply(&mut overlays).map_err(JsValue::from)
    }

    /// Re-measure the holder and refresh.
    ///
    /// # Errors
    /// Returns an error if a pane cannot position its content.
    #[wasm_bindgen]
    pub fn resize(&mut self) -> std::result::Result<(), JsValue> {
        let width = f64::from(self.holder.client_width());
        let height = f64::from(self.holder.client_height());
        self.with_overlays(|overlays| overlays.on_resize(width, height))
    }

    /// Recompute and reposition every pane.
    ///
    /// # Errors
    /// Returns an error if a pane cannot position its content.
    #[wasm_bindgen]
    pub fn refresh(&mut self, force: bool) -> std::result::Result<(), JsValue> {
        self.with_overlays(|overlays| overlays.refresh(force))
    }

    /// Replace the settings.
    ///
    /// # Errors
    /// Returns an error if the settings are invalid.
    #[wasm_bindgen(js_name = "updateSettings")]
    pub fn update_settings(&mut self, settings: JsValue) -> std::result::Result<(), JsValue> {
        let settings: GridSettings = serde_wasm_bindgen::from_value(settings)?;
        self.with_overlays(|overlays| overlays.update_settings(settings))
    }

    /// Scroll by a pixel delta; returns the applied `[dx, dy]`.
    ///
    /// # Errors
    /// Returns an error if a pane cannot position its content.
    #[wasm_bindgen(js_name = "scrollBy")]
    pub fn scroll_by(&mut self, delta_x: f64, delta_y: f64) -> std::result::Result<JsValue, JsValue> {
        let applied = self.with_overlays(|overlays| overlays.scroll_by(delta_x, delta_y))?;
        Ok(serde_wasm_bindgen::to_value(&applied)?)
    }

    /// Bring a cell into view. `edge` is `"leading"`, `"trailing"` or undefined
    /// for the minimal scroll.
    ///
    /// # Errors
    /// Returns an error if `edge` is not recognized.
    #[wasm_bindgen(js_name = "scrollToCell")]
    pub fn scroll_to_cell(
        &mut self,
        row: u32,
        column: u32,
        edge: JsValue,
    ) -> std::result::Result<(), JsValue> {
        let edge: Option<ScrollEdge> = serde_wasm_bindgen::from_value(edge)?;
        self.with_overlays(|overlays| overlays.scroll_to_cell(row, column, edge))
    }

    /// Current render ranges (`{ rows, columns }`).
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    #[wasm_bindgen]
    pub fn ranges(&self) -> std::result::Result<JsValue, JsValue> {
        let ranges = self.overlays.borrow().ranges();
        Ok(serde_wasm_bindgen::to_value(&ranges)?)
    }

    /// Viewport, ranges and pane geometry.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    #[wasm_bindgen]
    pub fn snapshot(&self) -> std::result::Result<JsValue, JsValue> {
        let snapshot = self.overlays.borrow().snapshot();
        Ok(serde_wasm_bindgen::to_value(&snapshot)?)
    }

    /// `[row, column]` under a point relative to the holder, or undefined.
    #[wasm_bindgen(js_name = "cellAt")]
    pub fn cell_at(&self, x: f64, y: f64) -> Option<Vec<u32>> {
        self.overlays
            .borrow()
            .cell_at_screen(x, y)
            .map(|(row, col)| vec![row, col])
    }

    /// Called with `{ axis, scrollLeft, scrollTop, delta }` whenever the scroll position moves.
    #[wasm_bindgen(js_name = "setScrollCallback")]
    pub fn set_scroll_callback(&mut self, callback: Option<Function>) {
        self.callbacks.borrow_mut().scroll = callback;
    }

    /// Called with `{ rows, columns }` whenever the render ranges change.
    #[wasm_bindgen(js_name = "setRangesCallback")]
    pub fn set_ranges_callback(&mut self, callback: Option<Function>) {
        self.callbacks.borrow_mut().ranges = callback;
    }
}

impl Drop for PaneView {
    fn drop(&mut self) {
        if let Some(closure) = self.scroll_closure.take() {
            let _ = self
                .scroll_target
                .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
        }
    }
}
