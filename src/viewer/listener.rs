//! Bridges overlay notifications to JavaScript callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::overlay::{FrameRanges, OverlayListener, ScrollNotification};

/// Callbacks registered from JavaScript.
#[derive(Default)]
pub(crate) struct Callbacks {
    pub(crate) scroll: Option<Function>,
    pub(crate) ranges: Option<Function>,
}

/// Forwards notifications to whatever callbacks are registered at call time.
pub(crate) struct JsListener {
    callbacks: Rc<RefCell<Callbacks>>,
}

impl JsListener {
    pub(crate) fn new(callbacks: Rc<RefCell<Callbacks>>) -> Self {
        Self { callbacks }
    }
}

fn invoke<T: Serialize>(callback: Option<Function>, payload: &T) {
    let Some(callback) = callback else {
        return;
    };
    match serde_wasm_bindgen::to_value(payload) {
        Ok(value) => {
            if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                tracing::warn!("listener callback threw: {err:?}");
            }
        }
        Err(err) => tracing::warn!("failed to serialize notification: {err}"),
    }
}

impl OverlayListener for JsListener {
    fn on_scroll(&mut self, event: &ScrollNotification) {
        let callback = self.callbacks.borrow().scroll.clone();
        invoke(callback, event);
    }

    fn on_ranges(&mut self, ranges: &FrameRanges) {
        let callback = self.callbacks.borrow().ranges.clone();
        invoke(callback, ranges);
    }
}
