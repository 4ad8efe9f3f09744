//! DOM-backed surfaces (wasm32 only).
//!
//! Each pane is a holder element (outer size, position, native scroll) with a
//! single spreader child that carries the content offset. Cell rendering into
//! the spreader is left to the host.

use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use super::{Extent, MemorySurface, Surface, SurfaceMetrics, SurfaceProvider};
use crate::layout::Axis;
use crate::overlay::PaneKind;

fn read_f64(element: &HtmlElement, key: &str, fallback: i32) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(f64::from(fallback))
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(err) = element.style().set_property(property, value) {
        tracing::warn!("failed to set {property}: {err:?}");
    }
}

fn px(value: f64) -> String {
    format!("{value}px")
}

/// A pane surface made of a holder and a spreader element.
pub struct DomSurface {
    holder: HtmlElement,
    spreader: HtmlElement,
}

impl DomSurface {
    pub fn new(holder: HtmlElement, spreader: HtmlElement) -> Self {
        Self { holder, spreader }
    }

    /// The element the host renders cells into.
    pub fn spreader(&self) -> &HtmlElement {
        &self.spreader
    }

    /// The element that owns size and scroll.
    pub fn holder(&self) -> &HtmlElement {
        &self.holder
    }
}

impl Surface for DomSurface {
    fn metrics(&self) -> SurfaceMetrics {
        if !self.holder.is_connected() {
            return SurfaceMetrics::detached();
        }
        SurfaceMetrics {
            attached: true,
            width: f64::from(self.holder.offset_width()),
            height: f64::from(self.holder.offset_height()),
            scroll_left: read_f64(&self.holder, "scrollLeft", self.holder.scroll_left()),
            scroll_top: read_f64(&self.holder, "scrollTop", self.holder.scroll_top()),
            offset_left: f64::from(self.holder.offset_left()),
            offset_top: f64::from(self.holder.offset_top()),
        }
    }

    fn set_outer_size(&mut self, axis: Axis, extent: Extent) {
        let property = match axis {
            Axis::Horizontal => "width",
            Axis::Vertical => "height",
        };
        match extent {
            Extent::Px(value) => set_style(&self.holder, property, &px(value)),
            Extent::Auto => set_style(&self.holder, property, ""),
        }
    }

    fn set_content_offset(&mut self, axis: Axis, offset: Option<f64>) {
        let property = match axis {
            Axis::Horizontal => "left",
            Axis::Vertical => "top",
        };
        let value = offset.map(px).unwrap_or_default();
        set_style(&self.spreader, property, &value);
    }

    fn set_position(&mut self, axis: Axis, position: Option<f64>) {
        let property = match axis {
            Axis::Horizontal => "left",
            Axis::Vertical => "top",
        };
        let value = position.map(px).unwrap_or_default();
        set_style(&self.holder, property, &value);
    }

    fn set_scroll_offset(&mut self, axis: Axis, offset: f64) {
        let key = match axis {
            Axis::Horizontal => "scrollLeft",
            Axis::Vertical => "scrollTop",
        };
        if Reflect::set(
            self.holder.as_ref(),
            &JsValue::from_str(key),
            &JsValue::from_f64(offset),
        )
        .is_err()
        {
            tracing::warn!("failed to set {key}");
        }
    }

    fn set_padding_end(&mut self, axis: Axis, padding: f64) {
        let property = match axis {
            Axis::Horizontal => "padding-right",
            Axis::Vertical => "padding-bottom",
        };
        set_style(&self.holder, property, &px(padding));
    }
}

/// Builds pane clones inside a container element.
pub struct DomSurfaceProvider {
    document: Document,
    container: HtmlElement,
    master: Option<(HtmlElement, HtmlElement)>,
}

impl DomSurfaceProvider {
    /// `master_holder` / `master_spreader` are the host's existing main table
    /// elements; clones are appended to `container`.
    pub fn new(
        document: Document,
        container: HtmlElement,
        master_holder: HtmlElement,
        master_spreader: HtmlElement,
    ) -> Self {
        Self {
            document,
            container,
            master: Some((master_holder, master_spreader)),
        }
    }

    fn create_div(&self, class: &str) -> Result<HtmlElement, JsValue> {
        let element = self
            .document
            .create_element("div")?
            .dyn_into::<HtmlElement>()
            .map_err(JsValue::from)?;
        element.set_class_name(class);
        Ok(element)
    }

    fn make_clone(&self, kind: PaneKind) -> Result<DomSurface, JsValue> {
        let holder = self.create_div(&format!("paneview-overlay paneview-{}", kind.name()))?;
        let spreader = self.create_div("paneview-spreader")?;
        set_style(&holder, "position", "absolute");
        set_style(&holder, "overflow", "hidden");
        set_style(&spreader, "position", "relative");
        holder.append_child(&spreader)?;
        self.container.append_child(&holder)?;
        Ok(DomSurface::new(holder, spreader))
    }
}

impl SurfaceProvider for DomSurfaceProvider {
    fn create_surface(&mut self, kind: PaneKind) -> Box<dyn Surface> {
        if kind == PaneKind::Master {
            if let Some((holder, spreader)) = self.master.take() {
                return Box::new(DomSurface::new(holder, spreader));
            }
        }
        match self.make_clone(kind) {
            Ok(surface) => Box::new(surface),
            Err(err) => {
                tracing::warn!("failed to create {} overlay: {err:?}", kind.name());
                Box::new(MemorySurface::detached())
            }
        }
    }
}
