//! DOM implementations of the host capabilities.

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement};

use crate::host::{header_pane_first, MeasureRoot, MeasuredRow, ScrollMetrics, ScrollSurface};
use crate::scroll::{find_scroll_parent, StickyGeometry};

/// Attribute naming the pane an element hosts (`header`, `body`, `left`, ...).
pub(crate) const PANE_ATTR: &str = "data-tablesync-pane";
/// Attribute carrying a rendered row's key.
pub(crate) const ROW_KEY_ATTR: &str = "data-row-key";

fn read_f64(element: &Element, prop: &str) -> Option<f64> {
    Reflect::get(element.as_ref(), &JsValue::from_str(prop))
        .ok()
        .and_then(|value| value.as_f64())
}

// Reflect keeps sub-pixel offsets that the i32 setters would truncate.
fn write_f64(element: &Element, prop: &str, px: f64) {
    let _ = Reflect::set(element.as_ref(), &JsValue::from_str(prop), &JsValue::from_f64(px));
}

/// A pane element whose scroll offsets are read and written directly.
#[derive(Debug, Clone)]
pub(crate) struct DomPane {
    element: Element,
}

impl DomPane {
    pub(crate) fn new(element: Element) -> Self {
        Self { element }
    }
}

impl ScrollSurface for DomPane {
    fn metrics(&self) -> ScrollMetrics {
        let el = &self.element;
        ScrollMetrics {
            scroll_left: read_f64(el, "scrollLeft").unwrap_or_default(),
            scroll_top: read_f64(el, "scrollTop").unwrap_or_default(),
            scroll_width: f64::from(el.scroll_width()),
            client_width: f64::from(el.client_width()),
            scroll_height: f64::from(el.scroll_height()),
            client_height: f64::from(el.client_height()),
        }
    }

    fn set_scroll_left(&self, px: f64) {
        write_f64(&self.element, "scrollLeft", px);
    }

    fn set_scroll_top(&self, px: f64) {
        write_f64(&self.element, "scrollTop", px);
    }

    fn is_mounted(&self) -> bool {
        self.element.is_connected()
    }
}

/// The main pane's table, measured after the host has committed layout.
pub(crate) struct DomMeasureRoot<'a> {
    pub(crate) table: &'a Element,
    /// The pinned header pane, when the header renders as its own table
    pub(crate) header: Option<Element>,
}

impl<'a> DomMeasureRoot<'a> {
    pub(crate) fn new(table: &'a Element) -> Self {
        let header = table
            .query_selector(&format!("[{PANE_ATTR}=\"header\"]"))
            .ok()
            .flatten();
        Self { table, header }
    }
}

fn offset_height(element: &Element) -> Option<f64> {
    element
        .dyn_ref::<HtmlElement>()
        .map(|el| f64::from(el.offset_height()))
}

impl MeasureRoot for DomMeasureRoot<'_> {
    fn header_heights(&self) -> Vec<Option<f64>> {
        let Ok(heads) = self.table.query_selector_all("thead") else {
            return Vec::new();
        };
        let sections = (0..heads.length()).filter_map(|i| heads.item(i)).map(|node| {
            let in_header = self
                .header
                .as_ref()
                .is_some_and(|header| header.contains(Some(&node)));
            (in_header, node.dyn_ref::<Element>().and_then(offset_height))
        });
        header_pane_first(sections)
    }

    fn body_rows(&self) -> Vec<MeasuredRow> {
        let Ok(rows) = self.table.query_selector_all(&format!("[{ROW_KEY_ATTR}]")) else {
            return Vec::new();
        };
        (0..rows.length())
            .filter_map(|i| rows.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(|el| {
                let key = el.get_attribute(ROW_KEY_ATTR)?;
                Some(match offset_height(&el) {
                    Some(h) if el.is_connected() => MeasuredRow::new(key, h),
                    _ => MeasuredRow::unmounted(key),
                })
            })
            .collect()
    }
}

/// Closest scrolling ancestor of `element`, the element itself included.
pub(crate) fn scroll_parent(element: &Element) -> Option<Element> {
    find_scroll_parent(
        Some(element.clone()),
        |el: &Element| el.parent_element(),
        |el: &Element| el.scroll_height() > el.client_height(),
    )
}

/// Placement of the table relative to the visible part of `container`.
pub(crate) fn sticky_geometry(table: &Element, container: &Element, is_window: bool) -> StickyGeometry {
    let rect = table.get_bounding_client_rect();
    let viewport_bottom = if is_window {
        web_sys::window()
            .and_then(|w| w.inner_height().ok())
            .and_then(|h| h.as_f64())
            .unwrap_or_default()
    } else {
        let bounds = container.get_bounding_client_rect();
        bounds.top() + f64::from(container.client_height())
    };
    StickyGeometry {
        table_top: rect.top(),
        table_height: rect.height(),
        viewport_bottom,
    }
}

/// Top of `element` relative to its offset parent.
pub(crate) fn offset_top(element: &Element) -> f64 {
    element
        .dyn_ref::<HtmlElement>()
        .map(|el| f64::from(el.offset_top()))
        .unwrap_or_default()
}
