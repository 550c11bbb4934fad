//! `TableView` - the wasm-exported DOM host.
//!
//! JavaScript renders the markup from [`TableView::render_model`] and marks
//! pane elements with `data-tablesync-pane` (the pinned header pane sits inside
//! the `data-tablesync-main` wrapper); `TableView` then owns:
//! - Scroll listeners on every pane, routed through the scroll hub
//! - The sticky scrollbar drag and scrolling-ancestor listeners
//! - A resize observer driving the full-table resize path
//! - Row-height measurement of the main pane after each committed render
//!
//! Listeners are removed and the observer disconnected on `dispose` or drop.

mod console;
mod dom;
mod events;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::layout::PaneKind;
use crate::render::JsonRenderer;
use crate::scroll::PaneId;
use crate::table::Table;
use crate::types::{Column, RowKey, TableConfig};
use dom::{offset_top, scroll_parent, DomMeasureRoot, PANE_ATTR};
use events::{Listener, Observer};

/// Marks the main pane's wrapper, the one measured for row heights.
const MAIN_ATTR: &str = "data-tablesync-main";

/// Shared state that can be accessed by event handlers
pub(crate) struct SharedState {
    pub(crate) table: Table<Value>,
    pub(crate) root: Element,
    pub(crate) render_callback: Option<Function>,
    pub(crate) on_expand: Option<Function>,
    pub(crate) on_expanded_rows_change: Option<Function>,
    /// Header and footer offsets inside the scrolling ancestor, captured on attach
    pub(crate) header_top: f64,
    pub(crate) foot_top: f64,
}

impl SharedState {
    pub(crate) fn pane_element(&self, pane: PaneId) -> Option<Element> {
        self.root
            .query_selector(&format!("[{PANE_ATTR}=\"{}\"]", pane.as_str()))
            .ok()
            .flatten()
    }
}

pub(crate) fn invoke_render_callback(callback: Option<Function>) {
    if let Some(callback) = callback {
        let _ = callback.call0(&JsValue::NULL);
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&format!("Invalid {what}: {e}")))
}

fn pane_kind(name: &str) -> Result<PaneKind, JsValue> {
    match name {
        "main" => Ok(PaneKind::Main),
        "left" => Ok(PaneKind::FixedLeft),
        "right" => Ok(PaneKind::FixedRight),
        other => Err(JsValue::from_str(&format!("Unknown pane `{other}`"))),
    }
}

/// The table host exported to JavaScript
#[wasm_bindgen]
pub struct TableView {
    state: Rc<RefCell<SharedState>>,
    listeners: Vec<Listener>,
    observer: Option<Observer>,
}

#[wasm_bindgen]
impl TableView {
    /// Create a table bound to `root`.
    ///
    /// `columns`, `data` and `config` are plain JS values in the camelCase
    /// shape of the JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(root: Element, columns: JsValue, data: JsValue, config: JsValue) -> Result<TableView, JsValue> {
        console::init(log::LevelFilter::Warn);

        let columns: Vec<Column> = from_js(columns, "columns")?;
        let data: Vec<Value> = from_js(data, "data")?;
        let config: TableConfig = if config.is_undefined() || config.is_null() {
            TableConfig::default()
        } else {
            from_js(config, "config")?
        };

        let state = Rc::new(RefCell::new(SharedState {
            table: Table::new(columns, data, config),
            root,
            render_callback: None,
            on_expand: None,
            on_expanded_rows_change: None,
            header_top: 0.0,
            foot_top: 0.0,
        }));

        Ok(TableView {
            state,
            listeners: Vec::new(),
            observer: None,
        })
    }

    /// Set the console log level (`"off"`, `"warn"`, `"debug"`, ...).
    #[wasm_bindgen]
    pub fn set_log_level(level: &str) {
        let filter = level.parse().unwrap_or(log::LevelFilter::Warn);
        console::init(filter);
    }

    /// Register a JS callback to request a re-render.
    #[wasm_bindgen]
    pub fn set_render_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().render_callback = callback;
    }

    /// `callback(expanded, record)` on every toggle.
    #[wasm_bindgen]
    pub fn set_on_expand(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().on_expand = callback;
    }

    /// `callback(keys)` with the new expanded key list on every toggle.
    #[wasm_bindgen]
    pub fn set_on_expanded_rows_change(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().on_expanded_rows_change = callback;
    }

    /// Bind listeners to the rendered markup. Call after the first render;
    /// calling again rebinds to the current elements.
    #[wasm_bindgen]
    pub fn attach(&mut self) {
        self.listeners.clear();
        self.observer = None;

        let root = self.state.borrow().root.clone();
        self.listeners = events::wire_panes(&self.state, &root);

        let sticky = self.state.borrow().table.config().sticky().is_some();
        if sticky {
            let container = scroll_parent(&root);
            {
                let mut s = self.state.borrow_mut();
                s.table.set_scroll_parent_found(container.is_some());
                s.header_top = s.pane_element(PaneId::Header).map_or(0.0, |el| offset_top(&el));
                s.foot_top = root
                    .query_selector("tfoot")
                    .ok()
                    .flatten()
                    .map_or(0.0, |el| offset_top(&el));
                events::refresh_sticky(&mut s, container.as_ref());
            }
            let parent_listeners = events::wire_scroll_parent(&self.state, container);
            self.listeners.extend(parent_listeners);
        }

        self.observer = events::observe_resize(&self.state, &root);
    }

    /// Render model of one pane (`"main"`, `"left"` or `"right"`).
    #[wasm_bindgen]
    pub fn render_model(&self, pane: &str) -> Result<JsValue, JsValue> {
        let kind = pane_kind(pane)?;
        let s = self.state.borrow();
        let rendered = s.table.render_pane(kind, &mut JsonRenderer::new());
        to_js(&json!({
            "pane": rendered.pane,
            "header": rendered.header,
            "body": rendered.body,
            "summary": rendered.summary,
        }))
    }

    /// Pane arrangement, fixed pane widths and table layout.
    #[wasm_bindgen]
    pub fn layout(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().table.pane_layout())
    }

    /// Shadow flags for the left/right edges.
    #[wasm_bindgen]
    pub fn ping(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().table.ping())
    }

    /// Sticky scrollbar placement, or `null` when sticky is off.
    #[wasm_bindgen]
    pub fn sticky_state(&self) -> Result<JsValue, JsValue> {
        let s = self.state.borrow();
        match s.table.sticky_scroll_bar() {
            Some(bar) => to_js(&bar.state()),
            None => Ok(JsValue::NULL),
        }
    }

    /// Header/summary translations while sticky.
    #[wasm_bindgen]
    pub fn sticky_offsets(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().table.sticky_offsets())
    }

    /// Run the pending row-height pass. Returns true (and requests a render)
    /// when fixed panes must be re-rendered with new heights.
    #[wasm_bindgen]
    pub fn after_render(&mut self) -> bool {
        let callback = {
            let mut s = self.state.borrow_mut();
            let main = s
                .root
                .query_selector(&format!("[{MAIN_ATTR}]"))
                .ok()
                .flatten()
                .unwrap_or_else(|| s.root.clone());
            if !s.table.after_layout(&DomMeasureRoot::new(&main)) {
                return false;
            }
            s.render_callback.clone()
        };
        invoke_render_callback(callback);
        true
    }

    /// Toggle a row. Returns `"expanded"`, `"collapsed"` or `undefined`.
    #[wasm_bindgen]
    pub fn toggle_expanded(&mut self, key: &str) -> Option<String> {
        self.apply_toggle(key, false)
    }

    /// Row click; toggles only with `expandRowByClick`.
    #[wasm_bindgen]
    pub fn row_click(&mut self, key: &str) -> Option<String> {
        self.apply_toggle(key, true)
    }

    fn apply_toggle(&mut self, key: &str, by_click: bool) -> Option<String> {
        let key = RowKey::from(key);
        let (change, record, keys, callbacks) = {
            let mut s = self.state.borrow_mut();
            let change = if by_click {
                s.table.on_row_click(&key)
            } else {
                s.table.toggle_expanded(&key)
            }?;
            let record = find_json_record(&s.table, &key).unwrap_or(Value::Null);
            let keys = s.table.expanded_keys().sorted();
            let callbacks = (
                s.render_callback.clone(),
                s.on_expand.clone(),
                s.on_expanded_rows_change.clone(),
            );
            (change, record, keys, callbacks)
        };

        let (render, on_expand, on_change) = callbacks;
        if let (Some(cb), Ok(record)) = (on_expand, to_js(&record)) {
            let _ = cb.call2(&JsValue::NULL, &JsValue::from_bool(change.is_expanded()), &record);
        }
        if let (Some(cb), Ok(keys)) = (on_change, to_js(&keys)) {
            let _ = cb.call1(&JsValue::NULL, &keys);
        }
        invoke_render_callback(render);
        Some(if change.is_expanded() { "expanded" } else { "collapsed" }.to_string())
    }

    /// Controlled expanded keys; `null` returns to internal state.
    #[wasm_bindgen]
    pub fn set_expanded_row_keys(&mut self, keys: JsValue) -> Result<(), JsValue> {
        let keys: Option<Vec<RowKey>> = from_js(keys, "expandedRowKeys")?;
        self.state.borrow_mut().table.set_expanded_row_keys(keys);
        Ok(())
    }

    /// Share the hovered row across panes.
    #[wasm_bindgen]
    pub fn set_hover(&mut self, key: Option<String>) -> bool {
        let callback = {
            let mut s = self.state.borrow_mut();
            if !s.table.set_hover(key.map(RowKey::from)) {
                return false;
            }
            s.render_callback.clone()
        };
        invoke_render_callback(callback);
        true
    }

    /// A column's rendered width changed.
    #[wasm_bindgen]
    pub fn column_resize(&mut self, key: &str, width: f64) -> bool {
        self.state.borrow_mut().table.on_column_resize(key, width)
    }

    #[wasm_bindgen]
    pub fn set_data(&mut self, data: JsValue) -> Result<(), JsValue> {
        let data: Vec<Value> = from_js(data, "data")?;
        self.state.borrow_mut().table.set_data(data);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_columns(&mut self, columns: JsValue) -> Result<(), JsValue> {
        let columns: Vec<Column> = from_js(columns, "columns")?;
        self.state.borrow_mut().table.set_columns(columns);
        Ok(())
    }

    /// Configuration warnings emitted so far.
    #[wasm_bindgen]
    pub fn warnings(&self) -> Vec<String> {
        self.state
            .borrow()
            .table
            .warnings()
            .emitted()
            .map(ToString::to_string)
            .collect()
    }

    /// Remove every listener and drop transient state.
    #[wasm_bindgen]
    pub fn dispose(&mut self) {
        self.listeners.clear();
        self.observer = None;
        if let Ok(mut s) = self.state.try_borrow_mut() {
            s.table.dispose();
        }
    }
}

impl Drop for TableView {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn find_json_record(table: &Table<Value>, key: &RowKey) -> Option<Value> {
    table
        .body_rows(PaneKind::Main)
        .record_rows()
        .find(|row| &row.key == key)
        .map(|row| row.record.clone())
}
