//! tablesync - layout and scroll coordination for tables with fixed panes
//!
//! One logical table is rendered as up to three synchronized panes:
//! - Grouped column headers resolved into a spanning header grid
//! - Left/right fixed column panes kept in row-height lockstep with the main pane
//! - Scroll offsets mirrored between header, bodies and a sticky scrollbar
//! - Row-type and nested expansion with controlled or internal keys
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TableView } from 'tablesync';
//! await init();
//! const view = new TableView(root, columns, data, { scroll: { x: 1200, y: 400 } });
//! view.set_render_callback(() => draw(view.layout(), view.render_model('main')));
//! draw(view.layout(), view.render_model('main'));
//! view.attach();
//! view.after_render();
//! ```

pub mod columns;
pub mod error;
pub mod expand;
pub mod host;
pub mod layout;
pub mod render;
pub mod scroll;
pub mod table;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod viewer;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use viewer::TableView;

pub use error::{ConfigWarning, Result, TableSyncError, WarningLog};
pub use table::Table;
pub use types::*;

/// Resolve a JSON column tree and return its leaves and header grid as JSON.
///
/// # Errors
/// Returns an error if `columns` is not a valid column array.
#[wasm_bindgen]
pub fn resolve_header_json(columns: &str) -> std::result::Result<String, JsValue> {
    let columns: Vec<Column> =
        serde_json::from_str(columns).map_err(|e| JsValue::from_str(&format!("Invalid columns: {e}")))?;
    let (leaves, rows) = crate::columns::resolve_columns(&columns);
    let out = serde_json::json!({ "leaves": leaves, "header": rows });
    Ok(out.to_string())
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
