//! Structured error and warning types for tablesync.
//!
//! The layout/scroll core never fails: every problem it can detect degrades
//! to a best-effort layout and is reported once as a [`ConfigWarning`].
//! [`TableSyncError`] only covers the boundaries (config decoding, CLI I/O,
//! the DOM host).

use std::collections::HashSet;

/// Errors raised at the edges of the crate.
#[derive(Debug, thiserror::Error)]
pub enum TableSyncError {
    /// JSON decoding or encoding failure.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration that cannot be interpreted at all.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Host surface failure (DOM element missing, listener registration).
    #[error("Host error: {0}")]
    Host(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableSyncError>;

#[cfg(target_arch = "wasm32")]
impl From<TableSyncError> for wasm_bindgen::JsValue {
    fn from(e: TableSyncError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

/// Non-fatal configuration problems.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ConfigWarning {
    /// A record produced no key through the configured row-key accessor.
    #[error("Each record in table should have a unique `{field}` prop, or set `rowKey` to an unique primary key.")]
    MissingRowKey { field: String },

    /// Two visible records share a key.
    #[error("Duplicate row key `{0}`: expansion and row heights for these rows will collide.")]
    DuplicateRowKey(String),

    /// A fixed-width-dependent layout is used with a column lacking a numeric width.
    #[error("Fixed column `{0}` has no width; its pane width falls back to measured or 0.")]
    FixedColumnWithoutWidth(String),

    /// Sticky mode is on but no ancestor scrolls.
    #[error("`sticky` is enabled but no scrolling ancestor was found; the sticky scrollbar stays hidden.")]
    NoScrollParent,

    /// A legacy option that no longer has any effect.
    #[error("`{0}` is removed, please use `onRow` or custom `components` instead.")]
    RemovedOption(String),
}

/// Emits each distinct warning once per table instance.
#[derive(Debug, Default)]
pub struct WarningLog {
    emitted: HashSet<ConfigWarning>,
}

impl WarningLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `warning` unless it was already logged. Returns true when it was emitted now.
    pub fn warn_once(&mut self, warning: ConfigWarning) -> bool {
        if self.emitted.contains(&warning) {
            return false;
        }
        log::warn!("{warning}");
        self.emitted.insert(warning);
        true
    }

    /// Every warning emitted so far.
    pub fn emitted(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.emitted.iter()
    }

    pub fn has(&self, warning: &ConfigWarning) -> bool {
        self.emitted.contains(warning)
    }
}
