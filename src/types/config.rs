//! Table configuration surface.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RowKey;

/// Legacy options that are accepted but ignored.
pub const REMOVED_OPTIONS: &[&str] = &[
    "onRowClick",
    "onRowDoubleClick",
    "onRowContextMenu",
    "onRowMouseEnter",
    "onRowMouseLeave",
    "getBodyWrapper",
];

/// One axis of `scroll`: a pixel size, `true`, or a CSS length such as `"max-content"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrollExtent {
    Px(f64),
    Flag(bool),
    Css(String),
}

impl ScrollExtent {
    /// Any value other than `false` enables the axis.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ScrollExtent::Flag(false))
    }

    pub fn px(&self) -> Option<f64> {
        match self {
            ScrollExtent::Px(px) => Some(*px),
            _ => None,
        }
    }

    pub fn is_max_content(&self) -> bool {
        matches!(self, ScrollExtent::Css(css) if css == "max-content")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<ScrollExtent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<ScrollExtent>,
}

impl ScrollConfig {
    pub fn px(x: f64, y: f64) -> Self {
        Self {
            x: Some(ScrollExtent::Px(x)),
            y: Some(ScrollExtent::Px(y)),
        }
    }

    /// Horizontal fixed-pane mode.
    pub fn horizontal(&self) -> bool {
        self.x.as_ref().is_some_and(ScrollExtent::is_enabled)
    }

    /// Pinned header with a vertically scrolling body.
    pub fn vertical(&self) -> bool {
        self.y.as_ref().is_some_and(ScrollExtent::is_enabled)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyOptions {
    /// Distance of the pinned header from the top of the scrolling ancestor
    #[serde(default)]
    pub offset_header: f64,
    /// Distance of the sticky scrollbar from the bottom of the viewport
    #[serde(default)]
    pub offset_scroll: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StickySpec {
    Flag(bool),
    Options(StickyOptions),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLayout {
    #[default]
    Auto,
    Fixed,
}

fn default_children_column_name() -> String {
    "children".to_string()
}

fn default_indent_size() -> f64 {
    15.0
}

fn default_row_key() -> String {
    "key".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandableConfig {
    /// Controlled expanded keys; overrides the internal set when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_row_keys: Option<Vec<RowKey>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_expanded_row_keys: Option<Vec<RowKey>>,
    #[serde(default)]
    pub default_expand_all_rows: bool,
    /// An expanded-row renderer is supplied (row-type expansion)
    #[serde(default)]
    pub expanded_row_render: bool,
    #[serde(default)]
    pub expand_row_by_click: bool,
    #[serde(default = "default_children_column_name")]
    pub children_column_name: String,
    #[serde(default)]
    pub expand_icon_column_index: usize,
    #[serde(default = "default_indent_size")]
    pub indent_size: f64,
}

impl Default for ExpandableConfig {
    fn default() -> Self {
        Self {
            expanded_row_keys: None,
            default_expanded_row_keys: None,
            default_expand_all_rows: false,
            expanded_row_render: false,
            expand_row_by_click: false,
            children_column_name: default_children_column_name(),
            expand_icon_column_index: 0,
            indent_size: default_indent_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky: Option<StickySpec>,
    #[serde(default = "default_row_key")]
    pub row_key: String,
    #[serde(default)]
    pub expandable: ExpandableConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_layout: Option<TableLayout>,
    #[serde(default = "default_true")]
    pub show_header: bool,
    /// Unrecognized options, kept so removed ones can be reported
    #[serde(flatten, skip_serializing)]
    pub unknown: Map<String, Value>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig::default(),
            sticky: None,
            row_key: default_row_key(),
            expandable: ExpandableConfig::default(),
            table_layout: None,
            show_header: true,
            unknown: Map::new(),
        }
    }
}

impl TableConfig {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolved sticky options, `None` when sticky mode is off.
    pub fn sticky(&self) -> Option<StickyOptions> {
        match self.sticky {
            Some(StickySpec::Flag(true)) => Some(StickyOptions::default()),
            Some(StickySpec::Options(opts)) => Some(opts),
            Some(StickySpec::Flag(false)) | None => None,
        }
    }

    /// Removed legacy options present in the input.
    pub fn removed_options(&self) -> Vec<&'static str> {
        REMOVED_OPTIONS
            .iter()
            .copied()
            .filter(|name| self.unknown.contains_key(*name))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableConfig::from_json("{}").unwrap();
        assert_eq!(config.row_key, "key");
        assert!(config.show_header);
        assert_eq!(config.expandable.children_column_name, "children");
        assert_eq!(config.expandable.indent_size, 15.0);
        assert!(config.sticky().is_none());
        assert!(!config.scroll.horizontal());
    }

    #[test]
    fn test_scroll_and_sticky_forms() {
        let config = TableConfig::from_json(
            r#"{"scroll": {"x": "max-content", "y": 300}, "sticky": {"offsetScroll": 4}}"#,
        )
        .unwrap();
        assert!(config.scroll.horizontal());
        assert!(config.scroll.vertical());
        assert!(config.scroll.x.as_ref().unwrap().is_max_content());
        assert_eq!(config.sticky().unwrap().offset_scroll, 4.0);

        let config = TableConfig::from_json(r#"{"scroll": {"x": true}, "sticky": true}"#).unwrap();
        assert!(config.scroll.horizontal());
        assert!(config.sticky().is_some());

        let config = TableConfig::from_json(r#"{"scroll": {"x": false}}"#).unwrap();
        assert!(!config.scroll.horizontal());
    }

    #[test]
    fn test_removed_options_reported() {
        let config = TableConfig::from_json(r#"{"onRowClick": null, "getBodyWrapper": 1}"#).unwrap();
        assert_eq!(config.removed_options(), vec!["onRowClick", "getBodyWrapper"]);
    }
}
