//! Renders panes as JSON values.

use serde_json::{json, Value};

use super::backend::{CellContext, HeaderRowContext, TableRenderer};
use crate::columns::HeaderCell;
use crate::layout::{BodyRow, BodyRowKind, PaneKind, RowHeight};
use crate::types::path_value;

/// Header cells become `{title, colSpan, rowSpan}`, body cells the value at
/// the column's data path, rows `{key, cells, ...}`.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer {
    /// Summary row values, rendered under every pane when non-empty
    pub summary: Vec<Value>,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn height_value(height: Option<RowHeight>) -> Value {
    match height {
        Some(RowHeight::Px(px)) => json!(px),
        Some(RowHeight::Auto) => json!("auto"),
        None => Value::Null,
    }
}

impl TableRenderer<Value> for JsonRenderer {
    type Node = Value;

    fn header_cell(&mut self, cell: &HeaderCell<'_>, _ctx: &HeaderRowContext) -> Value {
        json!({
            "title": cell.column.title,
            "colSpan": cell.col_span,
            "rowSpan": cell.row_span,
        })
    }

    fn header_row(&mut self, cells: Vec<Value>, ctx: &HeaderRowContext) -> Value {
        json!({
            "cells": cells,
            "height": height_value(ctx.height),
            "translateY": ctx.translate_y,
        })
    }

    fn body_cell(&mut self, row: &BodyRow<'_, Value>, ctx: &CellContext<'_>) -> Value {
        if ctx.hidden {
            return Value::Null;
        }
        if ctx.column.is_expand_column() {
            return json!({ "expandIcon": row.expandable, "expanded": row.expanded });
        }
        let value = path_value(row.record, &ctx.column.column.data_index)
            .cloned()
            .unwrap_or(Value::Null);
        match ctx.indent_px {
            Some(indent) if ctx.expand_icon => json!({
                "indent": indent,
                "expandIcon": row.has_children,
                "expanded": row.expanded,
                "value": value,
            }),
            _ => value,
        }
    }

    fn expanded_content(&mut self, row: &BodyRow<'_, Value>) -> Option<Value> {
        Some(json!({ "expandedRowOf": row.key.as_str() }))
    }

    fn body_row(&mut self, row: &BodyRow<'_, Value>, cells: Vec<Value>) -> Value {
        let mut node = json!({
            "key": row.measure_key,
            "indent": row.indent,
            "cells": cells,
            "height": height_value(row.height),
        });
        if let (BodyRowKind::Expanded { visible, .. }, Some(obj)) = (row.kind, node.as_object_mut()) {
            obj.insert("visible".to_string(), json!(visible));
        }
        if row.hovered {
            if let Some(obj) = node.as_object_mut() {
                obj.insert("hovered".to_string(), json!(true));
            }
        }
        node
    }

    fn summary(&mut self, _pane: PaneKind, translate_y: f64) -> Option<Value> {
        if self.summary.is_empty() {
            return None;
        }
        Some(json!({ "rows": self.summary, "translateY": translate_y }))
    }
}
