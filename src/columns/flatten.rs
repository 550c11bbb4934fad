//! Leaf flattening, column keys and per-side subtrees.

use serde::Serialize;

use crate::types::{Column, FixedSide};

/// Key of the synthetic expand-icon column.
pub const EXPAND_COLUMN_KEY: &str = "rc-table-expand-column";

/// Width of the synthetic expand-icon column in pixels.
pub const EXPAND_COLUMN_WIDTH: f64 = 60.0;

/// Key used for columns with neither `key` nor `dataIndex`.
const INTERNAL_KEY_PREFIX: &str = "RC_TABLE_KEY";

/// A leaf column with its fixed side resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafColumn {
    /// Unique key among the leaves
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed: Option<FixedSide>,
    #[serde(skip)]
    pub column: Column,
}

impl LeafColumn {
    pub fn declared_width(&self) -> Option<f64> {
        self.column.width
    }

    pub fn is_expand_column(&self) -> bool {
        self.column.key.as_deref() == Some(EXPAND_COLUMN_KEY)
    }
}

/// Flatten into leaves, resolving each leaf's `fixed` from its nearest declaring ancestor.
pub fn flatten_columns(columns: &[Column]) -> Vec<LeafColumn> {
    let mut flat = Vec::new();
    collect_leaves(columns, None, &mut flat);
    let keys = column_keys(&flat);
    flat.into_iter()
        .zip(keys)
        .map(|((column, fixed), key)| LeafColumn { key, fixed, column })
        .collect()
}

fn collect_leaves(columns: &[Column], inherited: Option<FixedSide>, out: &mut Vec<(Column, Option<FixedSide>)>) {
    for column in columns {
        let fixed = column.fixed.or(inherited);
        if column.has_children() {
            collect_leaves(&column.children, fixed, out);
        } else {
            out.push((column.clone(), fixed));
        }
    }
}

/// Unique keys: `key`, else the data path joined with `-`, else an internal
/// prefix; collisions get `_next` appended until unique.
fn column_keys(columns: &[(Column, Option<FixedSide>)]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    columns
        .iter()
        .map(|(column, _)| {
            let mut key = match &column.key {
                Some(k) if !k.is_empty() => k.clone(),
                _ if !column.data_index.is_empty() => column.data_index.join("-"),
                _ => INTERNAL_KEY_PREFIX.to_string(),
            };
            while seen.contains(&key) {
                key.push_str("_next");
            }
            seen.insert(key.clone());
            key
        })
        .collect()
}

/// Insert the expand-icon column at `index` (clamped). It takes the fixed side
/// of the column it displaces.
pub fn with_expand_column(columns: &[Column], index: usize) -> Vec<Column> {
    let index = index.min(columns.len());
    let fixed = columns.get(index).and_then(|c| c.fixed);
    let expand = Column {
        key: Some(EXPAND_COLUMN_KEY.to_string()),
        fixed,
        width: Some(EXPAND_COLUMN_WIDTH),
        ..Column::default()
    };
    let mut out = columns.to_vec();
    out.insert(index, expand);
    out
}

/// The subtree whose leaves resolve to `side`. Groups that lose children drop
/// their explicit colSpan.
pub fn side_columns(columns: &[Column], side: FixedSide) -> Vec<Column> {
    filter_side(columns, side, None)
}

fn filter_side(columns: &[Column], side: FixedSide, inherited: Option<FixedSide>) -> Vec<Column> {
    let mut out = Vec::new();
    for column in columns {
        let fixed = column.fixed.or(inherited);
        if column.has_children() {
            let kept = filter_side(&column.children, side, fixed);
            if kept.is_empty() {
                continue;
            }
            let mut group = column.clone();
            if kept.len() != column.children.len() {
                group.col_span = None;
            }
            group.children = kept;
            out.push(group);
        } else if fixed == Some(side) {
            out.push(column.clone());
        }
    }
    out
}
