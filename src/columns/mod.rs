//! Column tree resolution: leaf order, fixed sides and the header grid.

mod flatten;
mod header;

pub use flatten::{
    flatten_columns, side_columns, with_expand_column, LeafColumn, EXPAND_COLUMN_KEY,
    EXPAND_COLUMN_WIDTH,
};
pub use header::{build_header_rows, HeaderCell, HeaderRows};

use crate::types::{Column, FixedSide};

/// Resolve a column tree into its ordered leaves and header grid.
pub fn resolve_columns(columns: &[Column]) -> (Vec<LeafColumn>, HeaderRows<'_>) {
    (flatten_columns(columns), build_header_rows(columns))
}

/// A resolved column tree, with the per-side subtrees used by fixed panes.
#[derive(Debug, Clone, Default)]
pub struct ColumnTree {
    columns: Vec<Column>,
    leaves: Vec<LeafColumn>,
    left: Vec<Column>,
    right: Vec<Column>,
}

impl ColumnTree {
    pub fn resolve(columns: Vec<Column>) -> Self {
        let leaves = flatten_columns(&columns);
        let left = side_columns(&columns, FixedSide::Left);
        let right = side_columns(&columns, FixedSide::Right);
        log::debug!(
            "resolved {} leaf columns ({} left, {} right)",
            leaves.len(),
            leaves.iter().filter(|l| l.fixed == Some(FixedSide::Left)).count(),
            leaves.iter().filter(|l| l.fixed == Some(FixedSide::Right)).count(),
        );
        Self {
            columns,
            leaves,
            left,
            right,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn leaves(&self) -> &[LeafColumn] {
        &self.leaves
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn leaf(&self, key: &str) -> Option<&LeafColumn> {
        self.leaves.iter().find(|l| l.key == key)
    }

    /// Leaves pinned to `side`, in order.
    pub fn side_leaves(&self, side: FixedSide) -> impl Iterator<Item = &LeafColumn> {
        self.leaves.iter().filter(move |l| l.fixed == Some(side))
    }

    pub fn has_fixed(&self, side: FixedSide) -> bool {
        self.side_leaves(side).next().is_some()
    }

    pub fn has_any_fixed(&self) -> bool {
        self.has_fixed(FixedSide::Left) || self.has_fixed(FixedSide::Right)
    }

    /// Header grid over the full tree.
    pub fn header_rows(&self) -> HeaderRows<'_> {
        build_header_rows(&self.columns)
    }

    /// Header grid over the subtree pinned to `side`.
    pub fn side_header_rows(&self, side: FixedSide) -> HeaderRows<'_> {
        match side {
            FixedSide::Left => build_header_rows(&self.left),
            FixedSide::Right => build_header_rows(&self.right),
        }
    }
}
