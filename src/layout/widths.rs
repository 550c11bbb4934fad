//! Measured column widths and fixed-pane totals.

use std::collections::HashMap;

use crate::columns::{ColumnTree, LeafColumn};
use crate::types::FixedSide;

/// Per-column pixel widths reported by resize notifications.
///
/// Last write for a key wins; repeating an identical report is a no-op and
/// does not bump the version.
#[derive(Debug, Clone, Default)]
pub struct ColumnWidthAccumulator {
    widths: HashMap<String, f64>,
    version: u64,
}

impl ColumnWidthAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the measured width for `key`. Returns true when the stored value changed.
    ///
    /// Non-finite or negative reports are ignored.
    pub fn report_width(&mut self, key: &str, px: f64) -> bool {
        if !px.is_finite() || px < 0.0 {
            return false;
        }
        match self.widths.get(key) {
            Some(prev) if (prev - px).abs() < f64::EPSILON => false,
            _ => {
                self.widths.insert(key.to_string(), px);
                self.version += 1;
                log::debug!("column {key} width -> {px}");
                true
            }
        }
    }

    pub fn measured(&self, key: &str) -> Option<f64> {
        self.widths.get(key).copied()
    }

    /// Measured width, else declared width, else 0.
    pub fn width_of(&self, leaf: &LeafColumn) -> f64 {
        self.measured(&leaf.key)
            .or_else(|| leaf.declared_width())
            .unwrap_or(0.0)
    }

    /// Sum of [`width_of`](Self::width_of) over `columns`.
    pub fn total_width<'a, I>(&self, columns: I) -> f64
    where
        I: IntoIterator<Item = &'a LeafColumn>,
    {
        columns.into_iter().map(|leaf| self.width_of(leaf)).sum()
    }

    /// Total width of the leaves pinned to `side`.
    pub fn side_width(&self, tree: &ColumnTree, side: FixedSide) -> f64 {
        self.total_width(tree.side_leaves(side))
    }

    /// Changes whenever any stored width changes.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn clear(&mut self) {
        if !self.widths.is_empty() {
            self.widths.clear();
            self.version += 1;
        }
    }
}
