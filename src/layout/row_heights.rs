//! Row height synchronization between the authoritative pane and fixed panes.
//!
//! The main pane lays rows out freely. After each committed layout its row
//! boxes are measured and republished so fixed panes can force the same
//! heights. Publication only happens when the new map differs from the last
//! published one; publishing unconditionally would feed every measurement
//! back into another render.

use std::collections::HashMap;

use serde::{Serialize, Serializer};

use super::PaneKind;
use crate::host::MeasureRoot;
use crate::types::RowKey;

/// Suffix of the synthetic key under which an expanded row's extra content is measured.
pub const EXPANDED_ROW_SUFFIX: &str = "-extra-row";

/// Prefix of summary (footer) row keys.
pub const SUMMARY_ROW_PREFIX: &str = "table_summary_";

/// Measurement key of the extra row shown under an expanded record.
pub fn expanded_row_key(key: &RowKey) -> String {
    format!("{key}{EXPANDED_ROW_SUFFIX}")
}

/// Measurement key of the `index`-th summary row.
pub fn summary_row_key(index: usize) -> String {
    format!("{SUMMARY_ROW_PREFIX}{index}")
}

/// A measured pixel height, or `auto` when nothing usable was ever measured.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RowHeight {
    Px(f64),
    #[default]
    Auto,
}

impl RowHeight {
    pub fn px(self) -> Option<f64> {
        match self {
            RowHeight::Px(px) => Some(px),
            RowHeight::Auto => None,
        }
    }

    /// `Px` for a positive finite measurement, else the previous value, else `Auto`.
    fn settle(measured: Option<f64>, prev: Option<RowHeight>) -> RowHeight {
        match measured {
            Some(px) if px.is_finite() && px > 0.0 => RowHeight::Px(px),
            _ => prev.unwrap_or(RowHeight::Auto),
        }
    }
}

impl Serialize for RowHeight {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            RowHeight::Px(px) => s.serialize_f64(*px),
            RowHeight::Auto => s.serialize_str("auto"),
        }
    }
}

/// Header and body heights from one measurement pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowHeightMap {
    pub header: Vec<RowHeight>,
    pub body: HashMap<String, RowHeight>,
}

impl RowHeightMap {
    pub fn get(&self, key: &str) -> Option<RowHeight> {
        self.body.get(key).copied()
    }
}

/// Measures the authoritative pane and publishes heights for fixed panes.
///
/// Extra-row heights are reported separately by the expanded content and live
/// outside the measured map, so a measurement pass never drops them.
#[derive(Debug, Clone, Default)]
pub struct RowHeightSynchronizer {
    published: RowHeightMap,
    expanded: HashMap<String, RowHeight>,
    version: u64,
}

impl RowHeightSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read header sections and `data-row-key` rows from `root`.
    ///
    /// A zero or missing measurement keeps the previously published value, or
    /// `auto` when there is none. Rows absent from `root` are dropped.
    pub fn measure(&self, root: &impl MeasureRoot) -> RowHeightMap {
        let header = root
            .header_heights()
            .into_iter()
            .enumerate()
            .map(|(i, h)| RowHeight::settle(h, self.published.header.get(i).copied()))
            .collect();

        let body = root
            .body_rows()
            .into_iter()
            .map(|row| {
                let height = RowHeight::settle(row.height, self.published.get(&row.key));
                (row.key, height)
            })
            .collect();

        RowHeightMap { header, body }
    }

    /// Replace the published map when `next` differs. Returns whether it was published.
    pub fn publish(&mut self, next: RowHeightMap) -> bool {
        if next == self.published {
            log::debug!("row heights unchanged, skipping publish");
            return false;
        }
        log::debug!(
            "publishing {} header and {} body heights",
            next.header.len(),
            next.body.len()
        );
        self.published = next;
        self.version += 1;
        true
    }

    /// Measure and publish in one step.
    pub fn sync(&mut self, root: &impl MeasureRoot) -> bool {
        let next = self.measure(root);
        self.publish(next)
    }

    /// Store the height of an expanded row's extra content.
    pub fn record_expanded_row_height(&mut self, key: &RowKey, px: f64) -> bool {
        let entry_key = expanded_row_key(key);
        let prev = self.expanded.get(&entry_key).copied();
        let height = RowHeight::settle(Some(px), prev);
        if prev == Some(height) {
            return false;
        }
        self.expanded.insert(entry_key, height);
        self.version += 1;
        true
    }

    /// Recorded height of the extra row with measurement key `key`.
    pub fn expanded_row_height(&self, key: &str) -> Option<RowHeight> {
        self.expanded.get(key).copied()
    }

    pub fn published(&self) -> &RowHeightMap {
        &self.published
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Height a header row of `pane` must take, `None` for the main pane.
    ///
    /// The first header section's aggregate height is apportioned evenly
    /// across `row_count` rows.
    #[allow(clippy::cast_precision_loss)]
    pub fn header_row_height(&self, pane: PaneKind, row_count: usize) -> Option<RowHeight> {
        if pane == PaneKind::Main || row_count == 0 {
            return None;
        }
        let aggregate = self.published.header.first().copied()?;
        Some(match aggregate {
            RowHeight::Px(px) => RowHeight::Px(px / row_count as f64),
            RowHeight::Auto => RowHeight::Auto,
        })
    }

    /// Height a body row of `pane` must take, `None` for the main pane.
    pub fn body_row_height(&self, pane: PaneKind, key: &str) -> Option<RowHeight> {
        if pane == PaneKind::Main {
            return None;
        }
        let recorded = if key.ends_with(EXPANDED_ROW_SUFFIX) {
            self.expanded_row_height(key)
        } else {
            None
        };
        Some(
            recorded
                .or_else(|| self.published.get(key))
                .unwrap_or(RowHeight::Auto),
        )
    }

    pub fn clear(&mut self) {
        self.published = RowHeightMap::default();
        self.expanded.clear();
        self.version += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::host::MemoryMeasureRoot;

    #[test]
    fn test_zero_keeps_previous() {
        let mut sync = RowHeightSynchronizer::new();
        let mut stored = Vec::new();
        for h in [40.0, 0.0, 45.0] {
            sync.sync(&MemoryMeasureRoot::new().row("r", h));
            stored.push(sync.published().get("r").unwrap());
        }
        assert_eq!(
            stored,
            vec![RowHeight::Px(40.0), RowHeight::Px(40.0), RowHeight::Px(45.0)]
        );
    }

    #[test]
    fn test_unmounted_without_history_is_auto() {
        let sync = RowHeightSynchronizer::new();
        let map = sync.measure(&MemoryMeasureRoot::new().unmounted_row("r"));
        assert_eq!(map.get("r"), Some(RowHeight::Auto));
    }

    #[test]
    fn test_identical_measurement_not_published() {
        let mut sync = RowHeightSynchronizer::new();
        let root = MemoryMeasureRoot::new().header(60.0).row("a", 30.0);
        assert!(sync.sync(&root));
        let v = sync.version();
        assert!(!sync.sync(&root));
        assert_eq!(sync.version(), v);
    }

    #[test]
    fn test_header_apportioned_for_fixed_panes() {
        let mut sync = RowHeightSynchronizer::new();
        sync.sync(&MemoryMeasureRoot::new().header(90.0));
        assert_eq!(sync.header_row_height(PaneKind::Main, 3), None);
        assert_eq!(
            sync.header_row_height(PaneKind::FixedLeft, 3),
            Some(RowHeight::Px(30.0))
        );
    }

    #[test]
    fn test_expanded_row_key() {
        let mut sync = RowHeightSynchronizer::new();
        assert!(sync.record_expanded_row_height(&RowKey::from("7"), 120.0));
        assert!(!sync.record_expanded_row_height(&RowKey::from("7"), 120.0));
        assert_eq!(
            sync.body_row_height(PaneKind::FixedRight, "7-extra-row"),
            Some(RowHeight::Px(120.0))
        );
        assert_eq!(summary_row_key(0), "table_summary_0");
    }

    #[test]
    fn test_serialize_auto() {
        let json = serde_json::to_string(&vec![RowHeight::Px(1.5), RowHeight::Auto]).unwrap();
        assert_eq!(json, r#"[1.5,"auto"]"#);
    }
}
