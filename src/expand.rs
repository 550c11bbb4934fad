//! Expanded row keys.
//!
//! Key sets are immutable values: every mutation produces a new set, so a
//! consumer can detect change by identity with [`ExpandedKeySet::same_instance`].

use std::collections::HashSet;
use std::rc::Rc;

use serde::Serialize;

use crate::types::{ExpandableConfig, Record, RowKey, RowKeySource};

/// Set of expanded row keys. Keys absent from the data are ignored on render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedKeySet(Rc<HashSet<RowKey>>);

impl ExpandedKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &RowKey) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowKey> {
        self.0.iter()
    }

    /// Keys in sorted order, for stable output.
    pub fn sorted(&self) -> Vec<RowKey> {
        let mut keys: Vec<RowKey> = self.0.iter().cloned().collect();
        keys.sort();
        keys
    }

    /// Whether both handles point at the same set value.
    pub fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl FromIterator<RowKey> for ExpandedKeySet {
    fn from_iter<I: IntoIterator<Item = RowKey>>(iter: I) -> Self {
        Self(Rc::new(iter.into_iter().collect()))
    }
}

impl Serialize for ExpandedKeySet {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.sorted().serialize(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandChange {
    Expanded,
    Collapsed,
}

impl ExpandChange {
    pub fn is_expanded(self) -> bool {
        self == ExpandChange::Expanded
    }
}

/// Add `key` if absent, remove it if present.
pub fn toggle(set: &ExpandedKeySet, key: &RowKey) -> (ExpandedKeySet, ExpandChange) {
    let mut next: HashSet<RowKey> = (*set.0).clone();
    let change = if next.remove(key) {
        ExpandChange::Collapsed
    } else {
        next.insert(key.clone());
        ExpandChange::Expanded
    };
    (ExpandedKeySet(Rc::new(next)), change)
}

/// Every row key reachable through `children`, recursively. Rows without a key
/// are skipped but their children are still visited.
pub fn expand_all<R, K, C>(rows: &[R], get_key: K, children: C) -> ExpandedKeySet
where
    K: Fn(&R, usize) -> Option<RowKey>,
    C: Fn(&R) -> Option<&[R]>,
{
    fn walk<R, K, C>(rows: &[R], get_key: &K, children: &C, out: &mut HashSet<RowKey>)
    where
        K: Fn(&R, usize) -> Option<RowKey>,
        C: Fn(&R) -> Option<&[R]>,
    {
        for (index, row) in rows.iter().enumerate() {
            if let Some(key) = get_key(row, index) {
                out.insert(key);
            }
            if let Some(kids) = children(row) {
                walk(kids, get_key, children, out);
            }
        }
    }

    let mut out = HashSet::new();
    walk(rows, &get_key, &children, &mut out);
    ExpandedKeySet(Rc::new(out))
}

/// How rows expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandableType {
    None,
    /// A render-provided extra row below the record
    Row,
    /// Nested child records
    Nest,
}

impl ExpandableType {
    pub fn detect<R: Record>(config: &ExpandableConfig, rows: &[R]) -> Self {
        if config.expanded_row_render {
            ExpandableType::Row
        } else if rows
            .iter()
            .any(|r| r.children(&config.children_column_name).is_some())
        {
            ExpandableType::Nest
        } else {
            ExpandableType::None
        }
    }
}

/// Owns the internal expanded set, an optional controlled override, and the
/// keys whose extra row has been rendered at least once.
#[derive(Debug, Clone, Default)]
pub struct ExpandedKeyTracker {
    inner: ExpandedKeySet,
    controlled: Option<ExpandedKeySet>,
    rendered: HashSet<RowKey>,
}

impl ExpandedKeyTracker {
    pub fn new(initial: ExpandedKeySet) -> Self {
        Self {
            inner: initial,
            ..Self::default()
        }
    }

    /// Initial state from configuration: explicit defaults win over expand-all.
    pub fn from_config<R: Record>(
        config: &ExpandableConfig,
        rows: &[R],
        key_source: &RowKeySource<R>,
    ) -> Self {
        let initial = if let Some(keys) = &config.default_expanded_row_keys {
            keys.iter().cloned().collect()
        } else if config.default_expand_all_rows {
            let field = config.children_column_name.as_str();
            expand_all(rows, |r, i| key_source.key_of(r, i), |r| r.children(field))
        } else {
            ExpandedKeySet::new()
        };
        let mut tracker = Self::new(initial);
        tracker.set_controlled(config.expanded_row_keys.clone());
        tracker
    }

    /// The effective set: controlled keys when present, else the internal set.
    pub fn keys(&self) -> &ExpandedKeySet {
        self.controlled.as_ref().unwrap_or(&self.inner)
    }

    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.keys().contains(key)
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }

    pub fn set_controlled(&mut self, keys: Option<Vec<RowKey>>) {
        self.controlled = keys.map(|k| k.into_iter().collect());
    }

    /// Toggle `key` against the effective set. The internal set always takes
    /// the result; a controlled owner decides whether to feed it back.
    pub fn toggle(&mut self, key: &RowKey) -> (ExpandedKeySet, ExpandChange) {
        let (next, change) = toggle(self.keys(), key);
        self.inner = next.clone();
        (next, change)
    }

    /// Record that the extra row for `key` has been rendered.
    pub fn mark_rendered(&mut self, key: &RowKey) {
        self.rendered.insert(key.clone());
    }

    pub fn was_rendered(&self, key: &RowKey) -> bool {
        self.rendered.contains(key)
    }

    pub fn clear_rendered(&mut self) {
        self.rendered.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn key(s: &str) -> RowKey {
        RowKey::from(s)
    }

    #[test]
    fn test_toggle_returns_new_instance() {
        let empty = ExpandedKeySet::new();
        let (one, change) = toggle(&empty, &key("a"));
        assert_eq!(change, ExpandChange::Expanded);
        assert!(one.contains(&key("a")));
        assert!(!one.same_instance(&empty));
        assert!(empty.is_empty());

        let (back, change) = toggle(&one, &key("a"));
        assert_eq!(change, ExpandChange::Collapsed);
        assert_eq!(back, empty);
    }

    #[test]
    fn test_expand_all_nested() {
        let rows = vec![
            json!({"key": 1, "children": [{"key": 11}, {"key": 12, "children": [{"key": 121}]}]}),
            json!({"key": 2}),
        ];
        let keys = expand_all(&rows, |r: &Value, _| r.key_field("key"), |r| r.children("children"));
        assert_eq!(keys.len(), 5);
        assert!(keys.contains(&key("121")));
    }

    #[test]
    fn test_detect_type() {
        let mut config = ExpandableConfig::default();
        let flat = vec![json!({"key": 1})];
        let nested = vec![json!({"key": 1, "children": []})];
        assert_eq!(ExpandableType::detect(&config, &flat), ExpandableType::None);
        assert_eq!(ExpandableType::detect(&config, &nested), ExpandableType::Nest);
        config.expanded_row_render = true;
        assert_eq!(ExpandableType::detect(&config, &nested), ExpandableType::Row);
    }

    #[test]
    fn test_tracker_defaults_and_controlled() {
        let rows = vec![json!({"key": "a", "children": [{"key": "b"}]})];
        let source = RowKeySource::Field("key".into());

        let config = ExpandableConfig {
            default_expand_all_rows: true,
            ..ExpandableConfig::default()
        };
        let tracker = ExpandedKeyTracker::from_config(&config, &rows, &source);
        assert_eq!(tracker.keys().len(), 2);

        let config = ExpandableConfig {
            default_expanded_row_keys: Some(vec![key("b")]),
            default_expand_all_rows: true,
            expanded_row_keys: Some(vec![key("a")]),
            ..ExpandableConfig::default()
        };
        let mut tracker = ExpandedKeyTracker::from_config(&config, &rows, &source);
        assert!(tracker.is_controlled());
        assert!(tracker.is_expanded(&key("a")));
        assert!(!tracker.is_expanded(&key("b")));

        let (next, change) = tracker.toggle(&key("a"));
        assert_eq!(change, ExpandChange::Collapsed);
        assert!(next.is_empty());
        // still controlled until the owner feeds the new keys back
        assert!(tracker.is_expanded(&key("a")));
        tracker.set_controlled(Some(next.sorted()));
        assert!(!tracker.is_expanded(&key("a")));
    }

    #[test]
    fn test_rendered_memory() {
        let mut tracker = ExpandedKeyTracker::default();
        assert!(!tracker.was_rendered(&key("a")));
        tracker.mark_rendered(&key("a"));
        assert!(tracker.was_rendered(&key("a")));
        tracker.clear_rendered();
        assert!(!tracker.was_rendered(&key("a")));
    }
}
