//! Flattening of records into the rows a body pane renders.

use std::collections::HashSet;

use serde::Serialize;

use super::row_heights::{expanded_row_key, RowHeight, RowHeightSynchronizer};
use super::PaneKind;
use crate::expand::{ExpandableType, ExpandedKeyTracker};
use crate::types::{Record, RowKey, RowKeySource};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BodyRowKind {
    Record,
    /// Extra row holding render-provided content under its record
    #[serde(rename_all = "camelCase")]
    Expanded {
        /// False when collapsed but kept mounted
        visible: bool,
        col_span: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        content_width: Option<f64>,
    },
}

/// One row of a body pane, in render order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct BodyRow<'a, R> {
    #[serde(skip)]
    pub record: &'a R,
    pub key: RowKey,
    /// The row's `data-row-key`
    pub measure_key: String,
    /// Index among siblings
    pub index: usize,
    pub indent: usize,
    #[serde(flatten)]
    pub kind: BodyRowKind,
    pub expanded: bool,
    pub expandable: bool,
    pub has_children: bool,
    pub hovered: bool,
    /// Forced height in fixed panes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<RowHeight>,
}

impl<R> BodyRow<'_, R> {
    pub fn is_record(&self) -> bool {
        matches!(self.kind, BodyRowKind::Record)
    }
}

/// Everything row flattening reads from the table.
pub struct BodyPlanContext<'c, R> {
    pub key_source: &'c RowKeySource<R>,
    pub expand: &'c ExpandedKeyTracker,
    pub expandable_type: ExpandableType,
    pub children_field: &'c str,
    pub row_expandable: Option<&'c dyn Fn(&R) -> bool>,
    pub hovered: Option<&'c RowKey>,
    pub heights: &'c RowHeightSynchronizer,
    pub pane: PaneKind,
    /// Leaf columns in this pane
    pub col_span: usize,
    /// Width of expanded content when fixed columns are active
    pub content_width: Option<f64>,
}

/// Flattened rows plus key problems found on the way.
#[derive(Debug, Clone)]
pub struct BodyPlan<'a, R> {
    pub rows: Vec<BodyRow<'a, R>>,
    /// Records for which no key could be derived
    pub missing_keys: usize,
    pub duplicate_keys: Vec<RowKey>,
}

impl<'a, R> BodyPlan<'a, R> {
    pub fn record_rows(&self) -> impl Iterator<Item = &BodyRow<'a, R>> {
        self.rows.iter().filter(|r| r.is_record())
    }
}

/// Flatten `data` for `ctx.pane`. Nested children follow their expanded
/// parent; an expanded row's extra row follows its record and stays in the
/// plan (hidden) once it has rendered.
pub fn plan_body_rows<'a, R: Record>(data: &'a [R], ctx: &BodyPlanContext<'_, R>) -> BodyPlan<'a, R> {
    let mut plan = BodyPlan {
        rows: Vec::with_capacity(data.len()),
        missing_keys: 0,
        duplicate_keys: Vec::new(),
    };
    let mut seen = HashSet::new();
    push_rows(data, ctx, 0, None, &mut seen, &mut plan);
    plan
}

/// Key of `record`, falling back to its sibling index (`parent-index` when
/// nested). The flag is false when the fallback was used.
pub fn resolve_row_key<R: Record>(
    source: &RowKeySource<R>,
    record: &R,
    index: usize,
    parent: Option<&RowKey>,
) -> (RowKey, bool) {
    match source.key_of(record, index) {
        Some(key) => (key, true),
        None => {
            let key = match parent {
                Some(p) => RowKey::new(format!("{p}-{index}")),
                None => RowKey::new(index.to_string()),
            };
            (key, false)
        }
    }
}

fn push_rows<'a, R: Record>(
    records: &'a [R],
    ctx: &BodyPlanContext<'_, R>,
    indent: usize,
    parent: Option<&RowKey>,
    seen: &mut HashSet<RowKey>,
    plan: &mut BodyPlan<'a, R>,
) {
    for (index, record) in records.iter().enumerate() {
        let (key, derived) = resolve_row_key(ctx.key_source, record, index, parent);
        if !derived {
            plan.missing_keys += 1;
        }
        if !seen.insert(key.clone()) {
            plan.duplicate_keys.push(key.clone());
        }

        let expanded = ctx.expand.is_expanded(&key);
        let children = record.children(ctx.children_field);
        let row_expandable = ctx.expandable_type == ExpandableType::Row
            && ctx.row_expandable.map_or(true, |f| f(record));
        let expandable = row_expandable || ctx.expandable_type == ExpandableType::Nest;

        plan.rows.push(BodyRow {
            record,
            measure_key: key.as_str().to_string(),
            key: key.clone(),
            index,
            indent,
            kind: BodyRowKind::Record,
            expanded,
            expandable,
            has_children: children.is_some(),
            hovered: ctx.hovered == Some(&key),
            height: ctx.heights.body_row_height(ctx.pane, key.as_str()),
        });

        if row_expandable && (expanded || ctx.expand.was_rendered(&key)) {
            let measure_key = expanded_row_key(&key);
            plan.rows.push(BodyRow {
                record,
                height: ctx.heights.body_row_height(ctx.pane, &measure_key),
                measure_key,
                key: key.clone(),
                index,
                indent: indent + 1,
                kind: BodyRowKind::Expanded {
                    visible: expanded,
                    col_span: ctx.col_span,
                    content_width: ctx.content_width,
                },
                expanded,
                expandable: false,
                has_children: false,
                hovered: false,
            });
        }

        if expanded {
            if let Some(kids) = children {
                push_rows(kids, ctx, indent + 1, Some(&key), seen, plan);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::expand::ExpandedKeySet;
    use serde_json::{json, Value};

    struct Fixture {
        source: RowKeySource<Value>,
        tracker: ExpandedKeyTracker,
        heights: RowHeightSynchronizer,
    }

    impl Fixture {
        fn new(expanded: &[&str]) -> Self {
            let keys: ExpandedKeySet = expanded.iter().map(|k| RowKey::from(*k)).collect();
            Self {
                source: RowKeySource::Field("key".into()),
                tracker: ExpandedKeyTracker::new(keys),
                heights: RowHeightSynchronizer::new(),
            }
        }

        fn ctx(&self, kind: ExpandableType, pane: PaneKind) -> BodyPlanContext<'_, Value> {
            BodyPlanContext {
                key_source: &self.source,
                expand: &self.tracker,
                expandable_type: kind,
                children_field: "children",
                row_expandable: None,
                hovered: None,
                heights: &self.heights,
                pane,
                col_span: 4,
                content_width: None,
            }
        }
    }

    fn nested() -> Vec<Value> {
        vec![
            json!({"key": "a", "children": [{"key": "a1"}, {"key": "a2"}]}),
            json!({"key": "b", "children": [{"key": "b1"}]}),
        ]
    }

    #[test]
    fn test_nested_children_follow_expanded_parent() {
        let fx = Fixture::new(&["a"]);
        let data = nested();
        let plan = plan_body_rows(&data, &fx.ctx(ExpandableType::Nest, PaneKind::Main));
        let keys: Vec<&str> = plan.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "a1", "a2", "b"]);
        assert_eq!(plan.rows[1].indent, 1);
        assert_eq!(plan.rows[1].index, 0);
        assert!(plan.rows[0].expanded && plan.rows[0].has_children);
        assert!(plan.rows[0].height.is_none());
    }

    #[test]
    fn test_extra_row_kept_after_collapse() {
        let mut fx = Fixture::new(&[]);
        fx.tracker.mark_rendered(&RowKey::from("b"));
        let data = nested();
        let plan = plan_body_rows(&data, &fx.ctx(ExpandableType::Row, PaneKind::FixedLeft));
        assert_eq!(plan.rows.len(), 3);
        let extra = &plan.rows[2];
        assert_eq!(extra.measure_key, "b-extra-row");
        assert_eq!(
            extra.kind,
            BodyRowKind::Expanded {
                visible: false,
                col_span: 4,
                content_width: None
            }
        );
        assert_eq!(extra.height, Some(RowHeight::Auto));
    }

    #[test]
    fn test_row_expandable_gate() {
        let fx = Fixture::new(&["a", "b"]);
        let data = nested();
        let gate = |r: &Value| r.key_field("key") != Some(RowKey::from("a"));
        let mut ctx = fx.ctx(ExpandableType::Row, PaneKind::Main);
        ctx.row_expandable = Some(&gate);
        let plan = plan_body_rows(&data, &ctx);
        assert!(!plan.rows[0].expandable);
        let extras = plan.rows.iter().filter(|r| !r.is_record()).count();
        assert_eq!(extras, 1);
    }

    #[test]
    fn test_missing_and_duplicate_keys() {
        let fx = Fixture::new(&[]);
        let data = vec![json!({"key": "x"}), json!({"key": "x"}), json!({})];
        let plan = plan_body_rows(&data, &fx.ctx(ExpandableType::None, PaneKind::Main));
        assert_eq!(plan.missing_keys, 1);
        assert_eq!(plan.duplicate_keys, vec![RowKey::from("x")]);
        assert_eq!(plan.rows[2].key.as_str(), "2");
    }
}
