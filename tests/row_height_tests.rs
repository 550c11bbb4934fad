//! Row height synchronization tests
//!
//! No-regress fallback, publish-on-change, header apportioning and the
//! heights fixed panes receive through the table.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]

use serde_json::{json, Value};
use tablesync::host::MemoryMeasureRoot;
use tablesync::layout::{
    expanded_row_key, summary_row_key, PaneKind, RowHeight, RowHeightSynchronizer,
};
use tablesync::{Column, FixedSide, RowKey, ScrollConfig, Table, TableConfig};
use test_case::test_case;

// ============================================================================
// Synchronizer
// ============================================================================

#[test_case(&[40.0, 0.0, 45.0], &[40.0, 40.0, 45.0] ; "zero falls back")]
#[test_case(&[30.0, f64::NAN, 30.0], &[30.0, 30.0, 30.0] ; "nan falls back")]
#[test_case(&[25.0, 35.0, 0.0, 0.0], &[25.0, 35.0, 35.0, 35.0] ; "repeated misses")]
fn test_heights_never_regress(inputs: &[f64], expected: &[f64]) {
    let mut sync = RowHeightSynchronizer::new();
    let stored: Vec<f64> = inputs
        .iter()
        .map(|&h| {
            sync.sync(&MemoryMeasureRoot::new().row("r", h));
            sync.published().get("r").and_then(RowHeight::px).unwrap()
        })
        .collect();
    assert_eq!(stored, expected);
}

#[test]
fn test_never_measured_is_auto() {
    let mut sync = RowHeightSynchronizer::new();
    sync.sync(&MemoryMeasureRoot::new().unmounted_row("r").row("s", 0.0));
    assert_eq!(sync.published().get("r"), Some(RowHeight::Auto));
    assert_eq!(sync.published().get("s"), Some(RowHeight::Auto));
}

#[test]
fn test_unchanged_measurement_is_not_published() {
    let root = MemoryMeasureRoot::new().header(48.0).row("a", 30.0).row("b", 42.0);
    let mut sync = RowHeightSynchronizer::new();
    assert!(sync.sync(&root));
    let version = sync.version();
    for _ in 0..5 {
        assert!(!sync.sync(&root));
    }
    assert_eq!(sync.version(), version);

    assert!(sync.sync(&root.clone().row("c", 20.0)));
    assert!(sync.version() > version);
}

#[test]
fn test_header_height_apportioned() {
    let mut sync = RowHeightSynchronizer::new();
    sync.sync(&MemoryMeasureRoot::new().header(90.0));
    assert_eq!(sync.header_row_height(PaneKind::FixedLeft, 3), Some(RowHeight::Px(30.0)));
    assert_eq!(sync.header_row_height(PaneKind::FixedRight, 1), Some(RowHeight::Px(90.0)));
    assert_eq!(sync.header_row_height(PaneKind::Main, 3), None);
}

#[test]
fn test_extra_and_summary_keys_do_not_collide() {
    let key = RowKey::from("row");
    let root = MemoryMeasureRoot::new()
        .row("row", 30.0)
        .row(expanded_row_key(&key), 120.0)
        .row(summary_row_key(0), 36.0);
    let mut sync = RowHeightSynchronizer::new();
    sync.sync(&root);
    assert_eq!(sync.body_row_height(PaneKind::FixedLeft, "row"), Some(RowHeight::Px(30.0)));
    assert_eq!(
        sync.body_row_height(PaneKind::FixedLeft, "row-extra-row"),
        Some(RowHeight::Px(120.0))
    );
    assert_eq!(
        sync.body_row_height(PaneKind::FixedRight, "table_summary_0"),
        Some(RowHeight::Px(36.0))
    );
}

#[test]
fn test_record_expanded_row_height() {
    let mut sync = RowHeightSynchronizer::new();
    let key = RowKey::from("x");
    assert!(sync.record_expanded_row_height(&key, 80.0));
    assert!(!sync.record_expanded_row_height(&key, 80.0));
    // a zero report keeps the last good height
    assert!(!sync.record_expanded_row_height(&key, 0.0));
    assert_eq!(sync.expanded_row_height("x-extra-row"), Some(RowHeight::Px(80.0)));
}

#[test]
fn test_expanded_row_height_survives_measurement() {
    let mut sync = RowHeightSynchronizer::new();
    let root = MemoryMeasureRoot::new().row("7", 30.0);
    assert!(sync.sync(&root));
    assert!(sync.record_expanded_row_height(&RowKey::from("7"), 120.0));

    // the measure root never returns the extra row
    assert!(!sync.sync(&root));
    assert!(sync.sync(&MemoryMeasureRoot::new().row("7", 32.0).row("8", 25.0)));
    for pane in [PaneKind::FixedLeft, PaneKind::FixedRight] {
        assert_eq!(
            sync.body_row_height(pane, "7-extra-row"),
            Some(RowHeight::Px(120.0))
        );
    }
    assert_eq!(sync.body_row_height(PaneKind::FixedLeft, "7"), Some(RowHeight::Px(32.0)));

    sync.clear();
    assert_eq!(sync.body_row_height(PaneKind::FixedLeft, "7-extra-row"), Some(RowHeight::Auto));
}

// ============================================================================
// Through the table
// ============================================================================

fn fixed_table(data: Vec<Value>) -> Table<Value> {
    let config = TableConfig {
        scroll: ScrollConfig::px(1000.0, 300.0),
        ..TableConfig::default()
    };
    let columns = vec![
        Column::new("a", "A").fixed(FixedSide::Left).width(100.0),
        Column::new("b", "B").width(600.0),
    ];
    Table::new(columns, data, config)
}

#[test]
fn test_fixed_rows_take_main_heights() {
    let mut table = fixed_table(vec![json!({"key": "r1"}), json!({"key": "r2"})]);
    let root = MemoryMeasureRoot::new().header(40.0).row("r1", 30.0).row("r2", 64.0);
    assert!(table.after_layout(&root));

    let left = table.body_rows(PaneKind::FixedLeft);
    let heights: Vec<Option<RowHeight>> = left.rows.iter().map(|r| r.height).collect();
    assert_eq!(heights, vec![Some(RowHeight::Px(30.0)), Some(RowHeight::Px(64.0))]);
    assert_eq!(table.header_row_height(PaneKind::FixedLeft), Some(RowHeight::Px(40.0)));

    let main = table.body_rows(PaneKind::Main);
    assert!(main.rows.iter().all(|r| r.height.is_none()));
}

#[test]
fn test_measure_only_when_requested() {
    let mut table = fixed_table(vec![json!({"key": "r1"})]);
    assert!(table.after_layout(&MemoryMeasureRoot::new().row("r1", 30.0)));
    // a new size is not read until a pass is requested
    assert!(!table.after_layout(&MemoryMeasureRoot::new().row("r1", 50.0)));
    table.request_measure();
    assert!(table.after_layout(&MemoryMeasureRoot::new().row("r1", 50.0)));
}

#[test]
fn test_no_sync_without_fixed_columns() {
    let mut table = Table::new(
        vec![Column::new("a", "A")],
        vec![json!({"key": "r1"})],
        TableConfig::default(),
    );
    assert!(!table.after_layout(&MemoryMeasureRoot::new().row("r1", 30.0)));
    assert!(table.heights().published().body.is_empty());
}
