//! Column width accumulation tests
//!
//! Reported widths, declared-width fallbacks and fixed pane totals.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]

use serde_json::json;
use tablesync::columns::ColumnTree;
use tablesync::layout::{ColumnWidthAccumulator, PaneKind};
use tablesync::{Column, FixedSide, ScrollConfig, Table, TableConfig};
use test_case::test_case;

fn tree() -> ColumnTree {
    ColumnTree::resolve(vec![
        Column::new("a", "A").fixed(FixedSide::Left).width(100.0),
        Column::new("b", "B").fixed(FixedSide::Left),
        Column::new("c", "C").width(300.0),
        Column::new("d", "D").fixed(FixedSide::Right).width(80.0),
    ])
}

#[test]
fn test_declared_width_until_measured() {
    let tree = tree();
    let mut widths = ColumnWidthAccumulator::new();
    assert_eq!(widths.side_width(&tree, FixedSide::Left), 100.0);
    assert_eq!(widths.side_width(&tree, FixedSide::Right), 80.0);
    assert_eq!(widths.total_width(tree.leaves()), 480.0);

    assert!(widths.report_width("b", 50.0));
    assert!(widths.report_width("a", 120.0));
    assert_eq!(widths.side_width(&tree, FixedSide::Left), 170.0);
}

#[test]
fn test_identical_reports_are_idempotent() {
    let mut widths = ColumnWidthAccumulator::new();
    assert!(widths.report_width("a", 90.0));
    let version = widths.version();
    assert!(!widths.report_width("a", 90.0));
    assert_eq!(widths.version(), version);

    // last write wins
    assert!(widths.report_width("a", 95.0));
    assert_eq!(widths.measured("a"), Some(95.0));
    assert!(widths.version() > version);
}

#[test_case(f64::NAN ; "nan")]
#[test_case(f64::INFINITY ; "infinite")]
#[test_case(-1.0 ; "negative")]
fn test_invalid_reports_ignored(px: f64) {
    let mut widths = ColumnWidthAccumulator::new();
    assert!(!widths.report_width("a", px));
    assert_eq!(widths.measured("a"), None);
}

#[test]
fn test_clear_resets_to_declared() {
    let tree = tree();
    let mut widths = ColumnWidthAccumulator::new();
    widths.report_width("a", 10.0);
    widths.clear();
    assert_eq!(widths.side_width(&tree, FixedSide::Left), 100.0);
}

#[test]
fn test_table_column_resize_moves_fixed_pane_width() {
    let config = TableConfig {
        scroll: ScrollConfig::px(1000.0, 300.0),
        ..TableConfig::default()
    };
    let columns = vec![
        Column::new("a", "A").fixed(FixedSide::Left).width(100.0),
        Column::new("c", "C").width(300.0),
    ];
    let mut table = Table::new(columns, vec![json!({"key": 1})], config);
    assert_eq!(table.pane_layout().left.unwrap().width, 100.0);

    assert!(table.on_column_resize("a", 140.0));
    assert_eq!(table.pane_layout().left.unwrap().width, 140.0);
    assert_eq!(table.expanded_row_width(PaneKind::FixedLeft), Some(140.0));
}
