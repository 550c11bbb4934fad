//! Fixed pane tests
//!
//! A twelve-column table with three left-fixed leaves and one right-fixed leaf,
//! scrolled through its main body and through the sticky scrollbar.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]

use std::rc::Rc;

use serde_json::{json, Value};
use tablesync::host::{MemoryMeasureRoot, MemoryPane};
use tablesync::layout::{PaneKind, RowHeight};
use tablesync::scroll::{ManualClock, PaneId, ScrollEvent, StickyGeometry, LOCK_TIMEOUT_MS};
use tablesync::{Column, FixedSide, RowKey, ScrollConfig, StickySpec, Table, TableConfig, TableLayout};

// ============================================================================
// Helpers
// ============================================================================

fn columns() -> Vec<Column> {
    (0..12)
        .map(|i| {
            let column = Column::new(format!("c{i}"), format!("Column {i}"));
            match i {
                0..=2 => column.fixed(FixedSide::Left).width(100.0),
                11 => column.fixed(FixedSide::Right).width(100.0),
                _ => column.width(200.0),
            }
        })
        .collect()
}

fn data() -> Vec<Value> {
    (0..20)
        .map(|i| json!({ "key": format!("r{i}"), "c0": i, "c5": format!("v{i}") }))
        .collect()
}

struct Mounted {
    table: Table<Value>,
    clock: ManualClock,
    header: MemoryPane,
    body: MemoryPane,
    left: MemoryPane,
    right: MemoryPane,
}

fn mounted() -> Mounted {
    let config = TableConfig {
        scroll: ScrollConfig::px(1000.0, 300.0),
        sticky: Some(StickySpec::Flag(true)),
        ..TableConfig::default()
    };
    let clock = ManualClock::new();
    let mut table = Table::new(columns(), data(), config).with_clock(Rc::new(clock.clone()));

    let header = MemoryPane::new(2000.0, 1000.0);
    let body = MemoryPane::new(2000.0, 1000.0).with_height(800.0, 300.0);
    let left = MemoryPane::new(300.0, 300.0).with_height(800.0, 300.0);
    let right = MemoryPane::new(100.0, 100.0).with_height(800.0, 300.0);
    table.attach_pane(PaneId::Header, Box::new(header.clone()));
    table.attach_pane(PaneId::Body, Box::new(body.clone()));
    table.attach_pane(PaneId::FixedLeftBody, Box::new(left.clone()));
    table.attach_pane(PaneId::FixedRightBody, Box::new(right.clone()));
    table.on_full_table_resize(1200.0);

    Mounted {
        table,
        clock,
        header,
        body,
        left,
        right,
    }
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_pane_plan() {
    let m = mounted();
    let layout = m.table.pane_layout();
    assert!(layout.fix_column);
    assert!(layout.fix_header);
    assert_eq!(layout.table_layout, TableLayout::Fixed);

    let left = layout.left.as_ref().unwrap();
    assert_eq!(left.columns, vec!["c0", "c1", "c2"]);
    assert_eq!(left.width, 300.0);
    assert_eq!(left.body, PaneId::FixedLeftBody);
    assert_eq!(left.scrollbar_gutter, 15.0);

    let right = layout.right.as_ref().unwrap();
    assert_eq!(right.columns, vec!["c11"]);
    assert_eq!(right.width, 100.0);

    assert_eq!(layout.main_placeholders, vec!["c0", "c1", "c2", "c11"]);
    assert_eq!(
        layout.panes(),
        vec![PaneKind::Main, PaneKind::FixedLeft, PaneKind::FixedRight]
    );
    assert_eq!(m.table.component_width(), 1000.0);
    assert!(m.table.is_horizon_scroll());
}

#[test]
fn test_fixed_panes_hidden_without_data() {
    let config = TableConfig {
        scroll: ScrollConfig::px(1000.0, 300.0),
        ..TableConfig::default()
    };
    let table: Table<Value> = Table::new(columns(), Vec::new(), config);
    let layout = table.pane_layout();
    assert!(layout.fix_column);
    assert!(layout.left.is_none());
    assert!(layout.right.is_none());
}

#[test]
fn test_fixed_columns_ignored_without_horizontal_scroll() {
    let table = Table::new(columns(), data(), TableConfig::default());
    let layout = table.pane_layout();
    assert!(!layout.fix_column);
    assert!(layout.main_placeholders.is_empty());
    assert_eq!(layout.panes(), vec![PaneKind::Main]);
    assert_eq!(table.expanded_row_width(PaneKind::Main), None);
}

#[test]
fn test_pane_leaves_and_headers() {
    let m = mounted();
    assert_eq!(m.table.pane_leaves(PaneKind::Main).len(), 12);
    assert_eq!(m.table.pane_leaves(PaneKind::FixedLeft).len(), 3);
    assert_eq!(m.table.header_rows(PaneKind::FixedRight)[0].len(), 1);
}

// ============================================================================
// Scrolling
// ============================================================================

#[test]
fn test_body_scroll_moves_header_and_sticky_only() {
    let mut m = mounted();
    m.body.user_scroll_left(200.0);
    let out = m.table.on_scroll(ScrollEvent::native(PaneId::Body));

    assert_eq!(out.forwarded_left, vec![PaneId::Header, PaneId::StickyScrollBar]);
    assert_eq!(m.header.scroll_left(), 200.0);
    let sticky = m.table.sticky_scroll_bar().unwrap();
    assert_eq!(sticky.content_scroll_left(), 200.0);
    assert_eq!(sticky.thumb_left(), 100.0);

    assert_eq!(m.left.scroll_left(), 0.0);
    assert_eq!(m.right.scroll_left(), 0.0);
    assert_eq!(m.left.left_writes(), 0);
    assert_eq!(m.right.left_writes(), 0);
}

#[test]
fn test_fixed_body_scroll_mirrors_vertically() {
    let mut m = mounted();
    m.clock.advance(LOCK_TIMEOUT_MS);
    m.left.user_scroll_top(150.0);
    let out = m.table.on_scroll(ScrollEvent::native(PaneId::FixedLeftBody));
    assert_eq!(out.forwarded_top, vec![PaneId::FixedRightBody, PaneId::Body]);
    assert_eq!(m.body.scroll_top(), 150.0);
    assert_eq!(m.right.scroll_top(), 150.0);
    assert_eq!(m.header.scroll_left(), 0.0);
}

#[test]
fn test_sticky_drag_scrolls_body_and_header() {
    let mut m = mounted();
    m.clock.advance(LOCK_TIMEOUT_MS);

    // thumb is 1000 * 1000 / 2000 wide and starts at 0
    assert_eq!(m.table.sticky_scroll_bar().unwrap().thumb_width(), 500.0);
    m.table.on_sticky_pointer_down(50.0);
    let out = m.table.on_sticky_pointer_move(250.0, true).unwrap();
    assert_eq!(out.forwarded_left, vec![PaneId::Header, PaneId::Body]);
    assert_eq!(m.body.scroll_left(), 400.0);
    assert_eq!(m.header.scroll_left(), 400.0);

    // the body's echo is swallowed by the lock
    assert!(!m.table.on_scroll(ScrollEvent::native(PaneId::Body)).accepted);

    m.table.on_sticky_pointer_up();
    assert!(m.table.on_sticky_pointer_move(300.0, true).is_none());
}

#[test]
fn test_sticky_visibility_follows_container() {
    let mut m = mounted();
    let below_fold = StickyGeometry {
        table_top: 0.0,
        table_height: 2000.0,
        viewport_bottom: 900.0,
    };
    m.table.on_container_scroll(below_fold);
    assert!(m.table.sticky_scroll_bar().unwrap().is_rendered());

    let on_screen = StickyGeometry {
        table_top: 0.0,
        table_height: 400.0,
        viewport_bottom: 900.0,
    };
    assert!(m.table.on_container_scroll(on_screen));
    assert!(!m.table.sticky_scroll_bar().unwrap().is_rendered());
}

#[test]
fn test_ping_reaches_right_edge() {
    let mut m = mounted();
    m.body.user_scroll_left(1000.0);
    m.table.on_scroll(ScrollEvent::native(PaneId::Body));
    let ping = m.table.ping();
    assert!(ping.left);
    assert!(!ping.right);
}

// ============================================================================
// Heights and hover across panes
// ============================================================================

#[test]
fn test_fixed_rows_match_main_rows() {
    let mut m = mounted();
    let root = (0..20).fold(MemoryMeasureRoot::new().header(55.0), |root, i| {
        root.row(format!("r{i}"), if i == 3 { 0.0 } else { 40.0 })
    });
    assert!(m.table.after_layout(&root));

    for pane in [PaneKind::FixedLeft, PaneKind::FixedRight] {
        let rows = m.table.body_rows(pane);
        assert_eq!(rows.rows.len(), 20);
        assert_eq!(rows.rows[0].height, Some(RowHeight::Px(40.0)));
        // never measured with a positive height
        assert_eq!(rows.rows[3].height, Some(RowHeight::Auto));
        assert_eq!(m.table.header_row_height(pane), Some(RowHeight::Px(55.0)));
    }
}

#[test]
fn test_hover_shared_across_panes() {
    let mut m = mounted();
    assert!(m.table.set_hover(Some(RowKey::from("r2"))));
    assert!(!m.table.set_hover(Some(RowKey::from("r2"))));
    for pane in [PaneKind::Main, PaneKind::FixedLeft, PaneKind::FixedRight] {
        let rows = m.table.body_rows(pane);
        let hovered: Vec<&str> = rows
            .rows
            .iter()
            .filter(|r| r.hovered)
            .map(|r| r.key.as_str())
            .collect();
        assert_eq!(hovered, vec!["r2"]);
    }
    assert!(m.table.set_hover(None));
    assert!(m.table.hovered().is_none());
}
