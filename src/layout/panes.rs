//! Pane planning: which panes render, their widths and the table layout mode.

use serde::Serialize;

use super::ColumnWidthAccumulator;
use crate::columns::ColumnTree;
use crate::scroll::PaneId;
use crate::types::{FixedSide, TableConfig, TableLayout};

/// One of the separately rendered column blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaneKind {
    Main,
    FixedLeft,
    FixedRight,
}

impl PaneKind {
    pub fn side(self) -> Option<FixedSide> {
        match self {
            PaneKind::Main => None,
            PaneKind::FixedLeft => Some(FixedSide::Left),
            PaneKind::FixedRight => Some(FixedSide::Right),
        }
    }

    pub fn from_side(side: FixedSide) -> Self {
        match side {
            FixedSide::Left => PaneKind::FixedLeft,
            FixedSide::Right => PaneKind::FixedRight,
        }
    }

    /// The scrollable body element of this pane.
    pub fn body_pane(self) -> PaneId {
        match self {
            PaneKind::Main => PaneId::Body,
            PaneKind::FixedLeft => PaneId::FixedLeftBody,
            PaneKind::FixedRight => PaneId::FixedRightBody,
        }
    }
}

/// A fixed pane: its leaves, its width and its scrollable body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedPaneDescriptor {
    pub side: FixedSide,
    /// Leaf column keys, in order
    pub columns: Vec<String>,
    pub width: f64,
    pub body: PaneId,
    /// Space reserved under the body for the main pane's horizontal scrollbar
    pub scrollbar_gutter: f64,
}

/// Runtime facts the plan depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneInputs {
    pub has_data: bool,
    /// The main body currently overflows horizontally
    pub is_horizon_scroll: bool,
    pub scrollbar_size: f64,
}

/// Resolved pane arrangement for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneLayout {
    pub table_layout: TableLayout,
    /// Header pinned above a vertically scrolling body
    pub fix_header: bool,
    pub horizon_scroll: bool,
    /// Fixed columns are honored
    pub fix_column: bool,
    /// Main-pane columns rendered as hidden placeholders
    pub main_placeholders: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<FixedPaneDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<FixedPaneDescriptor>,
}

impl PaneLayout {
    pub fn fixed(&self, side: FixedSide) -> Option<&FixedPaneDescriptor> {
        match side {
            FixedSide::Left => self.left.as_ref(),
            FixedSide::Right => self.right.as_ref(),
        }
    }

    /// Panes that render this time, main first.
    pub fn panes(&self) -> Vec<PaneKind> {
        let mut panes = vec![PaneKind::Main];
        if self.left.is_some() {
            panes.push(PaneKind::FixedLeft);
        }
        if self.right.is_some() {
            panes.push(PaneKind::FixedRight);
        }
        panes
    }
}

/// Fixed columns only take effect with horizontal scrolling.
pub fn is_fix_column(config: &TableConfig, tree: &ColumnTree) -> bool {
    config.scroll.horizontal() && tree.has_any_fixed()
}

/// Explicit `tableLayout`; else `fixed` with fixed columns (`auto` when
/// `scroll.x` is `max-content`); else `fixed` with a pinned header or any
/// ellipsis column; else `auto`.
pub fn resolve_table_layout(config: &TableConfig, tree: &ColumnTree) -> TableLayout {
    if let Some(layout) = config.table_layout {
        return layout;
    }
    if is_fix_column(config, tree) {
        let max_content = config
            .scroll
            .x
            .as_ref()
            .is_some_and(|x| x.is_max_content());
        return if max_content {
            TableLayout::Auto
        } else {
            TableLayout::Fixed
        };
    }
    if config.scroll.vertical() || tree.leaves().iter().any(|l| l.column.ellipsis) {
        return TableLayout::Fixed;
    }
    TableLayout::Auto
}

/// Decide which panes render and how wide the fixed ones are.
pub fn plan_panes(
    tree: &ColumnTree,
    config: &TableConfig,
    widths: &ColumnWidthAccumulator,
    inputs: PaneInputs,
) -> PaneLayout {
    let fix_column = is_fix_column(config, tree);

    let fixed_pane = |side: FixedSide| {
        if !fix_column || !inputs.has_data || !tree.has_fixed(side) {
            return None;
        }
        Some(FixedPaneDescriptor {
            side,
            columns: tree.side_leaves(side).map(|l| l.key.clone()).collect(),
            width: widths.side_width(tree, side),
            body: PaneKind::from_side(side).body_pane(),
            scrollbar_gutter: if inputs.is_horizon_scroll {
                inputs.scrollbar_size
            } else {
                0.0
            },
        })
    };
    let left = fixed_pane(FixedSide::Left);
    let right = fixed_pane(FixedSide::Right);

    let main_placeholders = if fix_column {
        tree.leaves()
            .iter()
            .filter(|l| l.fixed.is_some())
            .map(|l| l.key.clone())
            .collect()
    } else {
        Vec::new()
    };

    PaneLayout {
        table_layout: resolve_table_layout(config, tree),
        fix_header: config.scroll.vertical(),
        horizon_scroll: config.scroll.horizontal(),
        fix_column,
        main_placeholders,
        left,
        right,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{Column, ScrollConfig, ScrollExtent};

    fn tree() -> ColumnTree {
        ColumnTree::resolve(vec![
            Column::new("a", "A").fixed(FixedSide::Left).width(100.0),
            Column::new("b", "B").width(200.0),
            Column::new("c", "C").fixed(FixedSide::Right).width(80.0),
        ])
    }

    fn inputs() -> PaneInputs {
        PaneInputs {
            has_data: true,
            is_horizon_scroll: true,
            scrollbar_size: 15.0,
        }
    }

    #[test]
    fn test_fixed_panes_need_horizontal_scroll() {
        let tree = tree();
        let config = TableConfig::default();
        let plan = plan_panes(&tree, &config, &ColumnWidthAccumulator::new(), inputs());
        assert!(!plan.fix_column);
        assert_eq!(plan.panes(), vec![PaneKind::Main]);
        assert!(plan.main_placeholders.is_empty());
    }

    #[test]
    fn test_fixed_panes_planned() {
        let tree = tree();
        let config = TableConfig {
            scroll: ScrollConfig::px(600.0, 300.0),
            ..TableConfig::default()
        };
        let plan = plan_panes(&tree, &config, &ColumnWidthAccumulator::new(), inputs());
        assert_eq!(plan.panes().len(), 3);
        let left = plan.fixed(FixedSide::Left).unwrap();
        assert_eq!(left.width, 100.0);
        assert_eq!(left.body, PaneId::FixedLeftBody);
        assert_eq!(left.scrollbar_gutter, 15.0);
        assert_eq!(plan.fixed(FixedSide::Right).unwrap().columns, vec!["c"]);
        assert_eq!(plan.main_placeholders, vec!["a", "c"]);
        assert_eq!(plan.table_layout, TableLayout::Fixed);
    }

    #[test]
    fn test_no_fixed_panes_without_data() {
        let tree = tree();
        let config = TableConfig {
            scroll: ScrollConfig::px(600.0, 300.0),
            ..TableConfig::default()
        };
        let plan = plan_panes(
            &tree,
            &config,
            &ColumnWidthAccumulator::new(),
            PaneInputs::default(),
        );
        assert!(plan.fix_column);
        assert!(plan.left.is_none() && plan.right.is_none());
    }

    #[test]
    fn test_table_layout_rules() {
        let tree = tree();
        let mut config = TableConfig::default();
        assert_eq!(resolve_table_layout(&config, &tree), TableLayout::Auto);

        config.scroll.y = Some(ScrollExtent::Px(100.0));
        assert_eq!(resolve_table_layout(&config, &tree), TableLayout::Fixed);

        config.scroll.x = Some(ScrollExtent::Css("max-content".into()));
        assert_eq!(resolve_table_layout(&config, &tree), TableLayout::Auto);

        config.table_layout = Some(TableLayout::Fixed);
        assert_eq!(resolve_table_layout(&config, &tree), TableLayout::Fixed);

        let ellipsis = ColumnTree::resolve(vec![Column::new("a", "A").ellipsis()]);
        assert_eq!(
            resolve_table_layout(&TableConfig::default(), &ellipsis),
            TableLayout::Fixed
        );
    }
}
