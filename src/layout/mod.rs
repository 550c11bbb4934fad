//! Layout state shared across panes.
//!
//! This module handles:
//! - Measured column widths and fixed-pane totals
//! - Row height measurement and republication for fixed panes
//! - Pane planning and table layout resolution
//! - Flattening records into body rows

mod body;
mod panes;
mod row_heights;
mod widths;

pub use body::{plan_body_rows, resolve_row_key, BodyPlan, BodyPlanContext, BodyRow, BodyRowKind};
pub use panes::{
    is_fix_column, plan_panes, resolve_table_layout, FixedPaneDescriptor, PaneInputs, PaneKind,
    PaneLayout,
};
pub use row_heights::{
    expanded_row_key, summary_row_key, RowHeight, RowHeightMap, RowHeightSynchronizer,
    EXPANDED_ROW_SUFFIX, SUMMARY_ROW_PREFIX,
};
pub use widths::ColumnWidthAccumulator;
