//! Pane rendering driven by resolved layout.
//!
//! This module provides:
//! - The `TableRenderer` callback contract
//! - `render_pane`, which walks a pane's header grid and body plan
//! - A JSON renderer used by the CLI and tests

pub mod backend;
mod json;

pub use backend::{CellContext, HeaderRowContext, TableRenderer};
pub use json::JsonRenderer;

use crate::columns::{HeaderRows, LeafColumn};
use crate::expand::ExpandableType;
use crate::layout::{BodyRow, BodyRowKind, PaneKind, RowHeight};

/// Everything needed to render one pane.
pub struct PaneRenderParams<'a, R> {
    pub pane: PaneKind,
    pub show_header: bool,
    pub header_rows: &'a HeaderRows<'a>,
    /// Forced height of each header row, `None` in the main pane
    pub header_row_height: Option<RowHeight>,
    pub leaves: &'a [&'a LeafColumn],
    /// Keys of leaves rendered as hidden placeholders
    pub placeholders: &'a [String],
    pub body: &'a [BodyRow<'a, R>],
    pub expandable_type: ExpandableType,
    pub expand_icon_column_index: usize,
    pub indent_size: f64,
    pub header_translate_y: f64,
    pub summary_translate_y: f64,
}

/// Rendered output of one pane.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPane<N> {
    pub pane: PaneKind,
    pub header: Vec<N>,
    pub body: Vec<N>,
    pub summary: Option<N>,
}

/// Walk the pane's header grid and body rows through `renderer`.
pub fn render_pane<R, T: TableRenderer<R>>(
    renderer: &mut T,
    params: &PaneRenderParams<'_, R>,
) -> RenderedPane<T::Node> {
    let mut header = Vec::new();
    if params.show_header {
        for (row_index, cells) in params.header_rows.iter().enumerate() {
            let ctx = HeaderRowContext {
                pane: params.pane,
                row_index,
                height: params.header_row_height,
                translate_y: params.header_translate_y,
            };
            let nodes = cells.iter().map(|cell| renderer.header_cell(cell, &ctx)).collect();
            header.push(renderer.header_row(nodes, &ctx));
        }
    }

    let mut body = Vec::with_capacity(params.body.len());
    for row in params.body {
        let cells = match row.kind {
            BodyRowKind::Record => record_cells(renderer, params, row),
            BodyRowKind::Expanded { .. } => renderer.expanded_content(row).into_iter().collect(),
        };
        body.push(renderer.body_row(row, cells));
    }

    RenderedPane {
        pane: params.pane,
        header,
        body,
        summary: renderer.summary(params.pane, params.summary_translate_y),
    }
}

#[allow(clippy::cast_precision_loss)]
fn record_cells<R, T: TableRenderer<R>>(
    renderer: &mut T,
    params: &PaneRenderParams<'_, R>,
    row: &BodyRow<'_, R>,
) -> Vec<T::Node> {
    params
        .leaves
        .iter()
        .enumerate()
        .map(|(col_index, column)| {
            let nest_icon = params.expandable_type == ExpandableType::Nest
                && col_index == params.expand_icon_column_index;
            let ctx = CellContext {
                pane: params.pane,
                column,
                col_index,
                hidden: params.placeholders.contains(&column.key),
                expand_icon: nest_icon || column.is_expand_column(),
                indent_px: nest_icon.then(|| params.indent_size * row.indent as f64),
            };
            renderer.body_cell(row, &ctx)
        })
        .collect()
}
