//! Rendering callback contract.
//!
//! This module defines the `TableRenderer` trait. The engine hands each
//! callback layout-resolved, immutable inputs and treats the returned node as
//! opaque: it never inspects what a renderer produces.

use crate::columns::{HeaderCell, LeafColumn};
use crate::layout::{BodyRow, PaneKind, RowHeight};

/// Layout data for one header row (and each of its cells).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderRowContext {
    pub pane: PaneKind,
    pub row_index: usize,
    /// Forced height in fixed panes
    pub height: Option<RowHeight>,
    /// Sticky translation applied to the whole header
    pub translate_y: f64,
}

/// Layout data for one body cell.
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub pane: PaneKind,
    pub column: &'a LeafColumn,
    /// Leaf index within the pane
    pub col_index: usize,
    /// The cell belongs to a fixed pane and is a hidden placeholder here
    pub hidden: bool,
    /// The cell carries the expand icon
    pub expand_icon: bool,
    /// Left padding for nested rows, in pixels
    pub indent_px: Option<f64>,
}

/// Capability-typed rendering callbacks.
///
/// Implementations produce the host's node type (DOM elements, JSON, test
/// markers). Optional parts default to rendering nothing.
pub trait TableRenderer<R> {
    type Node;

    fn header_cell(&mut self, cell: &HeaderCell<'_>, ctx: &HeaderRowContext) -> Self::Node;

    fn header_row(&mut self, cells: Vec<Self::Node>, ctx: &HeaderRowContext) -> Self::Node;

    fn body_cell(&mut self, row: &BodyRow<'_, R>, ctx: &CellContext<'_>) -> Self::Node;

    /// Content of an expanded row's extra row.
    fn expanded_content(&mut self, row: &BodyRow<'_, R>) -> Option<Self::Node>;

    fn body_row(&mut self, row: &BodyRow<'_, R>, cells: Vec<Self::Node>) -> Self::Node;

    /// Summary rows under the body of `pane`.
    fn summary(&mut self, _pane: PaneKind, _translate_y: f64) -> Option<Self::Node> {
        None
    }
}
