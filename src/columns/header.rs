//! Header cell grid with merged spans.

use serde::{Serialize, Serializer};

use crate::types::Column;

/// One cell of the header grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell<'a> {
    /// The column this cell titles
    #[serde(serialize_with = "serialize_column_ref")]
    pub column: &'a Column,
    /// First leaf-column index covered (0-based)
    pub col_start: usize,
    /// Last leaf-column index covered (inclusive)
    pub col_end: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub has_sub_columns: bool,
}

fn serialize_column_ref<S: Serializer>(column: &&Column, s: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct ColumnRef<'c> {
        key: Option<&'c str>,
        title: &'c str,
    }
    ColumnRef {
        key: column.key.as_deref(),
        title: &column.title,
    }
    .serialize(s)
}

/// Header rows, top to bottom.
pub type HeaderRows<'a> = Vec<Vec<HeaderCell<'a>>>;

struct PendingCell<'a> {
    cell: HeaderCell<'a>,
    explicit_row_span: bool,
}

/// Build the header grid for `columns`.
///
/// Cells without an explicit `rowSpan` and without sub-columns stretch to the
/// bottom of the header (`rowSpan = totalRows - rowIndex`). An empty column
/// list yields an empty grid.
pub fn build_header_rows(columns: &[Column]) -> HeaderRows<'_> {
    let mut rows: Vec<Vec<PendingCell<'_>>> = Vec::new();
    fill_row_cells(columns, 0, 0, &mut rows);

    let row_count = rows.len();
    let mut out: HeaderRows<'_> = Vec::with_capacity(row_count);
    for (row_index, row) in rows.into_iter().enumerate() {
        let cells: Vec<HeaderCell<'_>> = row
            .into_iter()
            .map(|pending| {
                let mut cell = pending.cell;
                if !pending.explicit_row_span && !cell.has_sub_columns {
                    cell.row_span = row_count - row_index;
                }
                cell
            })
            .collect();
        out.push(cells);
    }

    if out.first().is_some_and(Vec::is_empty) {
        return Vec::new();
    }
    out
}

/// Depth-first fill. Returns the resolved colSpan of each column in `columns`.
fn fill_row_cells<'a>(
    columns: &'a [Column],
    col_index: usize,
    row_index: usize,
    rows: &mut Vec<Vec<PendingCell<'a>>>,
) -> Vec<usize> {
    if rows.len() <= row_index {
        rows.resize_with(row_index + 1, Vec::new);
    }

    let mut current = col_index;
    let mut spans = Vec::with_capacity(columns.len());
    for column in columns {
        let mut col_span = 1;
        let has_sub_columns = column.has_children();
        if has_sub_columns {
            col_span = fill_row_cells(&column.children, current, row_index + 1, rows)
                .iter()
                .sum();
        }
        if let Some(explicit) = column.col_span {
            col_span = explicit;
        }

        let cell = HeaderCell {
            column,
            col_start: current,
            col_end: (current + col_span).saturating_sub(1),
            row_span: column.row_span.unwrap_or(1),
            col_span,
            has_sub_columns,
        };
        if let Some(row) = rows.get_mut(row_index) {
            row.push(PendingCell {
                cell,
                explicit_row_span: column.row_span.is_some(),
            });
        }

        current += col_span;
        spans.push(col_span);
    }
    spans
}
