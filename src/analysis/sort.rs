//! Sorted, truncated view of a table for the data grid.

use std::cmp::Ordering;

use crate::domain::{Dimension, SortColumn, SortDirection, Table, Transaction};
use crate::error::PipelineError;

/// Row counts offered by the data grid.
pub const ROW_LIMIT_CHOICES: [usize; 5] = [10, 25, 50, 100, 500];

/// First `limit` rows of `table` stably sorted on `column`.
///
/// Rows that compare equal keep their table order in both directions.
pub fn sorted_view(table: &Table, column: SortColumn, direction: SortDirection, limit: usize) -> Table {
    let mut rows: Vec<&Transaction> = table.iter().collect();
    match direction {
        SortDirection::Ascending => rows.sort_by(|a, b| compare(a, b, column)),
        SortDirection::Descending => rows.sort_by(|a, b| compare(b, a, column)),
    }
    Table::new(rows.into_iter().take(limit).cloned().collect())
}

/// Like [`sorted_view`], for a column given by name.
///
/// The name is checked against the table schema before anything is sorted.
pub fn sorted_view_by_name(
    table: &Table,
    column: &str,
    direction: SortDirection,
    limit: usize,
) -> Result<Table, PipelineError> {
    let column: SortColumn = column.parse()?;
    Ok(sorted_view(table, column, direction, limit))
}

/// Text columns order by their display text, the way they read in the grid.
fn compare(a: &Transaction, b: &Transaction, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Date => a.date.cmp(&b.date),
        SortColumn::Product => a.product.display_name().cmp(b.product.display_name()),
        SortColumn::Category => a.category.display_name().cmp(b.category.display_name()),
        SortColumn::Region => a.region.display_name().cmp(b.region.display_name()),
        SortColumn::Quantity => a.quantity.cmp(&b.quantity),
        SortColumn::Price => a.price.cmp(&b.price),
        SortColumn::Revenue => a.revenue.cmp(&b.revenue),
        SortColumn::Month => a.month.cmp(&b.month),
        SortColumn::Year => a.year.cmp(&b.year),
    }
}
