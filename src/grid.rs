//! Grid addressing helpers and the linear symbol scanner.
//!
//! Cells are addressed as 1-based `(column, row)` pairs throughout the crate;
//! A1 notation appears only in messages and logs.

use crate::errors::EngineError;
use umya_spreadsheet::Worksheet;
use umya_spreadsheet::helper::coordinate::coordinate_from_index;

/// A1 form of a `(column, row)` coordinate, for messages and logs.
pub fn cell_address(col: u32, row: u32) -> String {
    coordinate_from_index(&col, &row)
}

/// Cell value as a string; `None` when the cell is absent or holds the
/// empty string.
pub fn cell_value(sheet: &Worksheet, col: u32, row: u32) -> Option<String> {
    let value = sheet.get_cell((col, row))?.get_value().to_string();
    if value.is_empty() { None } else { Some(value) }
}

fn value_eq(sheet: &Worksheet, col: u32, row: u32, symbol: &str) -> bool {
    sheet
        .get_cell((col, row))
        .map(|cell| cell.get_value() == symbol)
        .unwrap_or(false)
}

/// Scan `row` rightwards from `start_col` for a cell whose value equals
/// `symbol`; returns the matching column.
pub fn find_in_row(
    sheet: &Worksheet,
    symbol: &str,
    row: u32,
    start_col: u32,
) -> Result<u32, EngineError> {
    let (max_col, _) = sheet.get_highest_column_and_row();
    for col in start_col..=max_col.max(start_col) {
        tracing::trace!(symbol, cell = %cell_address(col, row), "seeking symbol");
        if value_eq(sheet, col, row, symbol) {
            tracing::debug!(symbol, cell = %cell_address(col, row), "symbol found");
            return Ok(col);
        }
    }
    Err(EngineError::MarkerNotFound {
        symbol: symbol.to_string(),
        row,
        column: max_col.max(start_col),
    })
}

/// Column immediately right of the first `symbol` match in `row`; this is
/// where a directive's operand run starts.
pub fn operand_after(
    sheet: &Worksheet,
    symbol: &str,
    row: u32,
    start_col: u32,
) -> Result<u32, EngineError> {
    Ok(find_in_row(sheet, symbol, row, start_col)? + 1)
}
