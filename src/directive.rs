//! Grid-to-directive parsing.
//!
//! The marker column encodes a tiny instruction set inside each form. One
//! scan per replica turns it into typed records, so execution never touches
//! the grid layout again: operand runs and destination cells are resolved
//! here, values are consumed later by the runner.

use crate::errors::EngineError;
use crate::grid;
use crate::markers;
use crate::path;
use crate::template::FormBounds;
use umya_spreadsheet::Worksheet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Call {
        service: String,
        region: String,
        action: String,
        body_template: String,
        row: u32,
    },
    Output {
        /// `$`-rooted dotted path, possibly still holding `%N` placeholders.
        path_template: String,
        /// Start of the `###` run, present when the path has placeholders.
        params_start: Option<(u32, u32)>,
        /// Destination cell, located right of the replica's own `####`.
        dest: (u32, u32),
        row: u32,
    },
}

/// Scan the form's rows for replica `replica` (1-based) and return its
/// directives in document order. Rows before the `%top` marker row are
/// ignored; the scan stops at `%bottom`.
pub fn scan(
    sheet: &Worksheet,
    bounds: &FormBounds,
    replica: usize,
) -> Result<Vec<Directive>, EngineError> {
    let left_marker = markers::replica_marker(markers::LEFT, replica);
    let mut replica_left: Option<u32> = None;
    let mut directives = Vec::new();

    for row in bounds.top..=bounds.bottom {
        let Some(value) = grid::cell_value(sheet, 1, row) else {
            continue;
        };
        if value == markers::TOP {
            replica_left = Some(grid::find_in_row(sheet, &left_marker, row, 1)?);
        } else if value == markers::BOTTOM {
            break;
        } else if let Some(left) = replica_left {
            if value == markers::CALL {
                let start = grid::operand_after(sheet, markers::OPERANDS, row, 1)?;
                directives.push(Directive::Call {
                    service: grid::cell_value(sheet, start, row).unwrap_or_default(),
                    region: grid::cell_value(sheet, start + 1, row).unwrap_or_default(),
                    action: grid::cell_value(sheet, start + 2, row).unwrap_or_default(),
                    body_template: grid::cell_value(sheet, start + 3, row).unwrap_or_default(),
                    row,
                });
            } else if value == markers::OUTPUT {
                let path_start = grid::operand_after(sheet, markers::OPERANDS, row, 1)?;
                let path_template = path::build_path(sheet, row, path_start)?;
                let params_start = if path_template.contains(markers::PLACEHOLDER) {
                    Some((
                        grid::operand_after(sheet, markers::PATH_PARAMS, row, 1)?,
                        row,
                    ))
                } else {
                    None
                };
                let dest_col = grid::operand_after(sheet, markers::DESTINATION, row, left)?;
                directives.push(Directive::Output {
                    path_template,
                    params_start,
                    dest: (dest_col, row),
                    row,
                });
            }
        }
    }

    Ok(directives)
}
