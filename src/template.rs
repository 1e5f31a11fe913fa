//! Form location and template replication.
//!
//! The form is the rectangle spanned by the `%top`/`%bottom` rows (markers in
//! column 1) and the `%left`/`%right` columns (markers in the `%top` row).
//! Replicas are laid out block by block immediately right of the template,
//! so every replica shares the template's rows.

use crate::errors::EngineError;
use crate::grid::{self, cell_address};
use crate::markers;
use umya_spreadsheet::Worksheet;
use umya_spreadsheet::helper::coordinate::index_from_coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormBounds {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl FormBounds {
    pub fn width(&self) -> u32 {
        self.right - self.left + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    min_col: u32,
    min_row: u32,
    max_col: u32,
    max_row: u32,
}

impl Rect {
    fn contains(&self, other: &Rect) -> bool {
        self.min_col <= other.min_col
            && self.min_row <= other.min_row
            && self.max_col >= other.max_col
            && self.max_row >= other.max_row
    }

    fn is_disjoint(&self, other: &Rect) -> bool {
        self.max_col < other.min_col
            || other.max_col < self.min_col
            || self.max_row < other.min_row
            || other.max_row < self.min_row
    }
}

/// Locate the form rectangle. The first `%top` row and the first `%bottom`
/// row after it win; `%left`/`%right` are resolved within the `%top` row.
pub fn find_form(sheet: &Worksheet) -> Result<FormBounds, EngineError> {
    let (_, max_row) = sheet.get_highest_column_and_row();
    let mut top: Option<(u32, u32, u32)> = None;

    for row in 1..=max_row {
        let Some(value) = grid::cell_value(sheet, 1, row) else {
            continue;
        };
        if value == markers::TOP && top.is_none() {
            let left = grid::find_in_row(sheet, markers::LEFT, row, 1).map_err(|_| {
                EngineError::BoundaryNotFound {
                    sheet: sheet.get_name().to_string(),
                    marker: markers::LEFT.to_string(),
                }
            })?;
            let right = grid::find_in_row(sheet, markers::RIGHT, row, left).map_err(|_| {
                EngineError::BoundaryNotFound {
                    sheet: sheet.get_name().to_string(),
                    marker: markers::RIGHT.to_string(),
                }
            })?;
            top = Some((row, left, right));
        } else if value == markers::BOTTOM
            && let Some((top_row, left, right)) = top
        {
            return Ok(FormBounds {
                top: top_row,
                bottom: row,
                left,
                right,
            });
        }
    }

    let missing = if top.is_none() {
        markers::TOP
    } else {
        markers::BOTTOM
    };
    Err(EngineError::BoundaryNotFound {
        sheet: sheet.get_name().to_string(),
        marker: missing.to_string(),
    })
}

/// Replicate the form `count` times to the right of the template, then clear
/// everything beyond the last replica so re-runs always produce the same
/// sheet extent. Returns the located template bounds.
pub fn replicate_form(sheet: &mut Worksheet, count: usize) -> Result<FormBounds, EngineError> {
    let bounds = find_form(sheet)?;
    let width = bounds.width();
    let form_rect = Rect {
        min_col: bounds.left,
        min_row: bounds.top,
        max_col: bounds.right,
        max_row: bounds.bottom,
    };

    let template_merges: Vec<Rect> = sheet
        .get_merge_cells()
        .iter()
        .filter_map(|range| parse_rect(&range.get_range()))
        .filter(|rect| form_rect.contains(rect))
        .collect();

    let mut shift_failures = 0u64;
    let mut work_col = bounds.right + 1;
    for index in 1..=count {
        let block_start = work_col;
        let block_rect = Rect {
            min_col: block_start,
            min_row: bounds.top,
            max_col: block_start + width - 1,
            max_row: bounds.bottom,
        };
        let delta_col = block_start as i32 - bounds.left as i32;

        sheet
            .get_merge_cells_mut()
            .retain(|range| match parse_rect(&range.get_range()) {
                Some(rect) => block_rect.is_disjoint(&rect),
                None => true,
            });

        for offset in 0..width {
            let src_col = bounds.left + offset;
            let dst_col = block_start + offset;
            copy_column_dimensions(sheet, src_col, dst_col);
            for row in bounds.top..=bounds.bottom {
                shift_failures +=
                    copy_cell(sheet, src_col, row, dst_col, index, delta_col, &bounds);
            }
        }

        for rect in &template_merges {
            let shifted = format!(
                "{}:{}",
                cell_address((rect.min_col as i32 + delta_col) as u32, rect.min_row),
                cell_address((rect.max_col as i32 + delta_col) as u32, rect.max_row),
            );
            sheet.add_merge_cells(shifted);
        }

        work_col = block_rect.max_col + 1;
    }

    if shift_failures > 0 {
        tracing::warn!(
            sheet = sheet.get_name(),
            count = shift_failures,
            "copied formulas verbatim after reference shift failed"
        );
    }

    clear_beyond(sheet, work_col, bounds.bottom);
    Ok(bounds)
}

/// Copy one template cell into a replica block. Returns 1 when a formula
/// could not be shifted and was copied verbatim.
fn copy_cell(
    sheet: &mut Worksheet,
    src_col: u32,
    row: u32,
    dst_col: u32,
    replica: usize,
    delta_col: i32,
    bounds: &FormBounds,
) -> u64 {
    let Some(src_cell) = sheet.get_cell((src_col, row)) else {
        sheet.remove_cell((dst_col, row));
        return 0;
    };

    let src_value = src_cell.get_value().to_string();
    let src_formula = if src_cell.is_formula() {
        Some(src_cell.get_formula().to_string())
    } else {
        None
    };
    let src_style = src_cell.get_style().clone();

    let boundary = if row == bounds.top {
        if src_value == markers::LEFT {
            Some(markers::replica_marker(markers::LEFT, replica))
        } else if src_value == markers::RIGHT {
            Some(markers::replica_marker(markers::RIGHT, replica))
        } else {
            None
        }
    } else {
        None
    };

    let mut failures = 0;
    let dst_cell = sheet.get_cell_mut((dst_col, row));
    dst_cell.set_style(src_style);
    dst_cell.get_cell_value_mut().remove_formula();

    if let Some(marker) = boundary {
        dst_cell.set_value(marker);
    } else if let Some(formula) = src_formula {
        match crate::formula::translate(&formula, delta_col) {
            Ok(shifted) => {
                dst_cell.set_formula(shifted);
            }
            Err(_) => {
                dst_cell.set_formula(formula);
                failures = 1;
            }
        }
        dst_cell
            .get_cell_value_mut()
            .set_formula_result_default(String::new());
    } else {
        dst_cell.set_value(src_value);
    }
    failures
}

fn copy_column_dimensions(sheet: &mut Worksheet, src_col: u32, dst_col: u32) {
    let Some(src) = sheet.get_column_dimension_by_number(&src_col) else {
        return;
    };
    let width = *src.get_width();
    let hidden = *src.get_hidden();

    let dim = sheet.get_column_dimension_by_number_mut(&dst_col);
    dim.set_width(width);
    dim.set_hidden(hidden);
}

/// Remove every cell and merge range right of `first_stale_col` in rows
/// 1..=`bottom`. Leftovers from a previous, larger run can only live there.
fn clear_beyond(sheet: &mut Worksheet, first_stale_col: u32, bottom: u32) {
    let stale_rect = Rect {
        min_col: first_stale_col,
        min_row: 1,
        max_col: u32::MAX,
        max_row: bottom,
    };
    sheet
        .get_merge_cells_mut()
        .retain(|range| match parse_rect(&range.get_range()) {
            Some(rect) => stale_rect.is_disjoint(&rect),
            None => true,
        });

    let stale: Vec<(u32, u32)> = sheet
        .get_cell_collection()
        .iter()
        .map(|cell| {
            let coord = cell.get_coordinate();
            (*coord.get_col_num(), *coord.get_row_num())
        })
        .filter(|&(col, row)| col >= first_stale_col && row <= bottom)
        .collect();
    for coord in stale {
        sheet.remove_cell(coord);
    }
}

fn parse_rect(range: &str) -> Option<Rect> {
    let mut parts = range.split(':');
    let start = parts.next()?.trim();
    let end = parts.next().unwrap_or(start).trim();
    let (start_col, start_row, _, _) = index_from_coordinate(start);
    let (end_col, end_row, _, _) = index_from_coordinate(end);
    let (Some(min_col), Some(min_row), Some(max_col), Some(max_row)) =
        (start_col, start_row, end_col, end_row)
    else {
        return None;
    };
    Some(Rect {
        min_col: min_col.min(max_col),
        min_row: min_row.min(max_row),
        max_col: min_col.max(max_col),
        max_row: min_row.max(max_row),
    })
}
