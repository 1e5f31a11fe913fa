//! `%N` placeholder substitution.
//!
//! Two sources feed placeholders: a run of adjacent cells (output paths) and
//! the control sheet's argument set (request bodies). Indices must form a
//! dense run starting at `%1`; substitution runs highest-index first so `%1`
//! never clobbers `%10`.

use crate::errors::EngineError;
use crate::grid::{self, cell_address};
use once_cell::sync::Lazy;
use regex::Regex;
use umya_spreadsheet::Worksheet;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"%(\d+)").unwrap());

/// Distinct placeholder indices referenced by `template`, validated to be the
/// dense run `1..=k`. Returns `k` (0 when the template has no placeholders).
pub fn referenced_indices(template: &str) -> Result<usize, EngineError> {
    let mut indices: Vec<usize> = PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps[1].parse().ok())
        .collect();
    indices.sort_unstable();
    indices.dedup();

    for (position, index) in indices.iter().enumerate() {
        let expected = position + 1;
        if *index != expected {
            return Err(EngineError::SparsePlaceholders {
                template: template.to_string(),
                missing_index: expected,
            });
        }
    }
    Ok(indices.len())
}

/// Substitute `%1..%k` from the run of cells starting at
/// `(start_col, row)`, one column per index. An empty or missing cell for a
/// referenced index is an error.
pub fn resolve_from_cells(
    template: &str,
    sheet: &Worksheet,
    row: u32,
    start_col: u32,
) -> Result<String, EngineError> {
    let count = referenced_indices(template)?;
    tracing::debug!(
        cell = %cell_address(start_col, row),
        template,
        "resolving placeholders from cell run"
    );

    let mut result = template.to_string();
    for index in (1..=count).rev() {
        let col = start_col + (index as u32 - 1);
        let value = grid::cell_value(sheet, col, row).ok_or_else(|| {
            EngineError::PlaceholderUnresolved {
                index,
                coordinate: cell_address(col, row),
            }
        })?;
        result = result.replace(&format!("%{index}"), &value);
    }

    tracing::debug!(resolved = %result, "placeholder resolution complete");
    Ok(result)
}

/// Substitute `%1..%n` from an argument set. Tokens beyond the argument
/// count are left untouched.
pub fn resolve_from_args(template: &str, args: &[String]) -> String {
    let mut result = template.to_string();
    for (position, value) in args.iter().enumerate().rev() {
        result = result.replace(&format!("%{}", position + 1), value);
    }
    result
}
