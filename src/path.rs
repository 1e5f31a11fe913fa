//! Dotted-path construction and evaluation against response trees.
//!
//! Paths are assembled from consecutive non-empty cells (`foo`, `bar` becomes
//! `$.foo.bar`) and evaluated with a small dot-path query: plain member names,
//! `name[2]` indexing, `name[-1]` from the end, and `name[*]` fan-out. The
//! first match wins for output cells; zero matches (or a null match) means
//! the value is absent, which is not an error.

use crate::errors::EngineError;
use crate::grid::{self, cell_address};
use anyhow::{Result, bail};
use serde_json::Value;
use umya_spreadsheet::Worksheet;

/// Concatenate consecutive non-empty cells rightwards from
/// `(start_col, row)` into a `$`-rooted dotted path.
pub fn build_path(sheet: &Worksheet, row: u32, start_col: u32) -> Result<String, EngineError> {
    let mut path = String::new();
    let mut col = start_col;
    while let Some(value) = grid::cell_value(sheet, col, row) {
        path.push('.');
        path.push_str(&value);
        col += 1;
    }

    if path.is_empty() {
        return Err(EngineError::EmptyPath {
            coordinate: cell_address(start_col, row),
        });
    }
    tracing::debug!(path = %path, "path assembled");
    Ok(format!("${path}"))
}

/// All values matched by `path`, in document order.
pub fn query_values(root: &Value, path: &str) -> Result<Vec<Value>> {
    tracing::debug!(path, "evaluating path");
    let trimmed = path.strip_prefix('$').unwrap_or(path);
    let mut matches = vec![root];
    for segment in trimmed.split('.').filter(|s| !s.is_empty()) {
        let mut next = Vec::new();
        for value in matches {
            descend(value, segment, &mut next)?;
        }
        matches = next;
    }
    let values: Vec<Value> = matches.into_iter().cloned().collect();
    tracing::debug!(matched = values.len(), "path evaluation complete");
    Ok(values)
}

/// First match of `path`, treating zero matches and a null match as absent.
pub fn query_first(root: &Value, path: &str) -> Result<Option<Value>> {
    let mut values = query_values(root, path)?;
    if values.is_empty() {
        return Ok(None);
    }
    let first = values.swap_remove(0);
    Ok(match first {
        Value::Null => None,
        other => Some(other),
    })
}

fn descend<'a>(value: &'a Value, segment: &str, out: &mut Vec<&'a Value>) -> Result<()> {
    let (name, index) = match segment.find('[') {
        Some(bracket) => {
            if !segment.ends_with(']') {
                bail!("unsupported path segment: '{segment}'");
            }
            (
                &segment[..bracket],
                Some(&segment[bracket + 1..segment.len() - 1]),
            )
        }
        None => (segment, None),
    };

    let base = if name.is_empty() {
        Some(value)
    } else {
        value.get(name)
    };
    let Some(base) = base else {
        return Ok(());
    };

    match index {
        None => out.push(base),
        Some("*") => {
            if let Some(items) = base.as_array() {
                out.extend(items.iter());
            }
        }
        Some(raw) => {
            let Some(items) = base.as_array() else {
                return Ok(());
            };
            let picked = if let Some(back) = raw.strip_prefix('-') {
                let offset: usize = back
                    .parse()
                    .map_err(|_| anyhow::anyhow!("unsupported path segment: '{segment}'"))?;
                items.len().checked_sub(offset).and_then(|i| items.get(i))
            } else {
                let i: usize = raw
                    .parse()
                    .map_err(|_| anyhow::anyhow!("unsupported path segment: '{segment}'"))?;
                items.get(i)
            };
            if let Some(item) = picked {
                out.push(item);
            }
        }
    }
    Ok(())
}
