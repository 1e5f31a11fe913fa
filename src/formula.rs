//! Relative-reference translation for replicated formulas.
//!
//! When a template cell holding a formula is copied into a replica block, its
//! relative references must move by the same column offset as the cell itself
//! (rows never move: replication is horizontal). Absolute references and
//! table/named/external references stay put.

use anyhow::{Result, anyhow, bail};
use formualizer_parse::parser::ReferenceType;
use formualizer_parse::pretty::canonical_formula;
use formualizer_parse::{ASTNode, ASTNodeType};

/// Rewrite `formula` (no leading `=`) shifted by `delta_col` columns.
/// Returns the rewritten formula without a leading `=`.
pub fn translate(formula: &str, delta_col: i32) -> Result<String> {
    let trimmed = formula.trim();
    let with_equals = if trimmed.starts_with('=') {
        trimmed.to_string()
    } else {
        format!("={trimmed}")
    };
    let mut ast = formualizer_parse::parse(&with_equals)
        .map_err(|e| anyhow!("failed to parse formula: {}", e.message))?;
    shift_refs_in_place(&mut ast, delta_col)?;
    let rendered = canonical_formula(&ast);
    Ok(rendered.strip_prefix('=').unwrap_or(&rendered).to_string())
}

fn shift_refs_in_place(node: &mut ASTNode, delta_col: i32) -> Result<()> {
    match &mut node.node_type {
        ASTNodeType::Reference {
            original,
            reference,
        } => {
            shift_reference(original, reference, delta_col)?;
        }
        ASTNodeType::UnaryOp { expr, .. } => {
            shift_refs_in_place(expr, delta_col)?;
        }
        ASTNodeType::BinaryOp { left, right, .. } => {
            shift_refs_in_place(left, delta_col)?;
            shift_refs_in_place(right, delta_col)?;
        }
        ASTNodeType::Function { args, .. } => {
            for arg in args.iter_mut() {
                shift_refs_in_place(arg, delta_col)?;
            }
        }
        ASTNodeType::Array(rows) => {
            for row in rows.iter_mut() {
                for cell in row.iter_mut() {
                    shift_refs_in_place(cell, delta_col)?;
                }
            }
        }
        ASTNodeType::Literal(_) => {}
    }
    Ok(())
}

fn shift_reference(
    original: &mut String,
    reference: &mut ReferenceType,
    delta_col: i32,
) -> Result<()> {
    match reference {
        ReferenceType::Cell { col, col_abs, .. } => {
            *col = shift_col(*col, *col_abs, delta_col)?;
        }
        ReferenceType::Range {
            start_col,
            end_col,
            start_col_abs,
            end_col_abs,
            ..
        } => {
            if let Some(col) = start_col {
                *col = shift_col(*col, *start_col_abs, delta_col)?;
            }
            if let Some(col) = end_col {
                *col = shift_col(*col, *end_col_abs, delta_col)?;
            }
        }
        ReferenceType::Table(_) | ReferenceType::NamedRange(_) | ReferenceType::External(_) => {}
    }
    *original = reference.to_string();
    Ok(())
}

fn shift_col(value: u32, abs: bool, delta: i32) -> Result<u32> {
    if abs || delta == 0 {
        return Ok(value);
    }
    let shifted = value as i64 + delta as i64;
    if shifted < 1 {
        bail!("shift would move reference before column A");
    }
    Ok(shifted as u32)
}
