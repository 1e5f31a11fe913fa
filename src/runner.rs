//! Directive execution against a worksheet.
//!
//! A worksheet is processed as: replicate the form once for the whole
//! argument-set list, then interpret each replica's directives in order.
//! The response register is shared across replicas, so a form that issues
//! its `#call` only in the first replica still feeds later `#output` rows.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use umya_spreadsheet::{NumberingFormat, Worksheet};

use crate::api::dispatch::{Dispatcher, RequestDescriptor};
use crate::directive::{self, Directive};
use crate::path;
use crate::placeholder;
use crate::template;

/// Per-sheet execution counts, reported back through the CLI payload.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SheetReport {
    pub replicas: usize,
    pub calls: usize,
    pub outputs: usize,
}

/// Replicate the sheet's form for `arg_sets` and run every directive.
///
/// The worksheet is only mutated through replication and `#output`
/// destinations; a failing directive leaves earlier writes in place but
/// the caller is expected not to save the workbook after an error.
pub fn process_worksheet(
    sheet: &mut Worksheet,
    arg_sets: &[Vec<String>],
    dispatcher: &mut Dispatcher,
) -> Result<SheetReport> {
    let bounds = template::replicate_form(sheet, arg_sets.len())?;
    let mut report = SheetReport {
        replicas: arg_sets.len(),
        ..SheetReport::default()
    };

    // One register for the whole sheet, not one per replica.
    let mut register: Option<Value> = None;

    for (index, args) in arg_sets.iter().enumerate() {
        let directives = directive::scan(sheet, &bounds, index + 1)?;
        debug!(
            replica = index + 1,
            directives = directives.len(),
            "interpreting replica"
        );
        for dir in directives {
            match dir {
                Directive::Call {
                    service,
                    region,
                    action,
                    body_template,
                    ..
                } => {
                    let body = placeholder::resolve_from_args(&body_template, args);
                    let request = RequestDescriptor {
                        service,
                        region,
                        action,
                        body,
                    };
                    register = Some(dispatcher.invoke(&request)?);
                    report.calls += 1;
                }
                Directive::Output {
                    path_template,
                    params_start,
                    dest,
                    ..
                } => {
                    let query = match params_start {
                        Some((col, row)) => {
                            placeholder::resolve_from_cells(&path_template, sheet, row, col)?
                        }
                        None => path_template,
                    };
                    let found = match &register {
                        Some(response) => path::query_first(response, &query)?,
                        None => None,
                    };
                    write_value(sheet, dest, found);
                    report.outputs += 1;
                }
            }
        }
    }

    Ok(report)
}

/// Write a query result into its destination cell.
///
/// A present value lands as text so identifiers like `000123` survive; an
/// absent one becomes an `NA()` formula with the general format restored.
pub fn write_value(sheet: &mut Worksheet, dest: (u32, u32), value: Option<Value>) {
    match value {
        Some(found) => {
            sheet
                .get_style_mut(dest)
                .get_number_format_mut()
                .set_format_code(NumberingFormat::FORMAT_TEXT);
            let cell = sheet.get_cell_mut(dest);
            cell.get_cell_value_mut().remove_formula();
            // set_value would auto-type "000123" as the number 123
            cell.set_value_string(render_value(&found));
        }
        None => {
            sheet
                .get_style_mut(dest)
                .get_number_format_mut()
                .set_format_code(NumberingFormat::FORMAT_GENERAL);
            let cell = sheet.get_cell_mut(dest);
            cell.set_formula("NA()");
            cell.get_cell_value_mut()
                .set_formula_result_default("#N/A");
        }
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
