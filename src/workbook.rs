//! Workbook orchestration: control sheet, per-sheet runs, final save.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::path::Path;
use tracing::{error, info};
use umya_spreadsheet::{reader, writer, Spreadsheet};

use crate::api::dispatch::Dispatcher;
use crate::runner::{self, SheetReport};

pub const DEFAULT_CONTROL_SHEET: &str = "TargetResources";

/// Read the control sheet into an ordered sheet-name -> argument-set map.
///
/// Column A names the target worksheet; the remaining non-empty cells of the
/// row form one argument set. A sheet may appear on several rows, one set
/// per row. Rows naming a worksheet that does not exist are logged and
/// skipped rather than failing the run.
pub fn read_targets(
    book: &Spreadsheet,
    control_sheet: &str,
) -> Result<IndexMap<String, Vec<Vec<String>>>> {
    let control = book
        .get_sheet_by_name(control_sheet)
        .with_context(|| format!("control sheet not found: {control_sheet}"))?;

    let mut targets: IndexMap<String, Vec<Vec<String>>> = IndexMap::new();
    let (max_col, max_row) = control.get_highest_column_and_row();
    for row in 1..=max_row {
        let Some(sheet_name) = crate::grid::cell_value(control, 1, row) else {
            continue;
        };
        if book.get_sheet_by_name(&sheet_name).is_none() {
            error!(sheet = %sheet_name, "no such worksheet");
            continue;
        }
        let args = (2..=max_col)
            .filter_map(|col| crate::grid::cell_value(control, col, row))
            .collect();
        targets.entry(sheet_name).or_default().push(args);
    }
    Ok(targets)
}

/// Run every targeted worksheet and save the result.
///
/// The output file is only written after all sheets succeed; any directive
/// failure aborts the run with the sheet name attached.
pub fn process_workbook(
    src: &Path,
    dst: &Path,
    control_sheet: &str,
    dispatcher: &mut Dispatcher,
) -> Result<IndexMap<String, SheetReport>> {
    let mut book = reader::xlsx::read(src)
        .with_context(|| format!("failed to read workbook: {}", src.display()))?;

    let targets = read_targets(&book, control_sheet)?;
    let mut reports = IndexMap::new();
    for (sheet_name, arg_sets) in &targets {
        let sheet = book
            .get_sheet_by_name_mut(sheet_name)
            .with_context(|| format!("worksheet disappeared: {sheet_name}"))?;
        let report = runner::process_worksheet(sheet, arg_sets, dispatcher)
            .with_context(|| format!("failed on worksheet: {sheet_name}"))?;
        info!(
            sheet = %sheet_name,
            replicas = report.replicas,
            calls = report.calls,
            outputs = report.outputs,
            "worksheet processed"
        );
        reports.insert(sheet_name.clone(), report);
    }

    writer::xlsx::write(&book, dst)
        .with_context(|| format!("failed to write workbook: {}", dst.display()))?;
    Ok(reports)
}
