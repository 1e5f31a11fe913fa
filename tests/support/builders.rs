#![allow(dead_code)]
use std::path::Path;
use umya_spreadsheet::{Spreadsheet, Worksheet};

pub fn put(sheet: &mut Worksheet, address: &str, value: &str) {
    sheet.get_cell_mut(address).set_value(value);
}

pub fn put_formula(sheet: &mut Worksheet, address: &str, formula: &str) {
    sheet.get_cell_mut(address).set_formula(formula);
}

pub fn val(sheet: &Worksheet, address: &str) -> String {
    sheet
        .get_cell(address)
        .map(|c| c.get_value().to_string())
        .unwrap_or_default()
}

/// A canonical single-call form on columns C..H:
///
/// ```text
/// row 1: %top        .  %left  .           .                 .     . %right
/// row 2: #call       ## ec2    us-east-1   DescribeInstances body  .
/// row 3: #output     ## Reservations[0] Instances[0] State   .  ####  .
/// row 4: %bottom
/// ```
///
/// The `####` destination sits inside the template so every replica carries
/// its own output cell.
pub fn basic_form(sheet: &mut Worksheet, body: &str) {
    put(sheet, "A1", "%top");
    put(sheet, "C1", "%left");
    put(sheet, "H1", "%right");

    put(sheet, "A2", "#call");
    put(sheet, "B2", "##");
    put(sheet, "C2", "ec2");
    put(sheet, "D2", "us-east-1");
    put(sheet, "E2", "DescribeInstances");
    put(sheet, "F2", body);

    put(sheet, "A3", "#output");
    put(sheet, "B3", "##");
    put(sheet, "C3", "Reservations[0]");
    put(sheet, "D3", "Instances[0]");
    put(sheet, "E3", "State");
    put(sheet, "G3", "####");

    put(sheet, "A4", "%bottom");
}

/// Workbook with a control sheet and one form sheet named `Ec2`. Each entry
/// of `arg_rows` becomes one control row and therefore one replica.
pub fn form_workbook(body: &str, arg_rows: &[&[&str]]) -> Spreadsheet {
    let mut book = umya_spreadsheet::new_file();
    book.get_sheet_mut(&0).unwrap().set_name("TargetResources");
    book.new_sheet("Ec2").unwrap();
    basic_form(book.get_sheet_by_name_mut("Ec2").unwrap(), body);

    let control = book.get_sheet_by_name_mut("TargetResources").unwrap();
    for (i, args) in arg_rows.iter().enumerate() {
        let row = (i + 1) as u32;
        control.get_cell_mut((1, row)).set_value("Ec2");
        for (j, arg) in args.iter().enumerate() {
            control.get_cell_mut((2 + j as u32, row)).set_value(*arg);
        }
    }
    book
}

pub fn write_book(book: &Spreadsheet, path: &Path) {
    umya_spreadsheet::writer::xlsx::write(book, path).expect("write workbook");
}
