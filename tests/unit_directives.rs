mod support;

use serde_json::json;
use sheetcall::api::dispatch::Dispatcher;
use sheetcall::directive::{scan, Directive};
use sheetcall::runner::process_worksheet;
use sheetcall::template::find_form;
use support::builders::{basic_form, put, val};
use support::mock_api::MockFactory;

fn ec2_response() -> serde_json::Value {
    json!({
        "Reservations": [{
            "Instances": [{
                "InstanceId": "i-0abc",
                "State": "running",
                "Tags": [{"Key": "Name", "Value": "web-1"}]
            }]
        }]
    })
}

#[test]
fn scan_produces_typed_directives_in_row_order() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    basic_form(sheet, r#"{"InstanceIds": ["%1"]}"#);
    sheetcall::template::replicate_form(sheet, 1).unwrap();

    let bounds = find_form(sheet).unwrap();
    let directives = scan(sheet, &bounds, 1).unwrap();
    assert_eq!(directives.len(), 2);

    match &directives[0] {
        Directive::Call {
            service,
            region,
            action,
            body_template,
            row,
        } => {
            assert_eq!(service, "ec2");
            assert_eq!(region, "us-east-1");
            assert_eq!(action, "DescribeInstances");
            assert_eq!(body_template, r#"{"InstanceIds": ["%1"]}"#);
            assert_eq!(*row, 2);
        }
        other => panic!("expected call, got {other:?}"),
    }
    match &directives[1] {
        Directive::Output {
            path_template,
            params_start,
            dest,
            ..
        } => {
            assert_eq!(path_template, "$.Reservations[0].Instances[0].State");
            assert!(params_start.is_none());
            // replica 1 occupies I..N; its #### sits at M3, dest at N3
            assert_eq!(*dest, (14, 3));
        }
        other => panic!("expected output, got {other:?}"),
    }
}

#[test]
fn scan_resolves_destination_per_replica() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    basic_form(sheet, "{}");
    sheetcall::template::replicate_form(sheet, 2).unwrap();

    let bounds = find_form(sheet).unwrap();
    let first = scan(sheet, &bounds, 1).unwrap();
    let second = scan(sheet, &bounds, 2).unwrap();
    let dest = |directives: &[Directive]| match &directives[1] {
        Directive::Output { dest, .. } => *dest,
        other => panic!("expected output, got {other:?}"),
    };
    assert_eq!(dest(&first), (14, 3));
    assert_eq!(dest(&second), (20, 3));
}

#[test]
fn call_and_output_round_trip_through_the_client() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    basic_form(sheet, r#"{"InstanceIds": ["%1"]}"#);

    let factory = MockFactory::new().respond("describe_instances", ec2_response());
    let mut dispatcher = Dispatcher::new(Box::new(factory.clone()));
    let report =
        process_worksheet(sheet, &[vec!["i-0abc".to_string()]], &mut dispatcher).unwrap();

    assert_eq!(report.replicas, 1);
    assert_eq!(report.calls, 1);
    assert_eq!(report.outputs, 1);

    let calls = factory.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "describe_instances");
    assert_eq!(calls[0].region, "us-east-1");
    assert_eq!(calls[0].body, json!({"InstanceIds": ["i-0abc"]}));

    assert_eq!(val(sheet, "N3"), "running");
}

#[test]
fn each_replica_substitutes_its_own_arguments() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    basic_form(sheet, r#"{"InstanceIds": ["%1"]}"#);

    let factory = MockFactory::new().respond("describe_instances", ec2_response());
    let mut dispatcher = Dispatcher::new(Box::new(factory.clone()));
    let arg_sets = vec![vec!["i-one".to_string()], vec!["i-two".to_string()]];
    process_worksheet(sheet, &arg_sets, &mut dispatcher).unwrap();

    let bodies: Vec<_> = factory.calls().into_iter().map(|c| c.body).collect();
    assert_eq!(
        bodies,
        vec![
            json!({"InstanceIds": ["i-one"]}),
            json!({"InstanceIds": ["i-two"]}),
        ]
    );

    // one destination per replica block
    assert_eq!(val(sheet, "N3"), "running");
    assert_eq!(val(sheet, "T3"), "running");
    // one client for the shared (service, region) pair
    assert_eq!(factory.clients_built(), 1);
}

#[test]
fn present_and_missing_outputs_use_text_and_general_formats() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    put(sheet, "A1", "%top");
    put(sheet, "C1", "%left");
    put(sheet, "H1", "%right");
    put(sheet, "A2", "#call");
    put(sheet, "B2", "##");
    put(sheet, "C2", "svc");
    put(sheet, "D2", "eu-west-1");
    put(sheet, "E2", "GetItem");
    put(sheet, "F2", "{}");
    put(sheet, "A3", "#output");
    put(sheet, "B3", "##");
    put(sheet, "C3", "Name");
    put(sheet, "E3", "####");
    put(sheet, "A4", "#output");
    put(sheet, "B4", "##");
    put(sheet, "C4", "Missing");
    put(sheet, "E4", "####");
    put(sheet, "A5", "%bottom");

    let factory = MockFactory::new().respond("get_item", json!({"Name": "demo", "Count": 3}));
    let mut dispatcher = Dispatcher::new(Box::new(factory));
    process_worksheet(sheet, &[vec![]], &mut dispatcher).unwrap();

    // #### sits at E (template col 5); replica 1 carries it at K, dest L
    let present = sheet.get_cell("L3").unwrap();
    assert_eq!(present.get_value(), "demo");
    let code = present
        .get_style()
        .get_number_format()
        .map(|fmt| fmt.get_format_code().to_string());
    assert_eq!(code.as_deref(), Some("@"));

    let missing = sheet.get_cell("L4").unwrap();
    assert!(missing.is_formula());
    assert_eq!(missing.get_formula(), "NA()");
    let code = missing
        .get_style()
        .get_number_format()
        .map(|fmt| fmt.get_format_code().to_string());
    assert_eq!(code.as_deref(), Some("General"));
}

#[test]
fn missing_value_writes_na_formula() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    basic_form(sheet, "{}");

    let factory = MockFactory::new().respond("describe_instances", json!({"Reservations": []}));
    let mut dispatcher = Dispatcher::new(Box::new(factory));
    process_worksheet(sheet, &[vec![]], &mut dispatcher).unwrap();

    let cell = sheet.get_cell("N3").unwrap();
    assert!(cell.is_formula());
    assert_eq!(cell.get_formula(), "NA()");
}

#[test]
fn path_placeholders_resolve_from_the_param_run() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    basic_form(sheet, "{}");
    // extra output row whose path is parameterised by the ### run
    put(sheet, "A4", "#output");
    put(sheet, "B4", "##");
    put(
        sheet,
        "C4",
        "Reservations[0].Instances[0].Tags[%1].Value",
    );
    put(sheet, "E4", "###");
    put(sheet, "F4", "0");
    put(sheet, "G4", "####");
    put(sheet, "A5", "%bottom");

    let factory = MockFactory::new().respond("describe_instances", ec2_response());
    let mut dispatcher = Dispatcher::new(Box::new(factory));
    process_worksheet(sheet, &[vec![]], &mut dispatcher).unwrap();

    assert_eq!(val(sheet, "N4"), "web-1");
}

#[test]
fn output_before_any_call_is_absent() {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    // form with only an output row
    put(sheet, "A1", "%top");
    put(sheet, "C1", "%left");
    put(sheet, "F1", "%right");
    put(sheet, "A2", "#output");
    put(sheet, "B2", "##");
    put(sheet, "C2", "Anything");
    put(sheet, "E2", "####");
    put(sheet, "A3", "%bottom");

    let factory = MockFactory::new();
    let mut dispatcher = Dispatcher::new(Box::new(factory.clone()));
    process_worksheet(sheet, &[vec![]], &mut dispatcher).unwrap();

    assert!(factory.calls().is_empty());
    // template width 4, replica at G..J; #### copied to I2, dest J2
    assert!(sheet.get_cell("J2").unwrap().is_formula());
}
