use std::sync::Once;

use rentmate::cli::output::{set_preferences, OutputPreferences};
use rentmate::cli::table::{Column, Table};

fn plain_output() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        set_preferences(OutputPreferences {
            color_enabled: false,
            dark_mode: false,
        });
    });
}

#[test]
fn dashboard_table_aligns_columns() {
    plain_output();
    let mut table = Table::new(vec![
        Column::right("#"),
        Column::left("Property").max(12),
        Column::right("Amount"),
        Column::left("Status"),
    ]);
    table.push(vec![
        "1".into(),
        "Monthly Rent".into(),
        "$950".into(),
        "Overdue by 2 days".into(),
    ]);
    table.push(vec![
        "2".into(),
        "Sunset Apartments".into(),
        "$1,200".into(),
        "Due in 30 days".into(),
    ]);
    insta::assert_snapshot!(table.render(), @r###"
    #  Property      Amount  Status
    ------------------------------------------
    1  Monthly Rent    $950  Overdue by 2 days
    2  Sunset Apar…  $1,200  Due in 30 days
    "###);
}

#[test]
fn empty_table_renders_header_and_rule() {
    plain_output();
    let table = Table::new(vec![Column::left("Date"), Column::right("Amount")]);
    let rendered = table.render();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines, vec!["Date  Amount", "------------"]);
}
