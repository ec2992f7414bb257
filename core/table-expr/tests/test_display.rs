//! FILENAME: core/table-expr/tests/test_display.rs
//! PURPOSE: Tests for rendering, sorting and filtering opened reports.

mod common;

use common::{col, col_fmt, short_ratio, table_call, TestHarness};
use expr::Expression;
use table_expr::{DialogId, SortDirection};

fn open(harness: &mut TestHarness, columns: Vec<Expression>) -> DialogId {
    let call = table_call("Stocks", Expression::var("$stocks"), columns);
    harness.eval(&call).unwrap();
    harness.last_dialog().unwrap()
}

fn title_and_price() -> Vec<Expression> {
    vec![
        col("Title", Expression::arg(1)),
        col_fmt("Price", Expression::arg(2), "CURRENCY"),
    ]
}

#[test]
fn test_render_text() {
    let mut harness = TestHarness::with_stock_data();
    let id = open(&mut harness, title_and_price());

    let expected = "Stocks\n\
                    Title   | Price\n\
                    U.US    | 61.50 $\n\
                    AAPL.US | 180.25 $\n\
                    GFI.US  | 12.00 $\n";
    assert_eq!(harness.render_text(id), expected);
}

#[test]
fn test_percentage_column() {
    let mut harness = TestHarness::with_stock_data();
    let id = open(
        &mut harness,
        vec![
            col("Title", Expression::arg(1)),
            col_fmt("Short", short_ratio(), "percentage"),
        ],
    );

    let text = harness.render_text(id);
    assert!(text.contains("U.US    | 15.0 %"));
    assert!(text.contains("AAPL.US | 0.80 %"));
}

#[test]
fn test_sort_changes_view_not_rows() {
    let mut harness = TestHarness::with_stock_data();
    let id = open(&mut harness, title_and_price());
    harness.render_text(id);

    {
        let mut dialogs = harness.dialogs.lock().unwrap();
        let report = dialogs.get_mut(id).unwrap().report_mut();
        assert!(report.sort_by(1, SortDirection::Descending));
        assert!(!report.sort_by(7, SortDirection::Ascending));
    }

    let text = harness.render_text(id);
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[2].starts_with("AAPL.US"));
    assert!(lines[3].starts_with("U.US"));
    assert!(lines[4].starts_with("GFI.US"));

    let dialogs = harness.dialogs.lock().unwrap();
    let report = dialogs.get(id).unwrap().report();
    assert_eq!(
        report.rows()[0].cells[0],
        table_expr::ResolvedCell::Text("U.US".to_string())
    );
}

#[test]
fn test_search_filter() {
    let mut harness = TestHarness::with_stock_data();
    let id = open(&mut harness, title_and_price());
    harness.render_text(id);

    {
        let mut dialogs = harness.dialogs.lock().unwrap();
        let report = dialogs.get_mut(id).unwrap().report_mut();
        report.set_search_filter(Some("gfi"));
        assert_eq!(report.visible_rows().len(), 1);
    }

    let text = harness.render_text(id);
    assert_eq!(text.lines().count(), 3);
    assert!(text.contains("GFI.US | 12.00 $"));
}
