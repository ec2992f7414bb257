//! FILENAME: core/table-expr/tests/test_table_function.rs
//! PURPOSE: Tests for TABLE as an expression function.

mod common;

use common::{col, col_fmt, short_ratio, stock_dataset, table_call, TestHarness};
use expr::{BinaryOperator, Evaluator, ExprError, ExprValue, Expression};
use table_expr::{
    register_table_function, ColumnFormat, ReportDialogs, ResolvedCell, TableExprConfig,
};

// ============================================================================
// SUCCESSFUL CALLS
// ============================================================================

#[test]
fn test_table_returns_dataset() {
    let mut harness = TestHarness::with_stock_data();
    let call = table_call(
        "Stocks",
        Expression::var("$stocks"),
        vec![col("Title", Expression::arg(1))],
    );

    let result = harness.eval(&call).unwrap();
    assert_eq!(result, stock_dataset());
}

#[test]
fn test_table_opens_one_dialog() {
    let mut harness = TestHarness::with_stock_data();
    let call = table_call(
        "Short interest",
        Expression::var("$stocks"),
        vec![
            col("Title", Expression::arg(1)),
            col_fmt("Price", Expression::arg(2), "currency"),
            col_fmt("Short", short_ratio(), "percentage"),
        ],
    );

    harness.eval(&call).unwrap();
    assert_eq!(harness.dialog_count(), 1);

    let id = harness.last_dialog().unwrap();
    let dialogs = harness.dialogs.lock().unwrap();
    let dialog = dialogs.get(id).unwrap();
    assert_eq!(dialog.title, "Short interest");
    assert_eq!(dialog.options.width, 800);
    assert_eq!(dialog.options.height, 600);
    assert!(dialog.options.resizable);

    let report = dialog.report();
    assert_eq!(report.row_count(), 3);
    assert_eq!(report.column_count(), 3);
    assert_eq!(report.columns()[2].format, ColumnFormat::Percentage);
    assert_eq!(report.rows()[1].cells[0], ResolvedCell::Text("AAPL.US".to_string()));
    assert_eq!(report.rows()[1].cells[1], ResolvedCell::Number(180.25));
    assert!(report.display_state().is_none());
}

#[test]
fn test_each_call_opens_a_new_dialog() {
    let mut harness = TestHarness::with_stock_data();
    let call = table_call("Stocks", Expression::var("$stocks"), vec![col("Title", Expression::arg(1))]);

    harness.eval(&call).unwrap();
    harness.eval(&call).unwrap();

    let ids = harness.dialogs.lock().unwrap().ids();
    assert_eq!(ids.len(), 2);
    assert!(ids[0] < ids[1]);
}

#[test]
fn test_table_inside_larger_expression() {
    let mut harness = TestHarness::new();
    let dataset = Expression::set(vec![Expression::number(1.0), Expression::number(2.0)]);
    let call = Expression::call(
        "SUM",
        vec![table_call("Inner", dataset, vec![col("V", Expression::arg(1))])],
    );

    assert_eq!(harness.eval(&call), Ok(ExprValue::Number(3.0)));
    assert_eq!(harness.dialog_count(), 1);
}

#[test]
fn test_column_bindings_do_not_outlive_call() {
    let mut harness = TestHarness::with_stock_data();
    let call = table_call("Stocks", Expression::var("$stocks"), vec![col("Title", Expression::arg(1))]);

    harness.eval(&call).unwrap();
    assert_eq!(harness.eval(&Expression::arg(1)), Ok(ExprValue::Null));
    assert_eq!(harness.evaluator.environment().depth(), 0);
}

#[test]
fn test_configured_function_name() {
    let config = TableExprConfig {
        function_name: "REPORT".to_string(),
        ..TableExprConfig::default()
    };
    let mut harness = TestHarness::with_config(config);
    assert!(harness.evaluator.functions().contains("report"));
    assert!(!harness.evaluator.functions().contains("TABLE"));
    let dataset = Expression::set(vec![Expression::number(1.0)]);
    let columns = vec![col("V", Expression::arg(1))];

    let mut args = vec![Expression::string("R"), dataset];
    args.extend(columns);
    assert!(harness.eval(&Expression::call("report", args.clone())).is_ok());
    assert_eq!(
        harness.eval(&Expression::call("TABLE", args)),
        Err(ExprError::UnknownFunction("TABLE".to_string()))
    );
    assert_eq!(harness.dialog_count(), 1);
}

// ============================================================================
// FAILED CALLS
// ============================================================================

#[test]
fn test_missing_columns_opens_nothing() {
    let mut harness = TestHarness::with_stock_data();
    let call = Expression::call(
        "TABLE",
        vec![Expression::string("Stocks"), Expression::var("$stocks")],
    );

    assert!(matches!(harness.eval(&call), Err(ExprError::InvalidArgument(_))));
    assert_eq!(harness.dialog_count(), 0);
}

#[test]
fn test_dataset_must_be_a_set() {
    let mut harness = TestHarness::new();
    let call = table_call("Scalar", Expression::number(4.0), vec![col("V", Expression::arg(1))]);

    assert_eq!(
        harness.eval(&call),
        Err(ExprError::InvalidArgument("Second argument must be a dataset".to_string()))
    );
    assert_eq!(harness.dialog_count(), 0);
}

#[test]
fn test_malformed_column_opens_nothing() {
    let mut harness = TestHarness::with_stock_data();
    let call = table_call(
        "Stocks",
        Expression::var("$stocks"),
        vec![
            col("Title", Expression::arg(1)),
            Expression::set(vec![Expression::string("Name")]),
        ],
    );

    assert!(matches!(harness.eval(&call), Err(ExprError::InvalidArgument(_))));
    assert_eq!(harness.dialog_count(), 0);
}

#[test]
fn test_row_failure_propagates() {
    let mut harness = TestHarness::new();
    let dataset = Expression::set(vec![Expression::number(2.0), Expression::number(0.0)]);
    let call = table_call(
        "Inverse",
        dataset,
        vec![col(
            "1/x",
            Expression::binary(Expression::number(1.0), BinaryOperator::Divide, Expression::arg(1)),
        )],
    );

    assert_eq!(harness.eval(&call), Err(ExprError::DivisionByZero));
    assert_eq!(harness.dialog_count(), 0);
    assert_eq!(harness.evaluator.environment().depth(), 0);
}

// ============================================================================
// SHARED REGISTRY
// ============================================================================

#[test]
fn test_evaluators_on_several_threads_share_dialogs() {
    let dialogs = ReportDialogs::shared();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let dialogs = dialogs.clone();
            std::thread::spawn(move || {
                let mut evaluator = Evaluator::new();
                register_table_function(&mut evaluator, dialogs, TableExprConfig::default());
                let call = table_call(
                    &format!("Thread {}", i),
                    Expression::set(vec![Expression::number(i as f64)]),
                    vec![col("V", Expression::arg(1))],
                );
                evaluator.evaluate(&call)
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_ok());
    }
    assert_eq!(dialogs.lock().unwrap().len(), 4);
}
