//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for TABLE integration tests.

#![allow(dead_code)]

use expr::{BinaryOperator, EvalResult, Evaluator, ExprValue, Expression};
use table_expr::{
    register_table_function, DialogId, ReportDialogs, SharedDialogs, TableExprConfig,
    TextSurface,
};

/// Test harness: one evaluator with TABLE registered and the dialog
/// registry it opens reports into.
pub struct TestHarness {
    pub evaluator: Evaluator,
    pub dialogs: SharedDialogs,
}

impl TestHarness {
    /// Create a harness with the default configuration.
    pub fn new() -> Self {
        Self::with_config(TableExprConfig::default())
    }

    pub fn with_config(config: TableExprConfig) -> Self {
        let mut evaluator = Evaluator::new();
        let dialogs = ReportDialogs::shared();
        register_table_function(&mut evaluator, dialogs.clone(), config);
        TestHarness { evaluator, dialogs }
    }

    /// Create a harness with a stock dataset bound as the global `$stocks`.
    /// Each element is [symbol, price, shares outstanding, short interest].
    pub fn with_stock_data() -> Self {
        let mut harness = Self::new();
        harness.evaluator.set_global("$stocks", stock_dataset());
        harness
    }

    pub fn eval(&mut self, expr: &Expression) -> EvalResult<ExprValue> {
        self.evaluator.evaluate(expr)
    }

    pub fn dialog_count(&self) -> usize {
        self.dialogs.lock().unwrap().len()
    }

    pub fn last_dialog(&self) -> Option<DialogId> {
        self.dialogs.lock().unwrap().ids().last().copied()
    }

    /// Render a dialog to text and return the output.
    pub fn render_text(&self, id: DialogId) -> String {
        let mut surface = TextSurface::new();
        self.dialogs
            .lock()
            .unwrap()
            .render(id, &mut surface)
            .expect("dialog is open");
        surface.output().to_string()
    }
}

pub fn stock_dataset() -> ExprValue {
    let stock = |symbol: &str, price: f64, shares: f64, short: f64| {
        ExprValue::Set(vec![
            ExprValue::symbol(symbol),
            ExprValue::Number(price),
            ExprValue::Number(shares),
            ExprValue::Number(short),
        ])
    };
    ExprValue::Set(vec![
        stock("U.US", 61.5, 300_000.0, 45_000.0),
        stock("AAPL.US", 180.25, 15_000_000.0, 120_000.0),
        ExprValue::Null,
        stock("GFI.US", 12.0, 900_000.0, 9_000.0),
    ])
}

/// Column argument `[name, value]`.
pub fn col(name: &str, value: Expression) -> Expression {
    Expression::set(vec![Expression::string(name), value])
}

/// Column argument `[name, value, format]`.
pub fn col_fmt(name: &str, value: Expression, format: &str) -> Expression {
    Expression::set(vec![Expression::string(name), value, Expression::string(format)])
}

/// TABLE(name, dataset, columns...)
pub fn table_call(name: &str, dataset: Expression, columns: Vec<Expression>) -> Expression {
    let mut args = vec![Expression::string(name), dataset];
    args.extend(columns);
    Expression::call("TABLE", args)
}

/// $short / $shares * 100
pub fn short_ratio() -> Expression {
    Expression::binary(
        Expression::binary(Expression::arg(4), BinaryOperator::Divide, Expression::arg(3)),
        BinaryOperator::Multiply,
        Expression::number(100.0),
    )
}
