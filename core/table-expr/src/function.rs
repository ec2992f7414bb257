//! FILENAME: core/table-expr/src/function.rs
//! PURPOSE: The TABLE function: TABLE(name, dataset, [col], [col], ...).
//! CONTEXT: Evaluates the dataset, compiles the columns, evaluates one row
//! per non-null dataset element and opens a dialog owning the resulting
//! report. The call returns the dataset so it can be used further.

use crate::column::compile_columns;
use crate::config::TableExprConfig;
use crate::dialogs::{DialogId, SharedDialogs};
use crate::error::{TableExprError, TableExprResult};
use crate::logging::{log_enter, log_error, log_exit, log_info};
use crate::record::evaluate_records;
use crate::report::{assemble_report, Report};
use expr::{EvalResult, Evaluator, ExprError, ExprFunction, ExprValue, Expression};

/// Builds a report from TABLE arguments without opening a dialog.
///
/// Evaluation order: dataset, column names and formats, rows, then the
/// report name. Returns the dataset result alongside the report.
pub fn generate_report(
    evaluator: &mut Evaluator,
    args: &[Expression],
    config: &TableExprConfig,
) -> TableExprResult<(ExprValue, Report)> {
    if args.len() < 3 {
        return Err(TableExprError::InvalidArgument(format!(
            "{} expects a name, a dataset and at least one column ({} arguments given)",
            config.function_name,
            args.len()
        )));
    }

    let dataset = evaluator.evaluate(&args[1])?;
    let elements = match &dataset {
        ExprValue::Set(elements) => elements.as_slice(),
        _ => {
            return Err(TableExprError::InvalidArgument(
                "Second argument must be a dataset".to_string(),
            ))
        }
    };

    let columns = compile_columns(evaluator, &args[2..], config)?;
    let rows = evaluate_records(evaluator, elements, &columns)?;

    let name = evaluator
        .evaluate(&args[0])?
        .as_label()
        .unwrap_or_else(|| config.default_report_name.clone());

    let report = assemble_report(name, &columns, rows);
    Ok((dataset, report))
}

/// TABLE as a registered expression function.
#[derive(Debug, Clone)]
pub struct TableFunction {
    dialogs: SharedDialogs,
    config: TableExprConfig,
}

impl TableFunction {
    pub fn new(dialogs: SharedDialogs, config: TableExprConfig) -> Self {
        TableFunction { dialogs, config }
    }

    /// Generates the report and hands it to a new dialog.
    pub fn open_report(
        &self,
        evaluator: &mut Evaluator,
        args: &[Expression],
    ) -> EvalResult<(ExprValue, DialogId)> {
        let (dataset, report) = generate_report(evaluator, args, &self.config).map_err(|e| {
            log_error!("TABLE", "{} failed: {}", self.config.function_name, e);
            ExprError::from(e)
        })?;

        let mut dialogs = self
            .dialogs
            .lock()
            .map_err(|_| ExprError::Host("report dialog registry is poisoned".to_string()))?;
        let id = dialogs.open(report, self.config.dialog.clone());
        Ok((dataset, id))
    }
}

impl ExprFunction for TableFunction {
    fn call(&self, evaluator: &mut Evaluator, args: &[Expression]) -> EvalResult<ExprValue> {
        log_enter!("TABLE", &self.config.function_name, "args={}", args.len());
        let (dataset, id) = self.open_report(evaluator, args)?;
        log_exit!("TABLE", &self.config.function_name, "dialog={}", id);
        Ok(dataset)
    }
}

/// Registers TABLE on an evaluator under the configured name.
pub fn register_table_function(
    evaluator: &mut Evaluator,
    dialogs: SharedDialogs,
    config: TableExprConfig,
) {
    log_info!("TABLE", "registering {}", config.function_name);
    let name = config.function_name.clone();
    evaluator.register_function(&name, TableFunction::new(dialogs, config));
}
