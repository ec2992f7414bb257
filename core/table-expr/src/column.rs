//! FILENAME: core/table-expr/src/column.rs
//! PURPOSE: Compiles TABLE column arguments into column descriptors.
//! CONTEXT: Each column argument is a set expression `[name, value]` or
//! `[name, value, format]`. Name and format are evaluated once, here; the
//! value expression is kept unevaluated and evaluated once per row later.

use crate::config::TableExprConfig;
use crate::error::{TableExprError, TableExprResult};
use crate::format::ColumnFormat;
use crate::logging::log_debug;
use expr::{Evaluator, Expression};
use serde::{Deserialize, Serialize};

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// A compiled column. Borrows its value expression from the call arguments,
/// so it lives no longer than the TABLE call that built it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor<'e> {
    /// Display name shown in the column header.
    pub name: String,

    /// Source text of the value expression, for headers and diagnostics.
    pub source_expression_text: String,

    /// The unevaluated value expression.
    pub expression: &'e Expression,

    /// Index of this column's cell within every row.
    pub output_slot: usize,

    pub format: ColumnFormat,
}

impl ColumnDescriptor<'_> {
    /// Drops the expression borrow, keeping what a report needs to display.
    pub fn to_report_column(&self) -> ReportColumn {
        ReportColumn {
            name: self.name.clone(),
            source_expression_text: self.source_expression_text.clone(),
            output_slot: self.output_slot,
            format: self.format,
        }
    }
}

/// Column as stored in an assembled report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportColumn {
    pub name: String,
    pub source_expression_text: String,
    pub output_slot: usize,
    pub format: ColumnFormat,
}

// ============================================================================
// COMPILER
// ============================================================================

/// Compiles every column argument, in order. Fails on the first malformed
/// argument; descriptors built before it are dropped with the error.
pub fn compile_columns<'e>(
    evaluator: &mut Evaluator,
    column_args: &'e [Expression],
    config: &TableExprConfig,
) -> TableExprResult<Vec<ColumnDescriptor<'e>>> {
    if column_args.is_empty() {
        return Err(TableExprError::InvalidArgument(
            "At least one column must be defined".to_string(),
        ));
    }

    let mut columns = Vec::with_capacity(column_args.len());
    for (index, arg) in column_args.iter().enumerate() {
        columns.push(compile_column(evaluator, index, arg, config)?);
    }

    log_debug!("TABLE", "compiled {} columns", columns.len());
    Ok(columns)
}

fn compile_column<'e>(
    evaluator: &mut Evaluator,
    index: usize,
    arg: &'e Expression,
    config: &TableExprConfig,
) -> TableExprResult<ColumnDescriptor<'e>> {
    let parts = match arg {
        Expression::Set(parts) if parts.len() == 2 || parts.len() == 3 => parts,
        other => {
            return Err(TableExprError::InvalidArgument(format!(
                "Column {} must be [name, value] or [name, value, format], got {}",
                index, other
            )))
        }
    };

    let name = evaluator
        .evaluate(&parts[0])?
        .as_label()
        .unwrap_or_else(|| config.default_column_name(index));

    let format = match parts.get(2) {
        Some(format_expr) => evaluator
            .evaluate(format_expr)?
            .as_label()
            .and_then(|keyword| ColumnFormat::from_keyword(&keyword))
            .unwrap_or_default(),
        None => ColumnFormat::Text,
    };

    let expression = &parts[1];
    Ok(ColumnDescriptor {
        name,
        source_expression_text: expression.to_string(),
        expression,
        output_slot: index,
        format,
    })
}
