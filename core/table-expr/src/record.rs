//! FILENAME: core/table-expr/src/record.rs
//! PURPOSE: Flattens dataset elements into records and evaluates their cells.
//! CONTEXT: One record per non-null dataset element. The element is
//! flattened into raw values which are bound as `$1..$k` in a fresh scope
//! while the column expressions for that row are evaluated. The scope is
//! popped afterwards, so no binding outlives its row.

use crate::column::ColumnDescriptor;
use crate::error::{TableExprError, TableExprResult};
use crate::logging::log_debug;
use expr::{Evaluator, ExprValue};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Most dataset elements flatten to a handful of values.
pub type RawValues = SmallVec<[ExprValue; 4]>;

// ============================================================================
// CELL VALUES
// ============================================================================

/// A column result coerced for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResolvedCell {
    Null,
    True,
    False,
    Number(f64),
    Text(String),
}

impl ResolvedCell {
    pub fn is_null(&self) -> bool {
        matches!(self, ResolvedCell::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResolvedCell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResolvedCell::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Coerces one evaluation result into a cell.
///
/// A non-empty set becomes a number through member 0 (NaN when that
/// member has no numeric reading), without the many-results warning.
/// Null and the empty set are `Null`.
pub fn resolve_cell(value: ExprValue) -> ResolvedCell {
    match value {
        ExprValue::Boolean(true) => ResolvedCell::True,
        ExprValue::Boolean(false) => ResolvedCell::False,
        ExprValue::Number(n) => ResolvedCell::Number(n),
        ExprValue::Symbol(s) => ResolvedCell::Text(s),
        set @ ExprValue::Set(_) if set.is_set() => {
            ResolvedCell::Number(set.number_at(0).unwrap_or(f64::NAN))
        }
        ExprValue::Set(_) | ExprValue::Null => ResolvedCell::Null,
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// One report row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Flattened element values, the source of `$1..$k`.
    pub raw_values: RawValues,

    /// One cell per column, in column order.
    pub cells: Vec<ResolvedCell>,
}

impl Record {
    pub fn cell(&self, slot: usize) -> Option<&ResolvedCell> {
        self.cells.get(slot)
    }

    pub fn text_cell_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| matches!(cell, ResolvedCell::Text(_)))
            .count()
    }
}

/// Flattens a dataset element depth-first, left to right.
/// Scalars stay a single value; empty nested sets contribute nothing.
pub fn flatten_element(element: &ExprValue) -> RawValues {
    let mut values = RawValues::new();
    let items = match element {
        ExprValue::Set(items) => items,
        scalar => {
            values.push(scalar.clone());
            return values;
        }
    };

    // Worklist of partially consumed sets, innermost last.
    let mut stack = vec![items.iter()];
    while let Some(iter) = stack.last_mut() {
        match iter.next() {
            Some(ExprValue::Set(inner)) => stack.push(inner.iter()),
            Some(value) => values.push(value.clone()),
            None => {
                stack.pop();
            }
        }
    }

    values
}

/// Evaluates every column for one dataset element.
pub fn evaluate_record(
    evaluator: &mut Evaluator,
    element: &ExprValue,
    columns: &[ColumnDescriptor<'_>],
) -> TableExprResult<Record> {
    let raw_values = flatten_element(element);

    let cells = evaluator.with_scope(|ev| {
        for (i, value) in raw_values.iter().enumerate() {
            ev.environment_mut().bind(&format!("${}", i + 1), value.clone());
        }

        columns
            .iter()
            .map(|column| {
                ev.evaluate(column.expression)
                    .map(resolve_cell)
                    .map_err(TableExprError::from)
            })
            .collect::<TableExprResult<Vec<_>>>()
    })?;

    assert_eq!(
        cells.len(),
        columns.len(),
        "every record must hold one cell per column"
    );

    Ok(Record { raw_values, cells })
}

/// Evaluates one record per dataset element, in order. Null elements are
/// skipped. The first evaluation failure aborts the whole run.
pub fn evaluate_records(
    evaluator: &mut Evaluator,
    elements: &[ExprValue],
    columns: &[ColumnDescriptor<'_>],
) -> TableExprResult<Vec<Record>> {
    let mut rows = Vec::with_capacity(elements.len());
    for element in elements.iter().filter(|element| !element.is_null()) {
        rows.push(evaluate_record(evaluator, element, columns)?);
    }

    log_debug!(
        "TABLE",
        "evaluated {} rows from {} elements",
        rows.len(),
        elements.len()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_scalar() {
        let values = flatten_element(&ExprValue::Number(10.0));
        assert_eq!(values.as_slice(), &[ExprValue::Number(10.0)]);
    }

    #[test]
    fn flatten_nested_matches_preflattened() {
        let nested = ExprValue::Set(vec![
            ExprValue::symbol("U.US"),
            ExprValue::Set(vec![
                ExprValue::Number(1.0),
                ExprValue::Set(vec![]),
                ExprValue::Set(vec![ExprValue::Number(2.0), ExprValue::Boolean(true)]),
            ]),
            ExprValue::Number(3.0),
        ]);
        let flat = ExprValue::Set(vec![
            ExprValue::symbol("U.US"),
            ExprValue::Number(1.0),
            ExprValue::Number(2.0),
            ExprValue::Boolean(true),
            ExprValue::Number(3.0),
        ]);
        assert_eq!(flatten_element(&nested), flatten_element(&flat));
        assert_eq!(flatten_element(&flat).len(), 5);
    }

    #[test]
    fn flatten_deep_nesting_without_recursion() {
        let mut value = ExprValue::Number(1.0);
        for _ in 0..10_000 {
            value = ExprValue::Set(vec![value]);
        }
        assert_eq!(flatten_element(&value).as_slice(), &[ExprValue::Number(1.0)]);
        // Dropping a deeply nested value recurses, so unwind it by hand.
        let mut current = value;
        while let ExprValue::Set(mut items) = current {
            current = items.pop().unwrap_or(ExprValue::Null);
        }
    }

    #[test]
    fn resolve_cell_mapping() {
        assert_eq!(resolve_cell(ExprValue::Boolean(true)), ResolvedCell::True);
        assert_eq!(resolve_cell(ExprValue::Boolean(false)), ResolvedCell::False);
        assert_eq!(resolve_cell(ExprValue::Number(2.5)), ResolvedCell::Number(2.5));
        assert_eq!(
            resolve_cell(ExprValue::symbol("hello")),
            ResolvedCell::Text("hello".to_string())
        );
        assert_eq!(resolve_cell(ExprValue::Null), ResolvedCell::Null);
        assert_eq!(resolve_cell(ExprValue::Set(vec![])), ResolvedCell::Null);
        assert_eq!(
            resolve_cell(ExprValue::Set(vec![ExprValue::Number(4.0), ExprValue::Number(5.0)])),
            ResolvedCell::Number(4.0)
        );
    }

    #[test]
    fn multi_member_set_resolves_through_member_zero() {
        let value = ExprValue::Set(vec![
            ExprValue::Set(vec![ExprValue::Number(3.0), ExprValue::Number(8.0)]),
            ExprValue::Number(9.0),
        ]);
        assert_eq!(resolve_cell(value), ResolvedCell::Number(3.0));
    }

    #[test]
    fn non_numeric_set_resolves_to_nan() {
        match resolve_cell(ExprValue::Set(vec![ExprValue::symbol("abc")])) {
            ResolvedCell::Number(n) => assert!(n.is_nan()),
            other => panic!("expected NaN number, got {:?}", other),
        }
    }

    #[test]
    fn text_cell_count() {
        let record = Record {
            raw_values: RawValues::new(),
            cells: vec![
                ResolvedCell::Text("a".to_string()),
                ResolvedCell::Number(1.0),
                ResolvedCell::Text("b".to_string()),
            ],
        };
        assert_eq!(record.text_cell_count(), 2);
        assert_eq!(record.cell(1).and_then(ResolvedCell::as_number), Some(1.0));
        assert_eq!(record.cell(3), None);
    }
}
