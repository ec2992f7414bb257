//! FILENAME: core/expr/src/functions.rs
//! PURPOSE: Registry of callable functions and the built-in set.
//! CONTEXT: Functions receive their arguments unevaluated together with the
//! evaluator, so each function decides what to evaluate and when. Hosts
//! register extra functions (TABLE is registered by the table-expr crate).

use crate::ast::Expression;
use crate::error::{EvalResult, ExprError};
use crate::evaluator::Evaluator;
use crate::value::ExprValue;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A function callable from expressions.
pub trait ExprFunction: Send + Sync {
    fn call(&self, evaluator: &mut Evaluator, args: &[Expression]) -> EvalResult<ExprValue>;
}

impl<F> ExprFunction for F
where
    F: Fn(&mut Evaluator, &[Expression]) -> EvalResult<ExprValue> + Send + Sync,
{
    fn call(&self, evaluator: &mut Evaluator, args: &[Expression]) -> EvalResult<ExprValue> {
        self(evaluator, args)
    }
}

/// Functions indexed by uppercase name.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<String, Arc<dyn ExprFunction>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("SUM", fn_sum);
        registry.register("AVG", fn_average);
        registry.register("AVERAGE", fn_average);
        registry.register("MIN", fn_min);
        registry.register("MAX", fn_max);
        registry.register("COUNT", fn_count);
        registry.register("IF", fn_if);
        registry
    }

    /// Registers a function, replacing any previous one with the same name.
    pub fn register(&mut self, name: &str, function: impl ExprFunction + 'static) {
        self.functions.insert(name.to_uppercase(), Arc::new(function));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ExprFunction>> {
        self.functions.get(&name.to_uppercase()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_uppercase())
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry").field("functions", &names).finish()
    }
}

// ==================== Helpers ====================

/// Evaluates every argument and collects the numeric members, flattening sets.
/// Non-numeric members are skipped.
fn collect_numbers(evaluator: &mut Evaluator, args: &[Expression]) -> EvalResult<Vec<f64>> {
    let mut numbers = Vec::new();
    for arg in args {
        let value = evaluator.evaluate(arg)?;
        let mut pending = vec![value];
        while let Some(item) = pending.pop() {
            match item {
                ExprValue::Set(items) => pending.extend(items.into_iter().rev()),
                other => {
                    if let Some(n) = other.as_number() {
                        numbers.push(n);
                    }
                }
            }
        }
    }
    Ok(numbers)
}

// ==================== Aggregate Functions ====================

fn fn_sum(evaluator: &mut Evaluator, args: &[Expression]) -> EvalResult<ExprValue> {
    let numbers = collect_numbers(evaluator, args)?;
    Ok(ExprValue::Number(numbers.iter().sum()))
}

fn fn_average(evaluator: &mut Evaluator, args: &[Expression]) -> EvalResult<ExprValue> {
    let numbers = collect_numbers(evaluator, args)?;
    if numbers.is_empty() {
        return Err(ExprError::DivisionByZero);
    }
    let sum: f64 = numbers.iter().sum();
    Ok(ExprValue::Number(sum / numbers.len() as f64))
}

fn fn_min(evaluator: &mut Evaluator, args: &[Expression]) -> EvalResult<ExprValue> {
    let numbers = collect_numbers(evaluator, args)?;
    Ok(numbers
        .into_iter()
        .reduce(f64::min)
        .map_or(ExprValue::Null, ExprValue::Number))
}

fn fn_max(evaluator: &mut Evaluator, args: &[Expression]) -> EvalResult<ExprValue> {
    let numbers = collect_numbers(evaluator, args)?;
    Ok(numbers
        .into_iter()
        .reduce(f64::max)
        .map_or(ExprValue::Null, ExprValue::Number))
}

fn fn_count(evaluator: &mut Evaluator, args: &[Expression]) -> EvalResult<ExprValue> {
    let mut count = 0usize;
    for arg in args {
        count += evaluator.evaluate(arg)?.len();
    }
    Ok(ExprValue::Number(count as f64))
}

// ==================== Logical Functions ====================

/// IF(condition, then[, else]). Only the selected branch is evaluated.
fn fn_if(evaluator: &mut Evaluator, args: &[Expression]) -> EvalResult<ExprValue> {
    if args.len() < 2 || args.len() > 3 {
        return Err(ExprError::InvalidArgument(
            "IF requires a condition and one or two branches".to_string(),
        ));
    }

    let condition = evaluator.evaluate(&args[0])?;
    match condition.as_boolean() {
        Some(true) => evaluator.evaluate(&args[1]),
        Some(false) => match args.get(2) {
            Some(otherwise) => evaluator.evaluate(otherwise),
            None => Ok(ExprValue::Boolean(false)),
        },
        None => Err(ExprError::TypeMismatch(format!(
            "IF condition is not a boolean: {}",
            condition.as_text()
        ))),
    }
}
