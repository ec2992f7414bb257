//! FILENAME: core/expr/src/evaluator.rs
//! PURPOSE: Evaluates expression trees to tagged results.
//! CONTEXT: The evaluator owns one Environment and one FunctionRegistry.
//! It is not reentrant across threads: hosts that evaluate concurrently
//! create one Evaluator per thread. Functions receive `&mut Evaluator` and
//! may push scopes to evaluate sub-expressions with temporary bindings.
//!
//! SUPPORTED FEATURES:
//! - Literal evaluation: null, numbers, strings, booleans
//! - Variable lookup (unbound variables evaluate to null)
//! - Set construction, members evaluated left to right
//! - Binary operations: +, -, *, /, =, <>, <, >, <=, >=
//! - Unary operations: - (negation), ! (not)
//! - Function calls through the registry

use crate::ast::{BinaryOperator, Expression, UnaryOperator, Value};
use crate::environment::Environment;
use crate::error::{EvalResult, ExprError};
use crate::functions::{ExprFunction, FunctionRegistry};
use crate::value::ExprValue;

/// The expression evaluator.
#[derive(Debug)]
pub struct Evaluator {
    env: Environment,
    functions: FunctionRegistry,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// Creates an evaluator with the built-in functions registered.
    pub fn new() -> Self {
        Evaluator {
            env: Environment::new(),
            functions: FunctionRegistry::with_builtins(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn register_function(&mut self, name: &str, function: impl ExprFunction + 'static) {
        self.functions.register(name, function);
    }

    pub fn set_global(&mut self, name: &str, value: ExprValue) {
        self.env.set_global(name, value);
    }

    /// Runs `f` inside a fresh binding scope. The scope is popped when `f`
    /// returns, whether it succeeded or not.
    pub fn with_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.env.push_scope();
        let result = f(self);
        self.env.pop_scope();
        result
    }

    /// Evaluates an expression and returns the result.
    pub fn evaluate(&mut self, expr: &Expression) -> EvalResult<ExprValue> {
        match expr {
            Expression::Literal(value) => Ok(self.eval_literal(value)),
            Expression::Variable(name) => Ok(self.eval_variable(name)),
            Expression::Set(items) => self.eval_set(items),
            Expression::BinaryOp { left, op, right } => self.eval_binary_op(left, *op, right),
            Expression::UnaryOp { op, operand } => self.eval_unary_op(*op, operand),
            Expression::FunctionCall { name, args } => self.eval_function(name, args),
        }
    }

    fn eval_literal(&self, value: &Value) -> ExprValue {
        match value {
            Value::Null => ExprValue::Null,
            Value::Number(n) => ExprValue::Number(*n),
            Value::String(s) => ExprValue::Symbol(s.clone()),
            Value::Boolean(b) => ExprValue::Boolean(*b),
        }
    }

    fn eval_variable(&self, name: &str) -> ExprValue {
        self.env.get(name).cloned().unwrap_or(ExprValue::Null)
    }

    fn eval_set(&mut self, items: &[Expression]) -> EvalResult<ExprValue> {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            values.push(self.evaluate(item)?);
        }
        Ok(ExprValue::Set(values))
    }

    fn eval_binary_op(
        &mut self,
        left: &Expression,
        op: BinaryOperator,
        right: &Expression,
    ) -> EvalResult<ExprValue> {
        let left_val = self.evaluate(left)?;
        let right_val = self.evaluate(right)?;

        match op {
            BinaryOperator::Add => self.eval_add(&left_val, &right_val),
            BinaryOperator::Subtract => arithmetic(&left_val, &right_val, op, |l, r| l - r),
            BinaryOperator::Multiply => arithmetic(&left_val, &right_val, op, |l, r| l * r),
            BinaryOperator::Divide => match right_val.as_number() {
                Some(r) if r == 0.0 => Err(ExprError::DivisionByZero),
                _ => arithmetic(&left_val, &right_val, op, |l, r| l / r),
            },

            BinaryOperator::Equal => Ok(ExprValue::Boolean(values_equal(&left_val, &right_val))),
            BinaryOperator::NotEqual => {
                Ok(ExprValue::Boolean(!values_equal(&left_val, &right_val)))
            }
            BinaryOperator::LessThan => compare(&left_val, &right_val, op, |o| o.is_lt()),
            BinaryOperator::GreaterThan => compare(&left_val, &right_val, op, |o| o.is_gt()),
            BinaryOperator::LessEqual => compare(&left_val, &right_val, op, |o| o.is_le()),
            BinaryOperator::GreaterEqual => compare(&left_val, &right_val, op, |o| o.is_ge()),
        }
    }

    /// `+` adds numbers and joins text when either side is a symbol.
    fn eval_add(&self, left: &ExprValue, right: &ExprValue) -> EvalResult<ExprValue> {
        match (left, right) {
            (ExprValue::Symbol(_), _) | (_, ExprValue::Symbol(_))
                if left.as_number().is_none() || right.as_number().is_none() =>
            {
                Ok(ExprValue::Symbol(format!("{}{}", left.as_text(), right.as_text())))
            }
            _ => arithmetic(left, right, BinaryOperator::Add, |l, r| l + r),
        }
    }

    fn eval_unary_op(&mut self, op: UnaryOperator, operand: &Expression) -> EvalResult<ExprValue> {
        let val = self.evaluate(operand)?;

        match op {
            UnaryOperator::Negate => match val.as_number() {
                Some(n) => Ok(ExprValue::Number(-n)),
                None => Err(ExprError::TypeMismatch(format!(
                    "cannot negate {}",
                    val.as_text()
                ))),
            },
            UnaryOperator::Not => match val.as_boolean() {
                Some(b) => Ok(ExprValue::Boolean(!b)),
                None => Err(ExprError::TypeMismatch(format!(
                    "cannot negate {}",
                    val.as_text()
                ))),
            },
        }
    }

    fn eval_function(&mut self, name: &str, args: &[Expression]) -> EvalResult<ExprValue> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| ExprError::UnknownFunction(name.to_uppercase()))?;
        function.call(self, args)
    }
}

fn arithmetic(
    left: &ExprValue,
    right: &ExprValue,
    op: BinaryOperator,
    apply: impl Fn(f64, f64) -> f64,
) -> EvalResult<ExprValue> {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => Ok(ExprValue::Number(apply(l, r))),
        _ => Err(ExprError::TypeMismatch(format!(
            "{} {} {}",
            left.as_text(),
            op,
            right.as_text()
        ))),
    }
}

fn values_equal(left: &ExprValue, right: &ExprValue) -> bool {
    match (left, right) {
        (ExprValue::Number(l), ExprValue::Number(r)) => (l - r).abs() < f64::EPSILON,
        (ExprValue::Symbol(l), ExprValue::Symbol(r)) => l.eq_ignore_ascii_case(r),
        (ExprValue::Boolean(l), ExprValue::Boolean(r)) => l == r,
        (ExprValue::Null, ExprValue::Null) => true,
        (ExprValue::Set(l), ExprValue::Set(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| values_equal(a, b))
        }
        // Cross-type comparisons
        (ExprValue::Number(n), ExprValue::Symbol(s))
        | (ExprValue::Symbol(s), ExprValue::Number(n)) => s
            .trim()
            .parse::<f64>()
            .map(|parsed| (parsed - n).abs() < f64::EPSILON)
            .unwrap_or(false),
        _ => false,
    }
}

fn compare(
    left: &ExprValue,
    right: &ExprValue,
    op: BinaryOperator,
    test: impl Fn(std::cmp::Ordering) -> bool,
) -> EvalResult<ExprValue> {
    if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
        return match l.partial_cmp(&r) {
            Some(ordering) => Ok(ExprValue::Boolean(test(ordering))),
            None => Ok(ExprValue::Boolean(false)),
        };
    }

    match (left, right) {
        (ExprValue::Symbol(l), ExprValue::Symbol(r)) => {
            Ok(ExprValue::Boolean(test(l.to_uppercase().cmp(&r.to_uppercase()))))
        }
        _ => Err(ExprError::TypeMismatch(format!(
            "{} {} {}",
            left.as_text(),
            op,
            right.as_text()
        ))),
    }
}
