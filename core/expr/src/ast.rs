//! FILENAME: core/expr/src/ast.rs
//! PURPOSE: Defines the expression tree consumed by the evaluator.
//! CONTEXT: Hosts build these trees (there is no text grammar in this
//! workspace) and hand them to the Evaluator. Function calls keep their
//! arguments unevaluated so that functions like TABLE can defer evaluation
//! of some arguments and evaluate them once per dataset element.
//!
//! SUPPORTED EXPRESSIONS:
//! - Literals: null, numbers, strings, booleans
//! - Variables: $1, $REPORT, T (looked up in the environment)
//! - Sets: [a, b, [c, d]]
//! - Binary operations: +, -, *, /, =, <>, <, >, <=, >=
//! - Unary operations: - (negation), ! (logical not)
//! - Function calls: TABLE(...), SUM(...), IF(...)

use std::fmt;

/// Represents an expression node.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    /// A literal value: null, number, string, or boolean.
    Literal(Value),

    /// A named variable such as `$1` or `$SINCE`.
    Variable(String),

    /// An ordered set of sub-expressions, written `[a, b, c]`.
    Set(Vec<Expression>),

    /// A binary operation: left op right.
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    /// A unary operation: op operand.
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// A call to a registered function. Arguments are passed unevaluated.
    FunctionCall { name: String, args: Vec<Expression> },
}

impl Expression {
    pub fn number(n: f64) -> Self {
        Expression::Literal(Value::Number(n))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Expression::Literal(Value::String(s.into()))
    }

    pub fn boolean(b: bool) -> Self {
        Expression::Literal(Value::Boolean(b))
    }

    pub fn null() -> Self {
        Expression::Literal(Value::Null)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expression::Variable(name.into())
    }

    /// Positional variable bound by row-iterating functions: `arg(1)` is `$1`.
    pub fn arg(position: usize) -> Self {
        Expression::Variable(format!("${}", position))
    }

    pub fn set(items: Vec<Expression>) -> Self {
        Expression::Set(items)
    }

    pub fn call(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            args,
        }
    }

    pub fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }
}

/// Literal values that can appear in expressions.
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    Null,
    Number(f64),
    String(String),
    Boolean(bool),
}

/// Binary operators for expressions.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOperator {
    // Comparison operators (lowest precedence)
    Equal,        // =
    NotEqual,     // <>
    LessThan,     // <
    GreaterThan,  // >
    LessEqual,    // <=
    GreaterEqual, // >=

    // Arithmetic operators
    Add,      // + (also joins text)
    Subtract, // -
    Multiply, // *
    Divide,   // /
}

/// Unary operators.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOperator {
    Negate, // -
    Not,    // !
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
            BinaryOperator::Equal => write!(f, "="),
            BinaryOperator::NotEqual => write!(f, "<>"),
            BinaryOperator::LessThan => write!(f, "<"),
            BinaryOperator::GreaterThan => write!(f, ">"),
            BinaryOperator::LessEqual => write!(f, "<="),
            BinaryOperator::GreaterEqual => write!(f, ">="),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Negate => write!(f, "-"),
            UnaryOperator::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "nil"),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s),
            Value::Boolean(b) => write!(f, "{}", if *b { "true" } else { "false" }),
        }
    }
}

/// Renders the expression back to source form. Column descriptors keep this
/// text for display and debugging.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::Set(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }
            Expression::BinaryOp { left, op, right } => {
                write_operand(f, left)?;
                write!(f, " {} ", op)?;
                write_operand(f, right)
            }
            Expression::UnaryOp { op, operand } => write!(f, "{}{}", op, operand),
            Expression::FunctionCall { name, args } => {
                write!(f, "{}(", name)?;
                write_list(f, args)?;
                write!(f, ")")
            }
        }
    }
}

/// Nested binary operations are parenthesized so the text keeps the tree shape.
fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Expression) -> fmt::Result {
    match operand {
        Expression::BinaryOp { .. } => write!(f, "({})", operand),
        _ => write!(f, "{}", operand),
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expression]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
