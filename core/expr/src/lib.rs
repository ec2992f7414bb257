//! FILENAME: core/expr/src/lib.rs
//! PURPOSE: Library root for the expression evaluator.
//! CONTEXT: Exposes the expression tree, the tagged result values, the
//! variable environment and the evaluator with its function registry.
//! Report-building functions such as TABLE live in other crates and plug
//! in through `Evaluator::register_function`.
//!
//! PIPELINE: Expression tree --> Evaluator (Environment + Functions) --> ExprValue

pub mod ast;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod value;


// Re-export commonly used types for convenience
pub use ast::{BinaryOperator, Expression, UnaryOperator, Value};
pub use environment::Environment;
pub use error::{EvalResult, ExprError};
pub use evaluator::Evaluator;
pub use functions::{ExprFunction, FunctionRegistry};
pub use value::ExprValue;
