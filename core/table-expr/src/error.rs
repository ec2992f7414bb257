//! FILENAME: core/table-expr/src/error.rs

use expr::ExprError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableExprError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Evaluation(#[from] ExprError),
}

pub type TableExprResult<T> = Result<T, TableExprError>;

impl From<TableExprError> for ExprError {
    fn from(err: TableExprError) -> Self {
        match err {
            TableExprError::InvalidArgument(message) => ExprError::InvalidArgument(message),
            TableExprError::Evaluation(inner) => inner,
        }
    }
}
