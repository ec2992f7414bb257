//! FILENAME: core/expr/src/value.rs
//! PURPOSE: The tagged result produced by evaluating an expression.
//! CONTEXT: Every evaluation yields exactly one ExprValue. Sets can nest to
//! any depth; consumers that need scalars flatten them.

use serde::{Deserialize, Serialize};

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprValue {
    Null,
    Boolean(bool),
    Number(f64),
    /// Symbol or text result.
    Symbol(String),
    /// An ordered set of results. Members may themselves be sets.
    Set(Vec<ExprValue>),
}

impl ExprValue {
    pub fn symbol(s: impl Into<String>) -> Self {
        ExprValue::Symbol(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ExprValue::Null)
    }

    /// Returns true for a set with at least one member.
    pub fn is_set(&self) -> bool {
        matches!(self, ExprValue::Set(items) if !items.is_empty())
    }

    /// Attempts to coerce the result to a number.
    /// Sets coerce through their first member; a set with several members
    /// logs a warning since the remaining members are ignored.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ExprValue::Null => None,
            ExprValue::Number(n) if n.is_nan() => None,
            ExprValue::Number(n) => Some(*n),
            ExprValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            ExprValue::Symbol(s) => s.trim().parse::<f64>().ok(),
            ExprValue::Set(items) => {
                if items.len() > 1 {
                    log::warn!(
                        target: "EXPR",
                        "Expression set has many results ({}), returning first",
                        items.len()
                    );
                }
                items.first().and_then(ExprValue::as_number)
            }
        }
    }

    /// Numeric coercion of one set member. Nested sets yield their first
    /// member. Asking for a member explicitly logs nothing.
    pub fn number_at(&self, index: usize) -> Option<f64> {
        let mut current = match self {
            ExprValue::Set(items) => items.get(index)?,
            scalar if index == 0 => scalar,
            _ => return None,
        };
        while let ExprValue::Set(items) = current {
            current = items.first()?;
        }
        current.as_number()
    }

    /// Attempts to coerce the result to a boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ExprValue::Boolean(b) => Some(*b),
            ExprValue::Number(n) => Some(*n != 0.0),
            ExprValue::Symbol(s) => match s.to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            ExprValue::Null => Some(false),
            ExprValue::Set(items) => Some(!items.is_empty()),
        }
    }

    /// Converts the result to its text representation.
    pub fn as_text(&self) -> String {
        match self {
            ExprValue::Null => "nil".to_string(),
            ExprValue::Number(n) => format_number_text(*n),
            ExprValue::Boolean(b) => {
                if *b { "true" } else { "false" }.to_string()
            }
            ExprValue::Symbol(s) => s.clone(),
            ExprValue::Set(items) => {
                let parts: Vec<String> = items.iter().map(ExprValue::as_text).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }

    /// Text for labels and titles: None when the result carries no usable
    /// string (null or empty text), so callers can substitute a default.
    pub fn as_label(&self) -> Option<String> {
        match self {
            ExprValue::Null => None,
            ExprValue::Symbol(s) if s.is_empty() => None,
            other => Some(other.as_text()),
        }
    }

    /// Number of members for sets, 1 for scalars and 0 for null.
    pub fn len(&self) -> usize {
        match self {
            ExprValue::Null => 0,
            ExprValue::Set(items) => items.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Formats without unnecessary decimal places.
fn format_number_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl From<f64> for ExprValue {
    fn from(value: f64) -> Self {
        ExprValue::Number(value)
    }
}

impl From<bool> for ExprValue {
    fn from(value: bool) -> Self {
        ExprValue::Boolean(value)
    }
}

impl From<&str> for ExprValue {
    fn from(value: &str) -> Self {
        ExprValue::Symbol(value.to_string())
    }
}

impl From<String> for ExprValue {
    fn from(value: String) -> Self {
        ExprValue::Symbol(value)
    }
}

impl From<Vec<ExprValue>> for ExprValue {
    fn from(value: Vec<ExprValue>) -> Self {
        ExprValue::Set(value)
    }
}
