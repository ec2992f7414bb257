//! FILENAME: core/table-expr/src/format.rs
//! PURPOSE: Column format tags and number formatting for report cells.
//! CONTEXT: A format tag is a display hint attached to a column by the
//! optional third element of a column argument. It never affects
//! evaluation; it only decides how numeric cells are turned into text and
//! how the column sorts.

use serde::{Deserialize, Serialize};

/// Display format of a report column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColumnFormat {
    #[default]
    Text,
    Currency,
    Percentage,
    Date,
    Number,
}

impl ColumnFormat {
    /// Matches a format keyword, ignoring case. Only whole keywords match.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        if keyword.eq_ignore_ascii_case("currency") {
            Some(ColumnFormat::Currency)
        } else if keyword.eq_ignore_ascii_case("percentage") {
            Some(ColumnFormat::Percentage)
        } else if keyword.eq_ignore_ascii_case("date") {
            Some(ColumnFormat::Date)
        } else if keyword.eq_ignore_ascii_case("number") {
            Some(ColumnFormat::Number)
        } else {
            None
        }
    }

    /// Formats whose cells sort and summarize as numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnFormat::Number | ColumnFormat::Currency | ColumnFormat::Percentage
        )
    }
}

/// Format a number according to the column format.
pub fn format_number(value: f64, format: ColumnFormat) -> String {
    if value.is_nan() {
        return "-".to_string();
    }
    // Infinities render the same whatever the format.
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    match format {
        ColumnFormat::Text => format_general(value),
        ColumnFormat::Number => format_decimal(value),
        ColumnFormat::Currency => format_currency(value),
        ColumnFormat::Percentage => format_percentage(value),
        ColumnFormat::Date => format_date(value),
    }
}

/// Format a number in general format (auto-detect best representation).
fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    // For integers, don't show decimal point
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{:.0}", value);
    }

    trim_zeros(format!("{:.10}", value))
}

/// Two decimals with trailing zeros removed.
fn format_decimal(value: f64) -> String {
    trim_zeros(format!("{:.2}", value))
}

fn trim_zeros(formatted: String) -> String {
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Add thousands separators to a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits: Vec<char> = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    if negative {
        result.push('-');
    }
    let len = digits.len();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}

/// Currency keeps a third decimal for small non-zero amounts.
fn format_currency(value: f64) -> String {
    let decimals = if value != 0.0 && value.abs() <= 0.05 { 3 } else { 2 };
    let amount = add_thousands_separator(&format!("{:.prec$}", value, prec = decimals));
    format!("{} $", amount)
}

/// The value is already expressed in percent (12.5 means 12.5 %).
fn format_percentage(value: f64) -> String {
    let abs_value = value.abs();
    let formatted = if abs_value < 1.0 {
        format!("{:.2}", value)
    } else if abs_value <= 100.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.0}", value)
    };
    format!("{} %", formatted)
}

/// Dates are Unix timestamps in seconds.
fn format_date(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return "-".to_string();
    }
    match chrono::DateTime::from_timestamp(value.trunc() as i64, 0) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}
