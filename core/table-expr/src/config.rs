//! FILENAME: core/table-expr/src/config.rs
//! PURPOSE: Configuration for the TABLE function and its dialogs.
//! CONTEXT: Every field has a default, so hosts can load a partial JSON
//! document (or none at all) and only override what they need.

use serde::{Deserialize, Serialize};

/// Presentation options for report dialogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DialogOptions {
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for DialogOptions {
    fn default() -> Self {
        DialogOptions {
            width: 800,
            height: 600,
            resizable: true,
        }
    }
}

/// Controls how the TABLE function is registered and how reports are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableExprConfig {
    /// Name the function is registered under.
    pub function_name: String,

    /// Report title used when the name expression yields null.
    pub default_report_name: String,

    /// Prefix of positional column names (`col 0`, `col 1`, ...).
    pub column_name_prefix: String,

    /// Dialog geometry for opened reports.
    pub dialog: DialogOptions,
}

impl Default for TableExprConfig {
    fn default() -> Self {
        TableExprConfig {
            function_name: "TABLE".to_string(),
            default_report_name: "none".to_string(),
            column_name_prefix: "col".to_string(),
            dialog: DialogOptions::default(),
        }
    }
}

impl TableExprConfig {
    /// Loads a configuration from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Positional column name for the column at `index`.
    pub fn default_column_name(&self, index: usize) -> String {
        format!("{} {}", self.column_name_prefix, index)
    }
}
