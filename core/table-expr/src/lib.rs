//! FILENAME: core/table-expr/src/lib.rs
//! PURPOSE: Library root for the TABLE expression engine.
//! CONTEXT: TABLE(name, dataset, [col], ...) evaluates its column
//! expressions once per dataset element, with the element's flattened
//! values bound as `$1..$k`, and hands the resulting report to a dialog.
//!
//! PIPELINE:
//!   dataset --> flatten_element --> evaluate_record (per row) --+
//!   columns --> compile_columns --------------------------------+--> Report --> ReportDialogs

pub mod logging;

pub mod column;
pub mod config;
pub mod dialogs;
pub mod display;
pub mod error;
pub mod format;
pub mod function;
pub mod record;
pub mod report;


// Re-export commonly used types for convenience
pub use column::{compile_columns, ColumnDescriptor, ReportColumn};
pub use config::{DialogOptions, TableExprConfig};
pub use dialogs::{DialogId, ReportDialog, ReportDialogs, SharedDialogs};
pub use display::{
    format_cell, DisplayColumn, DisplayState, DisplaySurface, DisplayValue, SortDirection,
    TextSurface,
};
pub use error::{TableExprError, TableExprResult};
pub use format::{format_number, ColumnFormat};
pub use function::{generate_report, register_table_function, TableFunction};
pub use record::{evaluate_record, evaluate_records, flatten_element, resolve_cell, Record, ResolvedCell};
pub use report::{assemble_report, DisposalSummary, Report};
