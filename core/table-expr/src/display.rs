//! FILENAME: core/table-expr/src/display.rs
//! PURPOSE: Presentation projection of a report: column accessors, view
//! order, sorting, search filtering and cell formatting.
//! CONTEXT: Built lazily on a report's first render and reused afterwards.
//! The projection never touches the report's rows; sorting and filtering
//! only change which row indices are shown and in what order.

use crate::column::ReportColumn;
use crate::format::{format_number, ColumnFormat};
use crate::record::{Record, ResolvedCell};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// DISPLAY VALUES
// ============================================================================

/// A cell as a display surface sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayValue<'a> {
    Null,
    Boolean(bool),
    Number(f64),
    Text(&'a str),
}

/// Formats a display value for the given column format.
pub fn format_cell(value: DisplayValue<'_>, format: ColumnFormat) -> String {
    match value {
        DisplayValue::Null => "-".to_string(),
        DisplayValue::Boolean(true) => "true".to_string(),
        DisplayValue::Boolean(false) => "false".to_string(),
        DisplayValue::Number(n) => format_number(n, format),
        DisplayValue::Text(s) => s.to_string(),
    }
}

/// Reads one column's cell out of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayColumn {
    pub title: String,
    pub format: ColumnFormat,
    pub slot: usize,
}

impl DisplayColumn {
    pub fn from_report_column(column: &ReportColumn) -> Self {
        DisplayColumn {
            title: column.name.clone(),
            format: column.format,
            slot: column.output_slot,
        }
    }

    pub fn fetch<'r>(&self, record: &'r Record) -> DisplayValue<'r> {
        match record.cell(self.slot) {
            Some(ResolvedCell::True) => DisplayValue::Boolean(true),
            Some(ResolvedCell::False) => DisplayValue::Boolean(false),
            Some(ResolvedCell::Number(n)) => DisplayValue::Number(*n),
            Some(ResolvedCell::Text(s)) => DisplayValue::Text(s),
            Some(ResolvedCell::Null) | None => DisplayValue::Null,
        }
    }

    pub fn format(&self, record: &Record) -> String {
        format_cell(self.fetch(record), self.format)
    }

    /// Dates and numeric formats sort by value, as do columns holding only
    /// numbers.
    fn sorts_numerically(&self, rows: &[Record]) -> bool {
        self.format.is_numeric()
            || self.format == ColumnFormat::Date
            || rows.iter().all(|row| {
                matches!(self.fetch(row), DisplayValue::Number(_) | DisplayValue::Null)
            })
    }
}

// ============================================================================
// SORTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

enum SortKey {
    Number(f64),
    Text(String),
    Missing,
}

fn numeric_key(value: DisplayValue<'_>) -> SortKey {
    match value {
        DisplayValue::Number(n) if !n.is_nan() => SortKey::Number(n),
        DisplayValue::Boolean(b) => SortKey::Number(if b { 1.0 } else { 0.0 }),
        _ => SortKey::Missing,
    }
}

fn text_key(column: &DisplayColumn, row: &Record) -> SortKey {
    match column.fetch(row) {
        DisplayValue::Null => SortKey::Missing,
        DisplayValue::Text(s) if s.is_empty() => SortKey::Missing,
        _ => SortKey::Text(column.format(row)),
    }
}

/// Missing keys go last in both directions.
fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (SortKey::Missing, SortKey::Missing) => return Ordering::Equal,
        (SortKey::Missing, _) => return Ordering::Greater,
        (_, SortKey::Missing) => return Ordering::Less,
        (SortKey::Number(l), SortKey::Number(r)) => l.partial_cmp(r).unwrap_or(Ordering::Equal),
        (SortKey::Text(l), SortKey::Text(r)) => l.cmp(r),
        _ => Ordering::Equal,
    };
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

// ============================================================================
// DISPLAY STATE
// ============================================================================

/// Lazily built presentation state of one report.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    columns: Vec<DisplayColumn>,
    order: Vec<usize>,
    sort: Option<(usize, SortDirection)>,
    filter: Option<String>,
}

impl DisplayState {
    /// One accessor per column; rows shown in report order.
    pub fn new(columns: &[ReportColumn], row_count: usize) -> Self {
        DisplayState {
            columns: columns.iter().map(DisplayColumn::from_report_column).collect(),
            order: (0..row_count).collect(),
            sort: None,
            filter: None,
        }
    }

    pub fn columns(&self) -> &[DisplayColumn] {
        &self.columns
    }

    pub fn sort(&self) -> Option<(usize, SortDirection)> {
        self.sort
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Row indices in view order, before filtering.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Reorders the view by one column. The sort is stable, so rows with
    /// equal keys keep their previous relative order. Returns false when
    /// the column does not exist. `rows` are the owning report's rows.
    pub(crate) fn sort_by(&mut self, rows: &[Record], column: usize, direction: SortDirection) -> bool {
        let Some(display_column) = self.columns.get(column) else {
            return false;
        };

        let numeric = display_column.sorts_numerically(rows);
        let keys: Vec<SortKey> = rows
            .iter()
            .map(|row| {
                if numeric {
                    numeric_key(display_column.fetch(row))
                } else {
                    text_key(display_column, row)
                }
            })
            .collect();

        self.order.sort_by(|&a, &b| match (keys.get(a), keys.get(b)) {
            (Some(ka), Some(kb)) => compare_keys(ka, kb, direction),
            _ => Ordering::Equal,
        });
        self.sort = Some((column, direction));
        true
    }

    /// Restores report order.
    pub fn clear_sort(&mut self) {
        self.order.sort_unstable();
        self.sort = None;
    }

    /// Hides rows where no cell's formatted text contains the query,
    /// ignoring case. `None` or an empty query shows every row.
    pub fn set_search_filter(&mut self, query: Option<&str>) {
        self.filter = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
    }

    fn matches_filter(&self, row: &Record) -> bool {
        match &self.filter {
            None => true,
            Some(query) => self
                .columns
                .iter()
                .any(|column| column.format(row).to_lowercase().contains(query.as_str())),
        }
    }

    /// Rows to show, in view order, with the search filter applied.
    pub fn visible_rows<'r>(&self, rows: &'r [Record]) -> Vec<&'r Record> {
        self.order
            .iter()
            .filter_map(|&index| rows.get(index))
            .filter(|row| self.matches_filter(row))
            .collect()
    }
}

// ============================================================================
// SURFACES
// ============================================================================

/// Something that can show a report.
pub trait DisplaySurface {
    fn present(&mut self, title: &str, state: &DisplayState, rows: &[Record]);
}

/// Renders reports as aligned plain text.
#[derive(Debug, Default, Clone)]
pub struct TextSurface {
    output: String,
    renders: usize,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the most recent render.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn render_count(&self) -> usize {
        self.renders
    }
}

impl DisplaySurface for TextSurface {
    fn present(&mut self, title: &str, state: &DisplayState, rows: &[Record]) {
        let columns = state.columns();
        let mut table: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
        table.push(columns.iter().map(|c| c.title.clone()).collect());
        for row in state.visible_rows(rows) {
            table.push(columns.iter().map(|c| c.format(row)).collect());
        }

        let mut widths = vec![0usize; columns.len()];
        for line in &table {
            for (width, cell) in widths.iter_mut().zip(line) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        output.push_str(title);
        output.push('\n');
        for line in &table {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            output.push_str(padded.join(" | ").trim_end());
            output.push('\n');
        }

        self.output = output;
        self.renders += 1;
    }
}
