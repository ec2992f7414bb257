//! FILENAME: core/table-expr/src/report.rs
//! PURPOSE: The assembled report and its lifecycle hooks.
//! CONTEXT: A report owns its name, columns and rows outright. The display
//! state is built on the first render and reused after that. Disposal tears
//! the parts down in a fixed order and reports what was released.

use crate::column::{ColumnDescriptor, ReportColumn};
use crate::display::{DisplayState, DisplaySurface, SortDirection};
use crate::logging::{log_debug, log_info};
use crate::record::Record;
use serde::Serialize;

/// What a disposed report released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisposalSummary {
    pub columns: usize,
    pub rows: usize,
    pub text_cells: usize,
    pub had_display_state: bool,
}

/// A named table of evaluated rows. The contents are fixed once assembled;
/// only the display state changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(skip)]
    display_state: Option<DisplayState>,
    name: String,
    columns: Vec<ReportColumn>,
    rows: Vec<Record>,
}

/// Combines the evaluated pieces into a report. No validation happens here.
pub fn assemble_report(name: String, columns: &[ColumnDescriptor<'_>], rows: Vec<Record>) -> Report {
    Report {
        display_state: None,
        name,
        columns: columns.iter().map(ColumnDescriptor::to_report_column).collect(),
        rows,
    }
}

impl Report {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ReportColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn display_state(&self) -> Option<&DisplayState> {
        self.display_state.as_ref()
    }

    /// Builds the display state unless it already exists.
    /// Returns true when it was created by this call.
    pub fn ensure_display_state(&mut self) -> bool {
        if self.display_state.is_some() {
            return false;
        }
        self.display_state = Some(DisplayState::new(&self.columns, self.rows.len()));
        log_debug!("REPORT", "display state built for '{}'", self.name);
        true
    }

    /// Hands the rows to a surface. Returns true on the first render.
    pub fn render(&mut self, surface: &mut dyn DisplaySurface) -> bool {
        let created = self.ensure_display_state();
        if let Some(state) = &self.display_state {
            surface.present(&self.name, state, &self.rows);
        }
        created
    }

    /// Sorts the displayed rows by one column, building the display state
    /// if needed. Returns false when the column does not exist.
    pub fn sort_by(&mut self, column: usize, direction: SortDirection) -> bool {
        self.ensure_display_state();
        match self.display_state.as_mut() {
            Some(state) => state.sort_by(&self.rows, column, direction),
            None => false,
        }
    }

    /// Restores report order in the display.
    pub fn clear_sort(&mut self) {
        if let Some(state) = self.display_state.as_mut() {
            state.clear_sort();
        }
    }

    /// Sets or clears the display's search filter.
    pub fn set_search_filter(&mut self, query: Option<&str>) {
        self.ensure_display_state();
        if let Some(state) = self.display_state.as_mut() {
            state.set_search_filter(query);
        }
    }

    /// Rows currently shown, in display order. Before the first render
    /// this is every row in report order.
    pub fn visible_rows(&self) -> Vec<&Record> {
        match &self.display_state {
            Some(state) => state.visible_rows(&self.rows),
            None => self.rows.iter().collect(),
        }
    }

    /// Serializes the report (without display state) to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Releases the report. Display state goes first, then columns, then
    /// rows, then the name.
    pub fn dispose(self) -> DisposalSummary {
        let Report {
            display_state,
            name,
            columns,
            rows,
        } = self;

        let summary = DisposalSummary {
            columns: columns.len(),
            rows: rows.len(),
            text_cells: rows.iter().map(Record::text_cell_count).sum(),
            had_display_state: display_state.is_some(),
        };

        drop(display_state);
        drop(columns);
        drop(rows);
        log_info!(
            "REPORT",
            "disposed '{}': {} columns, {} rows, {} text cells",
            name,
            summary.columns,
            summary.rows,
            summary.text_cells
        );
        drop(name);

        summary
    }
}
