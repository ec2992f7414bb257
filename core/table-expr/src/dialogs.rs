//! FILENAME: core/table-expr/src/dialogs.rs
//! PURPOSE: Registry of open report dialogs.
//! CONTEXT: Every successful TABLE call opens one dialog that owns its
//! report until the host disposes it. The registry is shared between the
//! TABLE function and the host as `SharedDialogs`.

use crate::config::DialogOptions;
use crate::display::DisplaySurface;
use crate::logging::log_info;
use crate::report::{DisposalSummary, Report};
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};

pub type DialogId = u64;

/// Registry handle shared by the TABLE function and its host.
pub type SharedDialogs = Arc<Mutex<ReportDialogs>>;

/// One open presentation of a report.
#[derive(Debug)]
pub struct ReportDialog {
    pub id: DialogId,
    pub title: String,
    pub options: DialogOptions,
    report: Report,
}

impl ReportDialog {
    pub fn report(&self) -> &Report {
        &self.report
    }

    pub fn report_mut(&mut self) -> &mut Report {
        &mut self.report
    }
}

#[derive(Debug)]
pub struct ReportDialogs {
    dialogs: FxHashMap<DialogId, ReportDialog>,
    next_id: DialogId,
}

impl Default for ReportDialogs {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportDialogs {
    pub fn new() -> Self {
        ReportDialogs {
            dialogs: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Creates an empty registry behind a shared handle.
    pub fn shared() -> SharedDialogs {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Takes ownership of a report and opens a dialog titled with its name.
    pub fn open(&mut self, report: Report, options: DialogOptions) -> DialogId {
        let id = self.next_id;
        self.next_id += 1;

        log_info!(
            "DIALOG",
            "open id={} title='{}' {}x{} rows={}",
            id,
            report.name(),
            options.width,
            options.height,
            report.row_count()
        );

        self.dialogs.insert(
            id,
            ReportDialog {
                id,
                title: report.name().to_string(),
                options,
                report,
            },
        );
        id
    }

    pub fn get(&self, id: DialogId) -> Option<&ReportDialog> {
        self.dialogs.get(&id)
    }

    pub fn get_mut(&mut self, id: DialogId) -> Option<&mut ReportDialog> {
        self.dialogs.get_mut(&id)
    }

    /// Renders a dialog's report. `None` when the dialog is not open;
    /// otherwise whether this was the first render.
    pub fn render(&mut self, id: DialogId, surface: &mut dyn DisplaySurface) -> Option<bool> {
        self.dialogs
            .get_mut(&id)
            .map(|dialog| dialog.report.render(surface))
    }

    /// Closes a dialog and releases its report.
    pub fn dispose(&mut self, id: DialogId) -> Option<DisposalSummary> {
        let dialog = self.dialogs.remove(&id)?;
        log_info!("DIALOG", "dispose id={} title='{}'", id, dialog.title);
        Some(dialog.report.dispose())
    }

    /// Disposes every open dialog, oldest first.
    pub fn close_all(&mut self) -> Vec<(DialogId, DisposalSummary)> {
        self.ids()
            .into_iter()
            .filter_map(|id| self.dispose(id).map(|summary| (id, summary)))
            .collect()
    }

    /// Open dialog ids in opening order.
    pub fn ids(&self) -> Vec<DialogId> {
        let mut ids: Vec<DialogId> = self.dialogs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }
}
