use crate::view_model::{AppViewModel, FileRowView};
use crate::{
    AddStats, FileBatch, JobId, JobLifecycle, StatusColor, StatusLine, SubmitRequest,
    ValidationError,
};

/// The whole form: file batch, row-count input, job lifecycle and status line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    batch: FileBatch,
    rows_input: String,
    lifecycle: JobLifecycle,
    status: StatusLine,
    status_generation: u64,
    last_add_stats: Option<AddStats>,
    pending_cleanups: usize,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let files: Vec<FileRowView> = self
            .batch
            .snapshot()
            .iter()
            .enumerate()
            .map(|(index, entry)| FileRowView {
                index,
                name: entry.name().to_string(),
                extension: entry.extension().to_string(),
                bytes: entry.size(),
            })
            .collect();

        AppViewModel {
            file_count: files.len(),
            total_files_label: format!("Total {} files", files.len()),
            files,
            rows_input: self.rows_input.clone(),
            lifecycle: self.lifecycle.state(),
            job_id: self.lifecycle.job_id().cloned(),
            status: self.status.clone(),
            download: self.lifecycle.download().cloned(),
            failure: self.lifecycle.failure().cloned(),
            last_add_stats: self.last_add_stats,
            cleanup_pending: self.pending_cleanups > 0,
            dirty: self.dirty,
        }
    }

    pub fn batch(&self) -> &FileBatch {
        &self.batch
    }

    pub fn lifecycle(&self) -> &JobLifecycle {
        &self.lifecycle
    }

    /// True while a submitted job has not yet completed or failed.
    pub fn is_busy(&self) -> bool {
        self.lifecycle.state().is_in_flight()
    }

    /// Returns whether the view changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn batch_mut(&mut self) -> &mut FileBatch {
        &mut self.batch
    }

    pub(crate) fn lifecycle_mut(&mut self) -> &mut JobLifecycle {
        &mut self.lifecycle
    }

    /// Starts a run. Also yields the job id of a failed previous run, which the
    /// new run replaces.
    pub(crate) fn begin_submit(
        &mut self,
    ) -> Result<(SubmitRequest, Option<JobId>), ValidationError> {
        let replaced = self.lifecycle.job_id().cloned();
        let request = self.lifecycle.begin(&self.batch, &self.rows_input)?;
        Ok((request, replaced))
    }

    pub(crate) fn set_rows_input(&mut self, raw: String) {
        if self.rows_input != raw {
            self.rows_input = raw;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_last_add_stats(&mut self, stats: AddStats) {
        self.last_add_stats = Some(stats);
    }

    pub(crate) fn show_status(&mut self, message: impl Into<String>, color: StatusColor) {
        self.status = StatusLine::shown(message, color);
        self.status_generation += 1;
        self.mark_dirty();
    }

    /// Hides the status only if nothing was published since `generation`.
    pub(crate) fn hide_status(&mut self, generation: u64) {
        if generation == self.status_generation && self.status.visible {
            self.status = StatusLine::hidden();
            self.mark_dirty();
        }
    }

    pub(crate) fn status_generation(&self) -> u64 {
        self.status_generation
    }

    /// Clears every piece of form state except the status line and pending cleanups.
    pub(crate) fn reset_form(&mut self) -> Option<crate::JobId> {
        self.batch.clear();
        self.rows_input.clear();
        self.last_add_stats = None;
        self.mark_dirty();
        self.lifecycle.reset()
    }

    pub(crate) fn cleanup_started(&mut self) {
        self.pending_cleanups += 1;
    }

    pub(crate) fn cleanup_finished(&mut self) {
        self.pending_cleanups = self.pending_cleanups.saturating_sub(1);
        self.mark_dirty();
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
