use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked files through one of the add entry points.
    FilesAdded {
        entry_point: crate::EntryPoint,
        files: Vec<crate::CandidateFile>,
    },
    /// User removed the file at `index` from the list.
    FileRemoved { index: usize },
    /// User edited the "rows to delete" input.
    RowsInputChanged(String),
    /// User submitted the form.
    SubmitClicked,
    /// User cleared the form.
    ClearClicked,
    /// Engine issued a pipeline step.
    StepStarted {
        run_id: crate::RunId,
        step: crate::Step,
    },
    /// Upload finished; the service assigned a job id.
    Uploaded {
        run_id: crate::RunId,
        job_id: crate::JobId,
        elapsed: Duration,
    },
    /// Processing finished; the result archive can be fetched from `locator`.
    Processed {
        run_id: crate::RunId,
        locator: String,
        elapsed: Duration,
    },
    /// Result archive was fetched and saved.
    Downloaded {
        run_id: crate::RunId,
        handle: crate::DownloadHandle,
        elapsed: Duration,
    },
    /// A pipeline step failed; the run is over.
    StepFailed {
        run_id: crate::RunId,
        step: crate::Step,
        message: String,
    },
    /// Best-effort server-side removal finished (either way).
    CleanupFinished { job_id: crate::JobId, succeeded: bool },
    /// Auto-hide timer for the status message fired.
    StatusHideElapsed { generation: u64 },
    /// Fallback for placeholder wiring.
    NoOp,
}
