use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::batch::{FileBatch, FileEntry};

/// Identifies one submission. Events carrying an older id are stale.
pub type RunId = u64;

/// Opaque job handle issued by the processing service on upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Uploading,
    Uploaded,
    Processing,
    Processed,
    Downloading,
    Complete,
    Failed,
}

impl LifecycleState {
    /// Submissions are only accepted when no job is running or pending a clear.
    pub fn accepts_submit(self) -> bool {
        matches!(self, LifecycleState::Idle | LifecycleState::Failed)
    }

    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            LifecycleState::Uploading
                | LifecycleState::Uploaded
                | LifecycleState::Processing
                | LifecycleState::Processed
                | LifecycleState::Downloading
        )
    }
}

/// A single HTTP round trip of the job pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Upload,
    Process,
    Download,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Upload => write!(f, "upload"),
            Step::Process => write!(f, "process"),
            Step::Download => write!(f, "download"),
        }
    }
}

/// The packaged result saved locally after a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadHandle {
    pub file_name: String,
    pub path: PathBuf,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureInfo {
    pub step: Step,
    pub message: String,
}

/// Wall-clock duration of each completed step in the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepTimings {
    pub upload: Option<Duration>,
    pub process: Option<Duration>,
    pub download: Option<Duration>,
}

/// Everything the engine needs to drive one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub run_id: RunId,
    pub files: Vec<FileEntry>,
    pub rows_to_delete: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A job is already in progress ({state:?}). Clear the form to start over.")]
    Busy { state: LifecycleState },
    #[error("Please select files and specify the number of rows to delete.")]
    MissingRowCount,
    #[error("Number of rows to delete must be a positive whole number, got '{0}'.")]
    InvalidRowCount(String),
    #[error("Please select files and specify the number of rows to delete.")]
    EmptyBatch,
}

/// Owns the single live job: its state, handle, timings and result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobLifecycle {
    state: LifecycleState,
    run_id: RunId,
    job_id: Option<JobId>,
    locator: Option<String>,
    download: Option<DownloadHandle>,
    failure: Option<FailureInfo>,
    timings: StepTimings,
}

impl JobLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }

    /// Archive locator from the process step, held until the download finishes.
    pub fn result_locator(&self) -> Option<&str> {
        self.locator.as_deref()
    }

    pub fn download(&self) -> Option<&DownloadHandle> {
        self.download.as_ref()
    }

    pub fn failure(&self) -> Option<&FailureInfo> {
        self.failure.as_ref()
    }

    pub fn timings(&self) -> StepTimings {
        self.timings
    }

    /// Validates a submission and, if accepted, moves to `Uploading` under a fresh run id.
    pub fn begin(
        &mut self,
        batch: &FileBatch,
        rows_input: &str,
    ) -> Result<SubmitRequest, ValidationError> {
        if !self.state.accepts_submit() {
            return Err(ValidationError::Busy { state: self.state });
        }
        let rows_to_delete = parse_row_count(rows_input)?;
        if batch.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }

        self.run_id += 1;
        self.state = LifecycleState::Uploading;
        self.job_id = None;
        self.locator = None;
        self.download = None;
        self.failure = None;
        self.timings = StepTimings::default();

        Ok(SubmitRequest {
            run_id: self.run_id,
            files: batch.snapshot().to_vec(),
            rows_to_delete,
        })
    }

    /// Records that the engine issued `step`. Returns false for stale or out-of-order events.
    pub fn step_started(&mut self, run_id: RunId, step: Step) -> bool {
        let (expected, next) = match step {
            Step::Upload => (LifecycleState::Uploading, LifecycleState::Uploading),
            Step::Process => (LifecycleState::Uploaded, LifecycleState::Processing),
            Step::Download => (LifecycleState::Processed, LifecycleState::Downloading),
        };
        if !self.is_current(run_id) || self.state != expected {
            return false;
        }
        self.state = next;
        true
    }

    pub fn record_upload(&mut self, run_id: RunId, job_id: JobId, elapsed: Duration) -> bool {
        if !self.is_current(run_id) || self.state != LifecycleState::Uploading {
            return false;
        }
        self.job_id = Some(job_id);
        self.timings.upload = Some(elapsed);
        self.state = LifecycleState::Uploaded;
        true
    }

    pub fn record_process(&mut self, run_id: RunId, locator: String, elapsed: Duration) -> bool {
        if !self.is_current(run_id)
            || !matches!(
                self.state,
                LifecycleState::Uploaded | LifecycleState::Processing
            )
        {
            return false;
        }
        self.locator = Some(locator);
        self.timings.process = Some(elapsed);
        self.state = LifecycleState::Processed;
        true
    }

    pub fn record_download(
        &mut self,
        run_id: RunId,
        handle: DownloadHandle,
        elapsed: Duration,
    ) -> bool {
        if !self.is_current(run_id)
            || !matches!(
                self.state,
                LifecycleState::Processed | LifecycleState::Downloading
            )
        {
            return false;
        }
        // The locator is only needed until the archive has been fetched.
        self.locator = None;
        self.download = Some(handle);
        self.timings.download = Some(elapsed);
        self.state = LifecycleState::Complete;
        true
    }

    pub fn record_failure(&mut self, run_id: RunId, step: Step, message: String) -> bool {
        if !self.is_current(run_id) || !self.state.is_in_flight() {
            return false;
        }
        self.locator = None;
        self.failure = Some(FailureInfo { step, message });
        self.state = LifecycleState::Failed;
        true
    }

    /// Returns to `Idle`, invalidating the current run. Yields the job id that
    /// should be removed server-side, if one was issued.
    pub fn reset(&mut self) -> Option<JobId> {
        let job_id = self.job_id.take();
        let next_run = self.run_id + 1;
        *self = Self {
            run_id: next_run,
            ..Self::default()
        };
        job_id
    }

    /// True for events of a run that was cleared or replaced by a later submit.
    pub fn is_superseded(&self, run_id: RunId) -> bool {
        run_id < self.run_id
    }

    fn is_current(&self, run_id: RunId) -> bool {
        self.run_id == run_id
    }
}

fn parse_row_count(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingRowCount);
    }
    match trimmed.parse::<u32>() {
        Ok(rows) if rows > 0 => Ok(rows),
        _ => Err(ValidationError::InvalidRowCount(trimmed.to_string())),
    }
}
