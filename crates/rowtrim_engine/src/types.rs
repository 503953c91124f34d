use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub type RunId = u64;

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

/// A named blob as sent in the multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub run_id: RunId,
    pub files: Vec<FilePayload>,
    pub rows_to_delete: u32,
}

/// Body of a successful `/process` response. Only the archive locator is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessResult {
    pub zip_file_name: String,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub time_taken: Option<String>,
    #[serde(default)]
    pub num_rows_deleted: Option<u64>,
}

/// The downloaded result archive as written to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub file_name: String,
    pub path: PathBuf,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StepStarted {
        run_id: RunId,
        step: Step,
    },
    Uploaded {
        run_id: RunId,
        job_id: String,
        elapsed: Duration,
    },
    Processed {
        run_id: RunId,
        result: ProcessResult,
        elapsed: Duration,
    },
    Downloaded {
        run_id: RunId,
        archive: ArchiveFile,
        elapsed: Duration,
    },
    JobFailed {
        run_id: RunId,
        step: Step,
        error: ServiceError,
    },
    RemoveCompleted {
        job_id: String,
        result: Result<String, ServiceError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    InvalidResponse,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Io,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Io => write!(f, "io error"),
        }
    }
}
