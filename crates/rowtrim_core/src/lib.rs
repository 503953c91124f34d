//! Rowtrim core: pure job-lifecycle state machine and view-model helpers.
mod batch;
mod effect;
mod lifecycle;
mod msg;
mod state;
mod status;
mod update;
mod view_model;

pub use batch::{
    file_extension, AddStats, CandidateFile, EntryPoint, FileBatch, FileEntry,
    ARCHIVE_EXTENSIONS, SPREADSHEET_EXTENSIONS,
};
pub use effect::{Effect, STATUS_HIDE_DELAY};
pub use lifecycle::{
    DownloadHandle, FailureInfo, JobId, JobLifecycle, LifecycleState, RunId, Step, StepTimings,
    SubmitRequest, ValidationError,
};
pub use msg::Msg;
pub use state::AppState;
pub use status::{StatusColor, StatusLine, StatusReporter};
pub use update::update;
pub use view_model::{AppViewModel, FileRowView};
