//! Rowtrim engine: HTTP job pipeline and effect execution.
mod engine;
mod filename;
mod persist;
mod pipeline;
mod service;
mod source;
mod types;

pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use filename::archive_file_name;
pub use persist::{ensure_output_dir, ArchiveWriter, PersistError};
pub use pipeline::{ChannelProgressSink, JobPipeline, ProgressSink, StepFailure};
pub use service::{JobService, ReqwestJobService, ServiceSettings};
pub use source::{read_files, read_folder, SourceError};
pub use types::{
    ArchiveFile, EngineEvent, FailureKind, FilePayload, JobRequest, ProcessResult, RunId,
    ServiceError, Step,
};
