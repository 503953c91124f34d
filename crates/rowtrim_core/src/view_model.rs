use crate::{AddStats, DownloadHandle, FailureInfo, JobId, LifecycleState, StatusLine};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub files: Vec<FileRowView>,
    pub file_count: usize,
    pub total_files_label: String,
    pub rows_input: String,
    pub lifecycle: LifecycleState,
    pub job_id: Option<JobId>,
    pub status: StatusLine,
    pub download: Option<DownloadHandle>,
    pub failure: Option<FailureInfo>,
    pub last_add_stats: Option<AddStats>,
    pub cleanup_pending: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRowView {
    pub index: usize,
    pub name: String,
    pub extension: String,
    pub bytes: u64,
}
