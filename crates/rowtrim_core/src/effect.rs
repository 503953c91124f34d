use std::time::Duration;

/// How long the "Form cleared." message stays up.
pub const STATUS_HIDE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run upload, process and download for the given files.
    StartJob(crate::SubmitRequest),
    /// Delete server-side data for a job.
    RemoveJob { job_id: crate::JobId },
    /// Send `Msg::StatusHideElapsed { generation }` after `delay`.
    HideStatusAfter { generation: u64, delay: Duration },
}
