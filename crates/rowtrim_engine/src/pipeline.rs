use std::sync::mpsc;
use std::time::Instant;

use engine_logging::{engine_error, engine_info, engine_warn};

use crate::filename::archive_file_name;
use crate::{
    ArchiveFile, ArchiveWriter, EngineEvent, FailureKind, FilePayload, JobRequest, JobService,
    ProcessResult, RunId, ServiceError, Step,
};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The step that ended a run, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub step: Step,
    pub error: ServiceError,
}

/// Drives Upload -> Process -> Download strictly in order, stopping at the
/// first failed step.
pub struct JobPipeline<'a> {
    service: &'a dyn JobService,
    archives: &'a ArchiveWriter,
    sink: &'a dyn ProgressSink,
}

impl<'a> JobPipeline<'a> {
    pub fn new(
        service: &'a dyn JobService,
        archives: &'a ArchiveWriter,
        sink: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            service,
            archives,
            sink,
        }
    }

    /// Runs one job. Every outcome, including the failure, is also emitted to the sink.
    pub async fn run(&self, request: JobRequest) -> Result<ArchiveFile, StepFailure> {
        let run_id = request.run_id;
        let outcome = self.run_steps(request).await;
        if let Err(failure) = &outcome {
            engine_error!(
                "Run {} failed at {} step: {}",
                run_id,
                failure.step,
                failure.error
            );
            self.sink.emit(EngineEvent::JobFailed {
                run_id,
                step: failure.step,
                error: failure.error.clone(),
            });
        }
        outcome
    }

    async fn run_steps(&self, request: JobRequest) -> Result<ArchiveFile, StepFailure> {
        let JobRequest {
            run_id,
            files,
            rows_to_delete,
        } = request;
        let job_id = self.upload(run_id, &files).await?;
        let result = self.process(run_id, job_id, rows_to_delete).await?;
        self.download(run_id, result).await
    }

    async fn upload(&self, run_id: RunId, files: &[FilePayload]) -> Result<String, StepFailure> {
        self.start(run_id, Step::Upload);
        let started = Instant::now();
        let job_id = self
            .service
            .upload(files)
            .await
            .map_err(|error| fail(Step::Upload, error))?;
        let elapsed = started.elapsed();

        engine_info!(
            "Run {} uploaded {} files as job {} in {:?}",
            run_id,
            files.len(),
            job_id,
            elapsed
        );
        self.sink.emit(EngineEvent::Uploaded {
            run_id,
            job_id: job_id.clone(),
            elapsed,
        });
        Ok(job_id)
    }

    async fn process(
        &self,
        run_id: RunId,
        job_id: String,
        rows_to_delete: u32,
    ) -> Result<ProcessResult, StepFailure> {
        self.start(run_id, Step::Process);
        let started = Instant::now();
        let result = self
            .service
            .process(&job_id, rows_to_delete)
            .await
            .map_err(|error| fail(Step::Process, error))?;
        let elapsed = started.elapsed();

        if let Some(echoed) = result.job_id.as_deref() {
            if echoed != job_id {
                engine_warn!("Process response names job {} but {} was sent", echoed, job_id);
            }
        }
        engine_info!(
            "Run {} processed job {} in {:?} (server: {}, rows deleted: {:?}) -> {}",
            run_id,
            job_id,
            elapsed,
            result.time_taken.as_deref().unwrap_or("n/a"),
            result.num_rows_deleted,
            result.zip_file_name
        );
        self.sink.emit(EngineEvent::Processed {
            run_id,
            result: result.clone(),
            elapsed,
        });
        Ok(result)
    }

    async fn download(
        &self,
        run_id: RunId,
        result: ProcessResult,
    ) -> Result<ArchiveFile, StepFailure> {
        self.start(run_id, Step::Download);
        let started = Instant::now();
        let locator = result.zip_file_name;
        let bytes = self
            .service
            .download(&locator)
            .await
            .map_err(|error| fail(Step::Download, error))?;

        let file_name = archive_file_name(&locator);
        let archive = self.archives.write(&file_name, &bytes).map_err(|err| {
            fail(
                Step::Download,
                ServiceError::new(FailureKind::Io, err.to_string()),
            )
        })?;
        let elapsed = started.elapsed();

        engine_info!(
            "Run {} saved {} bytes to {:?} in {:?}",
            run_id,
            archive.byte_len,
            archive.path,
            elapsed
        );
        self.sink.emit(EngineEvent::Downloaded {
            run_id,
            archive: archive.clone(),
            elapsed,
        });
        Ok(archive)
    }

    fn start(&self, run_id: RunId, step: Step) {
        self.sink.emit(EngineEvent::StepStarted { run_id, step });
    }
}

fn fail(step: Step, error: ServiceError) -> StepFailure {
    StepFailure { step, error }
}
