use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use thiserror::Error;

use crate::pipeline::{ChannelProgressSink, JobPipeline};
use crate::service::{JobService, ReqwestJobService, ServiceSettings};
use crate::{ArchiveWriter, EngineEvent, JobRequest, ServiceError};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub service: ServiceSettings,
    pub output_dir: PathBuf,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            service: ServiceSettings::default(),
            output_dir,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error("invalid service settings: {0}")]
    Service(#[from] ServiceError),
}

enum EngineCommand {
    Run(JobRequest),
    Remove { job_id: String },
}

/// Runs jobs on a background thread; results come back as `EngineEvent`s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let service = ReqwestJobService::new(config.service)?;
        Self::with_service(Arc::new(service), ArchiveWriter::new(config.output_dir))
    }

    /// Builds an engine around any `JobService` implementation.
    pub fn with_service(
        service: Arc<dyn JobService>,
        archives: ArchiveWriter,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let archives = Arc::new(archives);

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let service = service.clone();
                let archives = archives.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(service.as_ref(), archives.as_ref(), command, event_tx).await;
                });
            }
            engine_info!("Engine command channel closed; shutting down");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn run_job(&self, request: JobRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Run(request));
    }

    pub fn remove_job(&self, job_id: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Remove {
            job_id: job_id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    service: &dyn JobService,
    archives: &ArchiveWriter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Run(request) => {
            let sink = ChannelProgressSink::new(event_tx);
            // Outcomes reach the owner through the sink.
            let _ = JobPipeline::new(service, archives, &sink).run(request).await;
        }
        EngineCommand::Remove { job_id } => {
            let result = service.remove(&job_id).await;
            match &result {
                Ok(ack) => engine_info!("Job {} removed: {}", job_id, ack),
                Err(err) => engine_warn!("Removing job {} failed: {}", job_id, err),
            }
            let _ = event_tx.send(EngineEvent::RemoveCompleted { job_id, result });
        }
    }
}
