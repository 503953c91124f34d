use std::sync::mpsc;
use std::thread;

use engine_logging::engine_info;
use rowtrim_core::{DownloadHandle, Effect, JobId, Msg, Step, SubmitRequest};
use rowtrim_engine::{EngineConfig, EngineError, EngineEvent, EngineHandle, FilePayload, JobRequest};

/// Executes core effects against the engine and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(config)?;
        Ok(Self::with_engine(engine, msg_tx))
    }

    pub fn with_engine(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self { engine, msg_tx }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartJob(request) => {
                    engine_info!(
                        "StartJob run_id={} files={} rows_to_delete={}",
                        request.run_id,
                        request.files.len(),
                        request.rows_to_delete
                    );
                    self.engine.run_job(map_request(request));
                }
                Effect::RemoveJob { job_id } => {
                    engine_info!("RemoveJob job_id={}", job_id);
                    self.engine.remove_job(job_id.as_str());
                }
                Effect::HideStatusAfter { generation, delay } => {
                    let msg_tx = self.msg_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(delay);
                        let _ = msg_tx.send(Msg::StatusHideElapsed { generation });
                    });
                }
            }
        }
    }

    /// Forwards every engine event received so far onto the message channel.
    pub fn pump(&self) {
        while let Some(event) = self.engine.try_recv() {
            let _ = self.msg_tx.send(map_event(event));
        }
    }
}

fn map_request(request: SubmitRequest) -> JobRequest {
    JobRequest {
        run_id: request.run_id,
        files: request
            .files
            .iter()
            .map(|entry| FilePayload {
                name: entry.name().to_string(),
                bytes: entry.payload().to_vec(),
            })
            .collect(),
        rows_to_delete: request.rows_to_delete,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StepStarted { run_id, step } => Msg::StepStarted {
            run_id,
            step: map_step(step),
        },
        EngineEvent::Uploaded {
            run_id,
            job_id,
            elapsed,
        } => Msg::Uploaded {
            run_id,
            job_id: JobId::new(job_id),
            elapsed,
        },
        EngineEvent::Processed {
            run_id,
            result,
            elapsed,
        } => Msg::Processed {
            run_id,
            locator: result.zip_file_name,
            elapsed,
        },
        EngineEvent::Downloaded {
            run_id,
            archive,
            elapsed,
        } => Msg::Downloaded {
            run_id,
            handle: DownloadHandle {
                file_name: archive.file_name,
                path: archive.path,
                byte_len: archive.byte_len,
            },
            elapsed,
        },
        EngineEvent::JobFailed {
            run_id,
            step,
            error,
        } => Msg::StepFailed {
            run_id,
            step: map_step(step),
            message: error.to_string(),
        },
        EngineEvent::RemoveCompleted { job_id, result } => Msg::CleanupFinished {
            job_id: JobId::new(job_id),
            succeeded: result.is_ok(),
        },
    }
}

fn map_step(step: rowtrim_engine::Step) -> Step {
    match step {
        rowtrim_engine::Step::Upload => Step::Upload,
        rowtrim_engine::Step::Process => Step::Process,
        rowtrim_engine::Step::Download => Step::Download,
    }
}
