use std::mem;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use engine_logging::{engine_info, engine_warn, LogDestination};
use log::LevelFilter;
use rowtrim_core::{update, AppState, CandidateFile, EntryPoint, LifecycleState, Msg};
use rowtrim_engine::{read_files, read_folder, FilePayload};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::render::{Renderer, TerminalReporter};
use crate::cli::Cli;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run_app(cli: Cli) -> Result<ExitCode> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    engine_logging::initialize(destination, level);

    let config = AppConfig::resolve(&cli)?;
    engine_info!(
        "Service {} output {}",
        config.server_url,
        config.output_dir.display()
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner =
        EffectRunner::new(config.engine_config(), msg_tx).context("failed to start engine")?;
    let mut session = Session::new(runner, Renderer::new(TerminalReporter), msg_rx);

    session.add_files(EntryPoint::Spreadsheets, read_files(&cli.spreadsheets)?);
    session.add_files(EntryPoint::Archives, read_files(&cli.archives)?);
    for dir in &cli.folders {
        let payloads = read_folder(dir, |name| EntryPoint::Folder.accepts_name(name))?;
        session.add_files(EntryPoint::Folder, payloads);
    }
    if let Some(rows) = &cli.rows {
        session.dispatch(Msg::RowsInputChanged(rows.clone()));
    }

    session.submit_and_settle(config.keep_remote)
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer<TerminalReporter>,
    msg_rx: mpsc::Receiver<Msg>,
}

impl Session {
    fn new(
        runner: EffectRunner,
        renderer: Renderer<TerminalReporter>,
        msg_rx: mpsc::Receiver<Msg>,
    ) -> Self {
        Self {
            state: AppState::new(),
            runner,
            renderer,
            msg_rx,
        }
    }

    /// Submits the form and waits for the job to settle. Unless `keep_remote`, an issued
    /// job is then cleared and its removal awaited. Succeeds only for a completed job.
    fn submit_and_settle(&mut self, keep_remote: bool) -> Result<ExitCode> {
        self.dispatch(Msg::SubmitClicked);
        self.run_until(|state| !state.is_busy())?;
        let completed = self.state.lifecycle().state() == LifecycleState::Complete;

        match self.state.lifecycle().job_id().cloned() {
            Some(job_id) if keep_remote => {
                engine_info!("Keeping job {} on the server", job_id);
            }
            Some(_) => self.dispatch(Msg::ClearClicked),
            None => {}
        }
        self.run_until(|state| !state.view().cleanup_pending)?;

        Ok(if completed {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = mem::take(&mut self.state);
        let (mut next, effects) = update(state, msg);
        if next.consume_dirty() {
            self.renderer.render(&next.view());
        }
        self.state = next;
        self.runner.enqueue(effects);
    }

    fn add_files(&mut self, entry_point: EntryPoint, payloads: Vec<FilePayload>) {
        if payloads.is_empty() {
            return;
        }
        let files = payloads
            .into_iter()
            .map(|payload| CandidateFile {
                name: payload.name,
                payload: payload.bytes,
            })
            .collect();
        self.dispatch(Msg::FilesAdded { entry_point, files });

        if let Some(stats) = self.state.view().last_add_stats {
            if stats.skipped > 0 {
                engine_warn!(
                    "Skipped {} file(s): unsupported extension or name already listed",
                    stats.skipped
                );
            }
        }
    }

    fn run_until(&mut self, done: impl Fn(&AppState) -> bool) -> Result<()> {
        while !done(&self.state) {
            self.runner.pump();
            match self.msg_rx.recv_timeout(POLL_INTERVAL) {
                Ok(msg) => self.dispatch(msg),
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => bail!("message channel closed"),
            }
        }
        Ok(())
    }
}
