use crate::{AppState, Effect, Msg, StatusColor, STATUS_HIDE_DELAY};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesAdded { entry_point, files } => {
            let stats = state.batch_mut().add_from(entry_point, files);
            state.set_last_add_stats(stats);
            state.mark_dirty();
            Vec::new()
        }
        Msg::FileRemoved { index } => {
            if state.batch_mut().remove(index).is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RowsInputChanged(raw) => {
            state.set_rows_input(raw);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::ClearClicked => clear(&mut state),
        Msg::StepStarted { run_id, step } => {
            if state.lifecycle_mut().step_started(run_id, step) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Uploaded {
            run_id,
            job_id,
            elapsed,
        } => {
            let message = format!(
                "Files uploaded successfully! Job ID: {} (Took {} ms)",
                job_id,
                elapsed.as_millis()
            );
            if state.lifecycle().is_superseded(run_id) {
                // The run was cleared before its upload answered; nothing else owns this job.
                state.cleanup_started();
                vec![Effect::RemoveJob { job_id }]
            } else {
                if state.lifecycle_mut().record_upload(run_id, job_id, elapsed) {
                    state.show_status(message, StatusColor::Neutral);
                }
                Vec::new()
            }
        }
        Msg::Processed {
            run_id,
            locator,
            elapsed,
        } => {
            if state.lifecycle_mut().record_process(run_id, locator, elapsed) {
                let job_id = state
                    .lifecycle()
                    .job_id()
                    .map(ToString::to_string)
                    .unwrap_or_default();
                state.show_status(
                    format!(
                        "Processing completed successfully! Job ID: {} (Took {} ms)",
                        job_id,
                        elapsed.as_millis()
                    ),
                    StatusColor::Neutral,
                );
            }
            Vec::new()
        }
        Msg::Downloaded {
            run_id,
            handle,
            elapsed,
        } => {
            let message = format!(
                "Result ready: {} (Took {} ms)",
                handle.file_name,
                elapsed.as_millis()
            );
            if state.lifecycle_mut().record_download(run_id, handle, elapsed) {
                state.show_status(message, StatusColor::Neutral);
            }
            Vec::new()
        }
        Msg::StepFailed {
            run_id,
            step,
            message,
        } => {
            if state.lifecycle_mut().record_failure(run_id, step, message) {
                state.show_status(
                    format!("Failed to process files ({step} step failed). Please try again."),
                    StatusColor::Error,
                );
            }
            Vec::new()
        }
        Msg::CleanupFinished { .. } => {
            state.cleanup_finished();
            Vec::new()
        }
        Msg::StatusHideElapsed { generation } => {
            state.hide_status(generation);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    match state.begin_submit() {
        Ok((request, replaced)) => {
            state.show_status(
                format!("Uploading {} files...", request.files.len()),
                StatusColor::Neutral,
            );
            let mut effects = vec![Effect::StartJob(request)];
            if let Some(job_id) = replaced {
                state.cleanup_started();
                effects.push(Effect::RemoveJob { job_id });
            }
            effects
        }
        Err(err) => {
            state.show_status(err.to_string(), StatusColor::Error);
            Vec::new()
        }
    }
}

fn clear(state: &mut AppState) -> Vec<Effect> {
    // Local state is reset before, and regardless of, the remote removal.
    let job_id = state.reset_form();
    state.show_status("Form cleared.", StatusColor::Neutral);

    let mut effects = Vec::with_capacity(2);
    effects.push(Effect::HideStatusAfter {
        generation: state.status_generation(),
        delay: STATUS_HIDE_DELAY,
    });
    if let Some(job_id) = job_id {
        state.cleanup_started();
        effects.push(Effect::RemoveJob { job_id });
    }
    effects
}
