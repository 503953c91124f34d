use std::path::PathBuf;
use std::sync::Once;
use std::time::Duration;

use pretty_assertions::assert_eq;
use rowtrim_core::{
    update, AppState, CandidateFile, DownloadHandle, Effect, EntryPoint, JobId, LifecycleState,
    Msg, RunId, StatusColor, Step,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn with_files(state: AppState, names: &[&str]) -> AppState {
    let files = names
        .iter()
        .map(|name| CandidateFile::new(*name, name.as_bytes().to_vec()))
        .collect();
    let (state, effects) = update(
        state,
        Msg::FilesAdded {
            entry_point: EntryPoint::Spreadsheets,
            files,
        },
    );
    assert!(effects.is_empty());
    state
}

fn submit(state: AppState, rows: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::RowsInputChanged(rows.to_string()));
    update(state, Msg::SubmitClicked)
}

fn started_run(effects: &[Effect]) -> RunId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartJob(request) => Some(request.run_id),
            _ => None,
        })
        .expect("start job effect")
}

fn drive_to_complete(state: AppState, run_id: RunId) -> AppState {
    let steps = vec![
        Msg::StepStarted {
            run_id,
            step: Step::Upload,
        },
        Msg::Uploaded {
            run_id,
            job_id: JobId::new("J1"),
            elapsed: Duration::from_millis(12),
        },
        Msg::StepStarted {
            run_id,
            step: Step::Process,
        },
        Msg::Processed {
            run_id,
            locator: "/out/J1.zip".to_string(),
            elapsed: Duration::from_millis(30),
        },
        Msg::StepStarted {
            run_id,
            step: Step::Download,
        },
        Msg::Downloaded {
            run_id,
            handle: DownloadHandle {
                file_name: "J1.zip".to_string(),
                path: PathBuf::from("out/J1.zip"),
                byte_len: 4,
            },
            elapsed: Duration::from_millis(5),
        },
    ];
    steps.into_iter().fold(state, |state, msg| {
        let (next, effects) = update(state, msg);
        assert!(effects.is_empty());
        next
    })
}

#[test]
fn submit_with_empty_batch_issues_no_effects() {
    init_logging();
    let (state, effects) = submit(AppState::new(), "3");

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.lifecycle, LifecycleState::Idle);
    assert_eq!(view.status.color, StatusColor::Error);
    assert!(view.status.visible);
    assert_eq!(
        view.status.message,
        "Please select files and specify the number of rows to delete."
    );
}

#[test]
fn submit_without_row_count_issues_no_effects() {
    init_logging();
    let state = with_files(AppState::new(), &["a.xlsx"]);

    let (state, effects) = submit(state, "  ");
    assert!(effects.is_empty());
    assert_eq!(state.view().lifecycle, LifecycleState::Idle);

    let (state, effects) = submit(state, "abc");
    assert!(effects.is_empty());
    assert_eq!(state.view().status.color, StatusColor::Error);
}

#[test]
fn submit_snapshots_batch_and_row_count() {
    init_logging();
    let state = with_files(AppState::new(), &["a.xlsx", "b.xls"]);

    let (state, effects) = submit(state, "3");

    assert_eq!(effects.len(), 1);
    let Effect::StartJob(request) = &effects[0] else {
        panic!("expected StartJob, got {effects:?}");
    };
    assert_eq!(request.rows_to_delete, 3);
    let names: Vec<_> = request.files.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["a.xlsx", "b.xls"]);
    assert_eq!(state.view().lifecycle, LifecycleState::Uploading);
    assert!(state.is_busy());
}

#[test]
fn second_submit_while_in_flight_is_rejected() {
    init_logging();
    let state = with_files(AppState::new(), &["a.xlsx"]);
    let (state, _) = submit(state, "1");

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(state.view().lifecycle, LifecycleState::Uploading);
    assert_eq!(state.view().status.color, StatusColor::Error);
}

#[test]
fn successful_run_walks_every_state_and_keeps_job_id() {
    init_logging();
    let state = with_files(AppState::new(), &["a.xlsx", "b.xls"]);
    let (state, effects) = submit(state, "3");
    let run_id = started_run(&effects);

    let state = drive_to_complete(state, run_id);
    let view = state.view();

    assert_eq!(view.lifecycle, LifecycleState::Complete);
    assert_eq!(view.job_id, Some(JobId::new("J1")));
    assert_eq!(view.download.as_ref().map(|d| d.file_name.as_str()), Some("J1.zip"));
    assert_eq!(view.status.message, "Result ready: J1.zip (Took 5 ms)");
    assert_eq!(state.lifecycle().result_locator(), None);
    let timings = state.lifecycle().timings();
    assert_eq!(timings.upload, Some(Duration::from_millis(12)));
    assert_eq!(timings.process, Some(Duration::from_millis(30)));
    assert!(!state.is_busy());
}

#[test]
fn upload_status_reports_job_id_and_duration() {
    init_logging();
    let state = with_files(AppState::new(), &["a.xlsx"]);
    let (state, effects) = submit(state, "2");
    let run_id = started_run(&effects);

    let (state, _) = update(
        state,
        Msg::Uploaded {
            run_id,
            job_id: JobId::new("abc-123"),
            elapsed: Duration::from_millis(42),
        },
    );

    let view = state.view();
    assert_eq!(view.lifecycle, LifecycleState::Uploaded);
    assert_eq!(
        view.status.message,
        "Files uploaded successfully! Job ID: abc-123 (Took 42 ms)"
    );
}

#[test]
fn failure_moves_to_failed_with_error_status() {
    init_logging();
    let state = with_files(AppState::new(), &["a.xlsx"]);
    let (state, effects) = submit(state, "2");
    let run_id = started_run(&effects);

    let (state, effects) = update(
        state,
        Msg::StepFailed {
            run_id,
            step: Step::Upload,
            message: "connection refused".to_string(),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.lifecycle, LifecycleState::Failed);
    assert_eq!(view.status.color, StatusColor::Error);
    assert_eq!(view.failure.map(|f| f.step), Some(Step::Upload));
    assert_eq!(view.job_id, None);
}

#[test]
fn resubmit_after_failure_starts_new_run() {
    init_logging();
    let state = with_files(AppState::new(), &["a.xlsx"]);
    let (state, effects) = submit(state, "2");
    let first_run = started_run(&effects);
    let (state, _) = update(
        state,
        Msg::StepFailed {
            run_id: first_run,
            step: Step::Process,
            message: "500".to_string(),
        },
    );

    let (state, effects) = update(state, Msg::SubmitClicked);
    let second_run = started_run(&effects);

    assert_ne!(first_run, second_run);
    assert_eq!(state.view().lifecycle, LifecycleState::Uploading);
    assert_eq!(state.view().failure, None);
}

#[test]
fn resubmit_after_failure_removes_previous_job() {
    init_logging();
    let state = with_files(AppState::new(), &["a.xlsx"]);
    let (state, effects) = submit(state, "2");
    let first_run = started_run(&effects);
    let (state, _) = update(
        state,
        Msg::Uploaded {
            run_id: first_run,
            job_id: JobId::new("J7"),
            elapsed: Duration::from_millis(1),
        },
    );
    let (state, _) = update(
        state,
        Msg::StepFailed {
            run_id: first_run,
            step: Step::Download,
            message: "404".to_string(),
        },
    );

    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_ne!(started_run(&effects), first_run);
    assert!(effects.contains(&Effect::RemoveJob {
        job_id: JobId::new("J7")
    }));
    let view = state.view();
    assert_eq!(view.job_id, None);
    assert!(view.cleanup_pending);
}

#[test]
fn submit_after_complete_requires_clear() {
    init_logging();
    let state = with_files(AppState::new(), &["a.xlsx"]);
    let (state, effects) = submit(state, "2");
    let state = drive_to_complete(state, started_run(&effects));

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert_eq!(state.view().lifecycle, LifecycleState::Complete);
}

#[test]
fn files_can_be_removed_by_index() {
    init_logging();
    let state = with_files(AppState::new(), &["a.xlsx", "b.xlsx", "c.xlsx"]);

    let (mut state, _) = update(state, Msg::FileRemoved { index: 1 });
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.file_count, 2);
    assert_eq!(view.total_files_label, "Total 2 files");
    assert_eq!(view.files[1].name, "c.xlsx");

    let (mut state, _) = update(state, Msg::FileRemoved { index: 9 });
    assert!(!state.consume_dirty());
    assert_eq!(state.view().file_count, 2);
}

#[test]
fn add_stats_are_exposed_in_view() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::FilesAdded {
            entry_point: EntryPoint::Spreadsheets,
            files: vec![
                CandidateFile::new("dup.xlsx", vec![1]),
                CandidateFile::new("dup.xlsx", vec![2]),
                CandidateFile::new("notes.txt", vec![3]),
            ],
        },
    );

    let stats = state.view().last_add_stats.expect("stats");
    assert_eq!(stats.added, 1);
    assert_eq!(stats.skipped, 2);
    assert_eq!(state.view().file_count, 1);
}
