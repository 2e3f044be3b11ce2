// nextpix-core/tests/batch_worker_tests.rs

use nextpix_core::config::{CoreConfig, ToolPaths};
use nextpix_core::encoding::{
    AvifencParams, CjxlParams, HeifEncParams, ParameterSet,
};
use nextpix_core::events::{CallbackEventHandler, Event, EventDispatcher};
use nextpix_core::external::mocks::MockProcessRunner;
use nextpix_core::processing::{BatchWorker, CancellationToken, FileFailure, JobOutcome};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

// Helper to create a dummy source image with some content
fn create_dummy_file(dir: &Path, filename: &str) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, vec![0u8; 2048]).expect("Failed to write dummy image");
    file_path
}

// Executable stand-in for exiftool; only its presence on disk matters.
#[cfg(unix)]
fn create_fake_tool(dir: &Path, filename: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let tool = dir.join(filename);
    fs::write(&tool, b"#!/bin/sh\n").expect("Failed to write fake tool");
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).expect("Failed to chmod");
    tool
}

fn config(encoder: &str, metadata_tool: Option<PathBuf>) -> CoreConfig {
    CoreConfig::new(ToolPaths {
        encoder: PathBuf::from(encoder),
        metadata_tool,
    })
}

// Dispatcher that records every event, plus the shared record.
fn recording_dispatcher() -> (EventDispatcher, Arc<Mutex<Vec<Event>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = Arc::clone(&events);
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_handler(Arc::new(CallbackEventHandler::new(move |e: &Event| {
        events_clone.lock().unwrap().push(e.clone());
    })));
    (dispatcher, events)
}

fn progress_values(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Progress { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect()
}

fn file_outcomes(events: &[Event]) -> Vec<JobOutcome> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::FileLog(report) => Some(report.outcome.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_three_files_all_succeed() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let files: Vec<PathBuf> = ["photo1.png", "photo2.png", "photo3.png"]
        .iter()
        .map(|name| create_dummy_file(dir.path(), name))
        .collect();

    let runner = MockProcessRunner::new();
    for file in &files {
        let name = file.file_name().unwrap().to_string_lossy().into_owned();
        runner.expect_success_creating(&name, file.with_extension("avif"), b"avif-bytes");
    }

    let worker = BatchWorker::new(runner.clone(), config("avifenc", None));
    let params = ParameterSet::Avifenc(AvifencParams::default());
    let (dispatcher, events) = recording_dispatcher();

    let result = worker.run_batch(&files, &params, &CancellationToken::new(), &dispatcher);

    assert_eq!(result.total_files, 3);
    assert_eq!(result.success_count, 3);
    assert!(result.failures.is_empty());
    assert!(result.all_succeeded());
    assert_eq!(result.total_input_bytes, 3 * 2048);
    assert_eq!(result.total_output_bytes, 3 * 10);

    let events = events.lock().unwrap();
    assert_eq!(progress_values(&events), vec![34, 67, 100]);
    assert!(matches!(
        events.first(),
        Some(Event::Status { message }) if message == "Processing 1/3: photo1.png"
    ));
    assert!(matches!(events.last(), Some(Event::Summary(summary)) if *summary == result));

    let calls = runner.received_calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.program == Path::new("avifenc")));
    assert_eq!(runner.pending_expectations(), 0);
    Ok(())
}

#[test]
fn test_failure_does_not_stop_batch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file1 = create_dummy_file(dir.path(), "file1.jpg");
    let file2 = create_dummy_file(dir.path(), "file2.jpg");

    let runner = MockProcessRunner::new();
    runner.expect_exit("file1.jpg", 1, "invalid quality\n");
    runner.expect_success_creating("file2.jpg", dir.path().join("file2.jxl"), b"jxl");

    let worker = BatchWorker::new(runner, config("cjxl", None));
    let params = ParameterSet::Cjxl(CjxlParams::default());
    let (dispatcher, events) = recording_dispatcher();

    let result = worker.run_batch(
        &[file1, file2],
        &params,
        &CancellationToken::new(),
        &dispatcher,
    );

    assert_eq!(result.success_count, 1);
    assert_eq!(
        result.failures,
        vec![FileFailure {
            filename: "file1.jpg".to_string(),
            message: "invalid quality".to_string(),
        }]
    );
    assert_eq!(result.success_count + result.failure_count(), result.total_files);

    let events = events.lock().unwrap();
    assert_eq!(progress_values(&events), vec![50, 100]);
    assert_eq!(
        file_outcomes(&events),
        vec![
            JobOutcome::EncodeFailed("invalid quality".to_string()),
            JobOutcome::Success
        ]
    );
    Ok(())
}

#[test]
fn test_cancellation_lets_in_flight_job_finish() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let files: Vec<PathBuf> = (1..=5)
        .map(|i| create_dummy_file(dir.path(), &format!("img{i}.png")))
        .collect();

    // Only the first two encodes may run; a third call would panic the mock.
    let runner = MockProcessRunner::new();
    for file in &files[..2] {
        let name = file.file_name().unwrap().to_string_lossy().into_owned();
        runner.expect_success_creating(&name, file.with_extension("jxl"), b"jxl");
    }

    let cancel = CancellationToken::new();
    let cancel_in_handler = cancel.clone();
    let (mut dispatcher, events) = recording_dispatcher();
    dispatcher.add_handler(Arc::new(CallbackEventHandler::new(move |e: &Event| {
        if let Event::Status { message } = e {
            if message.starts_with("Processing 2/5") {
                cancel_in_handler.cancel();
            }
        }
    })));

    let worker = BatchWorker::new(runner, config("cjxl", None));
    let params = ParameterSet::Cjxl(CjxlParams::default());
    let result = worker.run_batch(&files, &params, &cancel, &dispatcher);

    assert!(result.cancelled);
    assert_eq!(result.processed, 2);
    assert_eq!(result.skipped, 3);
    assert_eq!(result.success_count, 2);
    assert!(!result.all_succeeded());

    let events = events.lock().unwrap();
    assert_eq!(progress_values(&events), vec![20, 40]);
    assert!(matches!(events.last(), Some(Event::Summary(s)) if s.cancelled));
    Ok(())
}

#[test]
fn test_empty_metadata_tool_never_invokes_metadata() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = create_dummy_file(dir.path(), "scan.tiff");

    let runner = MockProcessRunner::new();
    runner.expect_success_creating("scan.tiff", dir.path().join("scan.heic"), b"heic");

    let worker = BatchWorker::new(runner.clone(), config("heif-enc", Some(PathBuf::new())));
    let params = ParameterSet::HeifEnc(HeifEncParams::default());
    let (dispatcher, events) = recording_dispatcher();

    let result = worker.run_batch(&[file], &params, &CancellationToken::new(), &dispatcher);

    assert_eq!(result.success_count, 1);
    assert!(result.warnings.is_empty());
    assert_eq!(runner.received_calls().len(), 1);
    assert!(runner.calls_to("exiftool").is_empty());
    assert_eq!(file_outcomes(&events.lock().unwrap()), vec![JobOutcome::Success]);
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_metadata_copy_runs_after_encode() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let tool = create_fake_tool(dir.path(), "exiftool");
    let file = create_dummy_file(dir.path(), "party.jpg");
    let output = dir.path().join("party.avif");

    let runner = MockProcessRunner::new();
    runner.expect_success_creating("party.jpg", &output, b"avif");
    runner.expect_success("-tagsFromFile", "    1 image files updated", "");

    let worker = BatchWorker::new(runner.clone(), config("avifenc", Some(tool)));
    let params = ParameterSet::Avifenc(AvifencParams::default());
    let result = worker.run_batch(
        &[file.clone()],
        &params,
        &CancellationToken::new(),
        &EventDispatcher::new(),
    );

    assert_eq!(result.success_count, 1);
    assert!(result.warnings.is_empty());

    let metadata_calls = runner.calls_to("exiftool");
    assert_eq!(metadata_calls.len(), 1);
    assert_eq!(metadata_calls[0].args[1], file.as_os_str());
    assert_eq!(metadata_calls[0].args[4], output.as_os_str());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_metadata_failure_counts_as_success_with_warning()
-> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let tool = create_fake_tool(dir.path(), "exiftool");
    let file = create_dummy_file(dir.path(), "party.jpg");

    let runner = MockProcessRunner::new();
    runner.expect_success_creating("party.jpg", dir.path().join("party.jxl"), b"jxl");
    runner.expect_exit("-tagsFromFile", 1, "Error: Not a valid JXL");

    let worker = BatchWorker::new(runner, config("cjxl", Some(tool)));
    let params = ParameterSet::Cjxl(CjxlParams::default());
    let (dispatcher, events) = recording_dispatcher();
    let result = worker.run_batch(&[file], &params, &CancellationToken::new(), &dispatcher);

    assert_eq!(result.success_count, 1);
    assert!(result.failures.is_empty());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].message, "Error: Not a valid JXL");
    assert_eq!(
        file_outcomes(&events.lock().unwrap()),
        vec![JobOutcome::MetadataFailed("Error: Not a valid JXL".to_string())]
    );
    Ok(())
}

#[test]
fn test_missing_or_empty_output_is_system_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let silent = create_dummy_file(dir.path(), "silent.png");
    let empty = create_dummy_file(dir.path(), "empty.png");

    let runner = MockProcessRunner::new();
    runner.expect_success("silent.png", "", "");
    runner.expect_success_creating("empty.png", dir.path().join("empty.avif"), b"");

    let worker = BatchWorker::new(runner, config("ffmpeg", None));
    let params = ParameterSet::FfmpegAvif(Default::default());
    let (dispatcher, events) = recording_dispatcher();
    let result = worker.run_batch(
        &[silent, empty],
        &params,
        &CancellationToken::new(),
        &dispatcher,
    );

    assert_eq!(result.success_count, 0);
    assert_eq!(result.failure_count(), 2);
    let outcomes = file_outcomes(&events.lock().unwrap());
    assert!(outcomes.iter().all(|o| matches!(
        o,
        JobOutcome::SystemError(msg) if msg.contains("produced no output")
    )));
    Ok(())
}

#[test]
fn test_stale_output_does_not_count_as_encoder_output() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = create_dummy_file(dir.path(), "a.png");
    let stale = dir.path().join("a.jxl");
    fs::write(&stale, b"stale from last run")?;

    // Exit 0 without writing anything.
    let runner = MockProcessRunner::new();
    runner.expect_success("a.png", "", "");

    let worker = BatchWorker::new(runner, config("cjxl", None));
    let params = ParameterSet::Cjxl(CjxlParams::default());
    let result = worker.run_batch(
        &[file],
        &params,
        &CancellationToken::new(),
        &EventDispatcher::new(),
    );

    assert_eq!(result.success_count, 0);
    assert_eq!(result.failure_count(), 1);
    assert!(result.failures[0].message.contains("produced no output"));
    assert!(!stale.exists());
    Ok(())
}

#[test]
fn test_invalid_job_paths_are_system_errors() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let already_avif = create_dummy_file(dir.path(), "done.avif");
    let upper_case_avif = create_dummy_file(dir.path(), "SHOT.AVIF");
    let missing = dir.path().join("gone.png");

    // No expectations: any process call would panic.
    let runner = MockProcessRunner::new();
    let worker = BatchWorker::new(runner.clone(), config("avifenc", None));
    let params = ParameterSet::Avifenc(AvifencParams::default());
    let (dispatcher, events) = recording_dispatcher();
    let result = worker.run_batch(
        &[missing, already_avif, upper_case_avif.clone()],
        &params,
        &CancellationToken::new(),
        &dispatcher,
    );

    assert_eq!(result.failure_count(), 3);
    assert!(result.failures[0].message.contains("Source file not found"));
    assert!(result.failures[1].message.contains("same as the source"));
    assert_eq!(result.failures[2].filename, "SHOT.AVIF");
    assert!(result.failures[2].message.contains("same as the source"));
    assert!(runner.received_calls().is_empty());
    assert_eq!(fs::read(&upper_case_avif)?.len(), 2048);
    assert_eq!(progress_values(&events.lock().unwrap()), vec![34, 67, 100]);
    Ok(())
}

#[test]
fn test_encoder_launch_failure_is_system_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = create_dummy_file(dir.path(), "a.bmp");

    let runner = MockProcessRunner::new();
    runner.expect_spawn_error("a.bmp", ErrorKind::NotFound);

    let worker = BatchWorker::new(runner, config("/opt/missing/cjxl", None));
    let params = ParameterSet::Cjxl(CjxlParams::default());
    let result = worker.run_batch(
        &[file],
        &params,
        &CancellationToken::new(),
        &EventDispatcher::new(),
    );

    assert_eq!(result.failure_count(), 1);
    assert!(result.failures[0].message.contains("Failed to start 'cjxl'"));
    Ok(())
}

#[test]
fn test_lossless_heif_command_reaches_encoder() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file = create_dummy_file(dir.path(), "raw.png");

    let runner = MockProcessRunner::new();
    runner.expect_success_creating("raw.png", dir.path().join("raw.heic"), b"heic");

    let worker = BatchWorker::new(runner.clone(), config("/usr/local/bin/heif-enc", None));
    let params = ParameterSet::HeifEnc(HeifEncParams {
        lossless: true,
        ..Default::default()
    });
    worker.run_batch(
        &[file],
        &params,
        &CancellationToken::new(),
        &EventDispatcher::new(),
    );

    let calls = runner.received_calls();
    assert_eq!(calls[0].program, PathBuf::from("/usr/local/bin/heif-enc"));
    let args: Vec<String> = calls[0]
        .args
        .iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert!(args.contains(&"-L".to_string()));
    assert!(!args.iter().any(|a| a == "-q" || a == "-p"));
    Ok(())
}

#[test]
fn test_empty_input_completes_without_progress() {
    let worker = BatchWorker::new(MockProcessRunner::new(), config("avifenc", None));
    let params = ParameterSet::Avifenc(AvifencParams::default());
    let (dispatcher, events) = recording_dispatcher();

    let result = worker.run_batch(&[], &params, &CancellationToken::new(), &dispatcher);

    assert_eq!(result.total_files, 0);
    assert_eq!(result.processed, 0);
    let events = events.lock().unwrap();
    assert!(progress_values(&events).is_empty());
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Event::Summary(_)));
}
