// ============================================================================
// nextpix-core/src/processing/batch.rs
// ============================================================================
//
// BATCH CONVERSION WORKER: Sequential, Cancellable Image Conversion
//
// The worker walks the input list in order and, for every file:
//
// 1. Checks the cancellation token (the in-flight job always finishes)
// 2. Emits a Status event "Processing i/total: name"
// 3. Validates the job paths (source exists, output differs from source)
// 4. Removes any output left by an earlier run, then builds and runs the
//    encoder command
// 5. Verifies the encoder wrote a non-empty output file
// 6. Optionally copies metadata onto the output
// 7. Records the outcome and emits FileLog followed by Progress
//
// No job failure stops the loop. The batch always ends with a Summary event
// carrying the BatchResult, which is also returned to the caller.
//
// `spawn_batch` runs the same loop on a dedicated thread and exposes the
// events through an mpsc channel.

use super::cancel::CancellationToken;
use super::job::{BatchResult, EncodeJob, JobOutcome};
use crate::config::CoreConfig;
use crate::encoding::ParameterSet;
use crate::error::{CoreError, CoreResult};
use crate::events::{ChannelEventHandler, Event, EventDispatcher, FileReport};
use crate::external::{
    FileMetadataProvider, ProcessRunner, StdFsMetadataProvider, ToolCommand, ToolStatus, run_tool,
};
use crate::metadata::{MetadataOutcome, copy_metadata};

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

/// Percentage of the batch completed after `completed` of `total` jobs,
/// rounded up so that the first file never reports 0.
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let completed = completed.min(total);
    (completed * 100).div_ceil(total) as u8
}

fn remove_stale_output(output: &Path) -> io::Result<()> {
    match fs::remove_file(output) {
        Ok(()) => {
            log::debug!("Removed existing output {}", output.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Outcome of one job plus the sizes observed along the way.
#[derive(Debug, Clone)]
struct JobReport {
    outcome: JobOutcome,
    input_size: Option<u64>,
    output_size: Option<u64>,
}

impl JobReport {
    fn system_error(message: String, input_size: Option<u64>) -> Self {
        Self {
            outcome: JobOutcome::SystemError(message),
            input_size,
            output_size: None,
        }
    }
}

/// Runs conversion batches with one encoder configuration.
///
/// `R` executes the encoder and metadata tool; `M` reads file sizes. Both are
/// traits so the worker can be driven by test doubles.
pub struct BatchWorker<R: ProcessRunner, M: FileMetadataProvider = StdFsMetadataProvider> {
    runner: R,
    metadata_provider: M,
    config: CoreConfig,
}

impl<R: ProcessRunner> BatchWorker<R> {
    pub fn new(runner: R, config: CoreConfig) -> Self {
        Self::with_metadata_provider(runner, StdFsMetadataProvider, config)
    }
}

impl<R: ProcessRunner, M: FileMetadataProvider> BatchWorker<R, M> {
    pub fn with_metadata_provider(runner: R, metadata_provider: M, config: CoreConfig) -> Self {
        Self {
            runner,
            metadata_provider,
            config,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Converts `files` in order on the calling thread.
    ///
    /// `params` must already be validated. Events are emitted through
    /// `events` as the batch progresses.
    pub fn run_batch(
        &self,
        files: &[PathBuf],
        params: &ParameterSet,
        cancel: &CancellationToken,
        events: &EventDispatcher,
    ) -> BatchResult {
        let total = files.len();
        let mut result = BatchResult::new(total);
        let copy_metadata = self.config.effective_metadata_tool().is_some();

        log::info!(
            "Starting batch: {} file(s) with {}",
            total,
            params.kind()
        );

        for (i, source) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                result.cancelled = true;
                result.skipped = total - i;
                log::info!("Batch cancelled, {} file(s) not started", result.skipped);
                events.emit(Event::Status {
                    message: format!("Cancelled after {}/{}", i, total),
                });
                break;
            }

            let job = EncodeJob::new(i + 1, total, source, params, copy_metadata);
            let filename = job.filename();

            events.emit(Event::Status {
                message: format!("Processing {}/{}: {}", job.index, total, filename),
            });
            log::info!("Processing {}/{}: {}", job.index, total, filename);

            let report = self.process_job(&job);
            match &report.outcome {
                JobOutcome::Success => log::info!("Converted {}", filename),
                JobOutcome::MetadataFailed(msg) => {
                    log::warn!("Converted {} but metadata copy failed: {}", filename, msg)
                }
                JobOutcome::EncodeFailed(msg) => {
                    log::warn!("Encoding {} failed: {}", filename, msg)
                }
                JobOutcome::SystemError(msg) => {
                    log::warn!("Could not convert {}: {}", filename, msg)
                }
            }

            result.record(
                &filename,
                &report.outcome,
                report.input_size,
                report.output_size,
            );

            events.emit(Event::FileLog(FileReport {
                index: job.index,
                total,
                filename,
                output_path: job.output.display().to_string(),
                outcome: report.outcome,
                input_size: report.input_size,
                output_size: report.output_size,
            }));
            events.emit(Event::Progress {
                percent: progress_percent(job.index, total),
                completed: job.index,
                total,
            });
        }

        log::info!(
            "Batch finished: {} succeeded, {} failed",
            result.success_count,
            result.failure_count()
        );
        events.emit(Event::Summary(result.clone()));
        result
    }

    fn process_job(&self, job: &EncodeJob<'_>) -> JobReport {
        if !job.source.is_file() {
            return JobReport::system_error(
                format!("Source file not found: {}", job.source.display()),
                None,
            );
        }
        // Case-insensitive filesystems treat X.AVIF and X.avif as one file.
        let target_ext = job.params.kind().extension();
        let same_format = job
            .source
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(target_ext));
        if job.output == job.source || same_format {
            return JobReport::system_error(
                format!(
                    "Output path is the same as the source: {}",
                    job.output.display()
                ),
                None,
            );
        }

        let input_size = match self.metadata_provider.get_size(&job.source) {
            Ok(size) => Some(size),
            Err(e) => return JobReport::system_error(e.to_string(), None),
        };

        // A leftover output from an earlier run would pass the check below
        // even if the encoder writes nothing.
        if let Err(e) = remove_stale_output(&job.output) {
            return JobReport::system_error(
                format!(
                    "Could not remove existing output {}: {}",
                    job.output.display(),
                    e
                ),
                input_size,
            );
        }

        let encode = job.command();
        let cmd = ToolCommand::new(&self.config.tools.encoder, encode.args);
        match run_tool(&self.runner, &cmd) {
            ToolStatus::Success(_) => {}
            ToolStatus::Failed(message) => {
                return JobReport {
                    outcome: JobOutcome::EncodeFailed(message),
                    input_size,
                    output_size: None,
                };
            }
            ToolStatus::SystemError(message) => {
                return JobReport::system_error(message, input_size);
            }
        }

        match self.metadata_provider.get_size(&job.output) {
            Ok(size) if size > 0 => {}
            _ => {
                return JobReport::system_error(
                    format!(
                        "Encoder reported success but produced no output: {}",
                        job.output.display()
                    ),
                    input_size,
                );
            }
        }

        let outcome = if job.copy_metadata {
            match copy_metadata(
                &self.runner,
                self.config.effective_metadata_tool(),
                &job.source,
                &job.output,
            ) {
                MetadataOutcome::Failed(message) => JobOutcome::MetadataFailed(message),
                MetadataOutcome::Copied | MetadataOutcome::Skipped => JobOutcome::Success,
            }
        } else {
            JobOutcome::Success
        };

        // Read after the metadata step, which rewrites the file.
        let output_size = self.metadata_provider.get_size(&job.output).ok();

        JobReport {
            outcome,
            input_size,
            output_size,
        }
    }
}

/// A batch running on its own thread.
pub struct BatchHandle {
    /// Every event of the batch, ending with `Event::Summary`.
    pub events: Receiver<Event>,
    cancel: CancellationToken,
    handle: JoinHandle<BatchResult>,
}

impl BatchHandle {
    /// Requests cancellation. The file currently being converted completes.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits for the batch to finish and returns its result.
    pub fn join(self) -> CoreResult<BatchResult> {
        self.handle.join().map_err(|_| CoreError::WorkerPanicked)
    }
}

/// Runs `worker` over `files` on a new thread.
///
/// Handlers already registered on `dispatcher` run on the worker thread; the
/// returned handle additionally receives every event through its channel.
pub fn spawn_batch<R, M>(
    worker: BatchWorker<R, M>,
    files: Vec<PathBuf>,
    params: ParameterSet,
    mut dispatcher: EventDispatcher,
) -> CoreResult<BatchHandle>
where
    R: ProcessRunner + Send + 'static,
    M: FileMetadataProvider + Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    dispatcher.add_handler(Arc::new(ChannelEventHandler::new(sender)));

    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();

    let handle = thread::Builder::new()
        .name("nextpix-batch".to_string())
        .spawn(move || worker.run_batch(&files, &params, &worker_cancel, &dispatcher))?;

    Ok(BatchHandle {
        events: receiver,
        cancel,
        handle,
    })
}
