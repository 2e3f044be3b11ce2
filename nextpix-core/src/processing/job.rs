//! Per-file jobs, their outcomes and the aggregated batch result.

use crate::encoding::{EncodeCommand, ParameterSet, build_command, output_path_for};
use crate::utils::display_name;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One unit of work: a single source file converted with the batch's
/// parameter set. Built by the worker when it picks up the entry and dropped
/// once the outcome has been recorded.
#[derive(Debug, Clone)]
pub struct EncodeJob<'a> {
    /// 1-based position in the batch.
    pub index: usize,
    pub total: usize,
    pub source: PathBuf,
    /// Source stem plus the encoder's extension, next to the source.
    pub output: PathBuf,
    pub params: &'a ParameterSet,
    pub copy_metadata: bool,
}

impl<'a> EncodeJob<'a> {
    pub fn new(
        index: usize,
        total: usize,
        source: &Path,
        params: &'a ParameterSet,
        copy_metadata: bool,
    ) -> Self {
        Self {
            index,
            total,
            source: source.to_path_buf(),
            output: output_path_for(source, params.kind()),
            params,
            copy_metadata,
        }
    }

    pub fn filename(&self) -> String {
        display_name(&self.source)
    }

    /// Encoder arguments for this job.
    pub fn command(&self) -> EncodeCommand {
        build_command(&self.source, self.params)
    }
}

/// Classified result of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum JobOutcome {
    Success,
    /// The encoder exited non-zero. Carries its error output.
    EncodeFailed(String),
    /// Encoding succeeded but metadata could not be copied. Counted as a
    /// success.
    MetadataFailed(String),
    /// The job could not run or produced nothing usable.
    SystemError(String),
}

impl JobOutcome {
    /// True when a usable output file was produced.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success | Self::MetadataFailed(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::EncodeFailed(msg) | Self::MetadataFailed(msg) | Self::SystemError(msg) => {
                Some(msg)
            }
        }
    }
}

/// A `(filename, message)` pair recorded for a job that did not fully succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub filename: String,
    pub message: String,
}

/// Aggregate result of a batch, produced once at completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Number of input paths the batch was started with.
    pub total_files: usize,
    /// Jobs that ran to an outcome.
    pub processed: usize,
    pub success_count: usize,
    /// Encode failures and system errors, in input order.
    pub failures: Vec<FileFailure>,
    /// Metadata copy failures on otherwise successful jobs, in input order.
    pub warnings: Vec<FileFailure>,
    pub cancelled: bool,
    /// Inputs never started because of cancellation.
    pub skipped: usize,
    /// Input bytes of successful jobs.
    pub total_input_bytes: u64,
    /// Output bytes of successful jobs.
    pub total_output_bytes: u64,
}

impl BatchResult {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            ..Default::default()
        }
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn first_failure(&self) -> Option<&FileFailure> {
        self.failures.first()
    }

    /// True when every input was processed and none failed.
    pub fn all_succeeded(&self) -> bool {
        !self.cancelled && self.failures.is_empty() && self.success_count == self.total_files
    }

    /// Records one job's outcome. Sizes only count toward the totals for
    /// successful jobs where both are known.
    pub fn record(
        &mut self,
        filename: &str,
        outcome: &JobOutcome,
        input_size: Option<u64>,
        output_size: Option<u64>,
    ) {
        self.processed += 1;
        match outcome {
            JobOutcome::Success => self.success_count += 1,
            JobOutcome::MetadataFailed(msg) => {
                self.success_count += 1;
                self.warnings.push(FileFailure {
                    filename: filename.to_string(),
                    message: msg.clone(),
                });
            }
            JobOutcome::EncodeFailed(msg) | JobOutcome::SystemError(msg) => {
                self.failures.push(FileFailure {
                    filename: filename.to_string(),
                    message: msg.clone(),
                });
            }
        }

        if outcome.is_success() {
            if let (Some(input), Some(output)) = (input_size, output_size) {
                self.total_input_bytes += input;
                self.total_output_bytes += output;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CjxlParams;

    #[test]
    fn test_job_derives_output_next_to_source() {
        let params = ParameterSet::Cjxl(CjxlParams::default());
        let job = EncodeJob::new(1, 1, Path::new("/photos/IMG_1.PNG"), &params, false);
        assert_eq!(job.output, PathBuf::from("/photos/IMG_1.jxl"));
        assert_eq!(job.filename(), "IMG_1.PNG");
        assert_eq!(job.command().output_path, job.output);
    }

    #[test]
    fn test_record_counts_metadata_failure_as_success() {
        let mut result = BatchResult::new(3);
        result.record("a.jpg", &JobOutcome::Success, Some(100), Some(40));
        result.record(
            "b.jpg",
            &JobOutcome::MetadataFailed("exiftool crashed".into()),
            Some(100),
            Some(60),
        );
        result.record("c.jpg", &JobOutcome::EncodeFailed("bad".into()), Some(100), None);

        assert_eq!(result.processed, 3);
        assert_eq!(result.success_count, 2);
        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.success_count + result.failure_count(), result.total_files);
        assert_eq!(result.warnings[0].filename, "b.jpg");
        assert_eq!(result.first_failure().unwrap().message, "bad");
        assert_eq!(result.total_input_bytes, 200);
        assert_eq!(result.total_output_bytes, 100);
        assert!(!result.all_succeeded());
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(JobOutcome::Success.is_success());
        assert!(JobOutcome::MetadataFailed("x".into()).is_success());
        assert!(!JobOutcome::SystemError("x".into()).is_success());
        assert_eq!(JobOutcome::Success.message(), None);
        assert_eq!(JobOutcome::EncodeFailed("boom".into()).message(), Some("boom"));
    }
}
