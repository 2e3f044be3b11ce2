//! Batch conversion: jobs, outcomes, cancellation and the worker loop.
//!
//! This module is the central hub of the nextpix-core library. It turns a
//! list of input paths and one validated parameter set into a sequence of
//! external encoder runs and a final [`BatchResult`].

/// The sequential worker loop and its threaded entry point
pub mod batch;

/// Cooperative cancellation flag
pub mod cancel;

/// EncodeJob, JobOutcome and BatchResult
pub mod job;

pub use batch::{BatchHandle, BatchWorker, progress_percent, spawn_batch};
pub use cancel::CancellationToken;
pub use job::{BatchResult, EncodeJob, FileFailure, JobOutcome};
