//! Core library for batch image conversion to AVIF, HEIF and JPEG-XL.
//!
//! All pixel work is delegated to external encoders (`avifenc`, `ffmpeg`,
//! `heif-enc`, `cjxl`); metadata is carried over with `exiftool`. This crate
//! builds the command lines, runs them one file at a time, classifies each
//! result and reports progress through an event stream.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use nextpix_core::config::CoreConfigBuilder;
//! use nextpix_core::encoding::{CjxlParams, EncoderKind, ParameterSet};
//! use nextpix_core::events::EventDispatcher;
//! use nextpix_core::external::StdProcessRunner;
//! use nextpix_core::processing::{BatchWorker, CancellationToken};
//! use std::path::Path;
//!
//! let params = ParameterSet::Cjxl(CjxlParams::default());
//! params.validate()?;
//!
//! let config = CoreConfigBuilder::new(EncoderKind::Cjxl)
//!     .metadata_tool("exiftool")
//!     .build();
//! let files = nextpix_core::find_processable_files(Path::new("/path/to/photos"))?;
//!
//! let worker = BatchWorker::new(StdProcessRunner::new(), config);
//! let result = worker.run_batch(
//!     &files,
//!     &params,
//!     &CancellationToken::new(),
//!     &EventDispatcher::new(),
//! );
//! println!("{} of {} converted", result.success_count, result.total_files);
//! # Ok::<(), nextpix_core::CoreError>(())
//! ```

pub mod config;
pub mod discovery;
pub mod encoding;
pub mod error;
pub mod events;
pub mod external;
pub mod metadata;
pub mod processing;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder, ToolPaths};
pub use discovery::{collect_inputs, find_processable_files};
pub use encoding::{EncoderKind, ParameterSet, build_command};
pub use error::{CoreError, CoreResult};
pub use events::{Event, EventDispatcher, EventHandler};
pub use processing::{
    BatchHandle, BatchResult, BatchWorker, CancellationToken, JobOutcome, spawn_batch,
};
pub use utils::{format_bytes, format_duration};
