//! Implementation of the conversion subcommands.
//!
//! Collects input images, validates the parameter set, checks that the
//! encoder can be launched, then runs the batch on a worker thread and
//! renders its events.

use crate::cli::ConvertRequest;
use crate::error::CliResult;
use crate::progress::TerminalProgressHandler;
use crate::terminal;

use nextpix_core::config::{CoreConfig, CoreConfigBuilder, DEFAULT_METADATA_TOOL};
use nextpix_core::events::json_handler::JsonProgressHandler;
use nextpix_core::events::{Event, EventDispatcher};
use nextpix_core::external::{StdProcessRunner, check_dependency};
use nextpix_core::processing::{BatchResult, BatchWorker, spawn_batch};
use nextpix_core::{CoreError, collect_inputs};

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Resolves tool paths and the metadata switch from the shared flags.
///
/// Without `--exiftool`/`NEXTPIX_EXIFTOOL` the default name is looked up on
/// `PATH` for each file; a missing binary just skips the metadata step.
pub fn build_core_config(req: &ConvertRequest) -> CoreConfig {
    let common = &req.common;
    let mut builder = CoreConfigBuilder::new(req.kind()).copy_metadata(!common.no_metadata);
    if let Some(path) = &common.encoder_path {
        builder = builder.encoder_path(path);
    }
    builder = builder.metadata_tool(
        common
            .exiftool
            .clone()
            .unwrap_or_else(|| DEFAULT_METADATA_TOOL.into()),
    );
    builder.build()
}

/// Runs one conversion batch and returns its result.
pub fn run_convert(req: ConvertRequest) -> CliResult<BatchResult> {
    let start = Instant::now();
    let kind = req.kind();

    req.params.validate()?;

    let files = collect_inputs(&req.common.inputs, kind)?;
    if files.is_empty() {
        warn!("No processable images found in the given inputs.");
        return Ok(BatchResult::new(0));
    }

    let config = build_core_config(&req);
    let runner = StdProcessRunner::new();

    let banner = check_dependency(&runner, &config.tools.encoder, kind.version_arg()).map_err(
        |e| match e {
            CoreError::DependencyNotFound(name) => CoreError::DependencyNotFound(format!(
                "{name} (install it or pass --encoder-path / set {})",
                kind.env_var()
            )),
            other => other,
        },
    )?;
    debug!("Encoder: {} ({})", config.tools.encoder.display(), banner);

    if !req.common.json {
        terminal::print_section(&format!("Converting to {kind}"));
        terminal::print_status("Files", &files.len().to_string());
        terminal::print_status("Encoder", &config.tools.encoder.display().to_string());
        let metadata = match config.effective_metadata_tool() {
            Some(tool) => tool.display().to_string(),
            None => "disabled".to_string(),
        };
        terminal::print_status("Metadata", &metadata);
        println!();
    }
    info!("Found {} file(s) to convert with {}", files.len(), kind);

    let mut dispatcher = EventDispatcher::new();
    if req.common.json {
        dispatcher.add_handler(Arc::new(JsonProgressHandler::new()));
    } else {
        dispatcher.add_handler(Arc::new(TerminalProgressHandler::new(files.len())));
    }

    let worker = BatchWorker::new(runner, config);
    let handle = spawn_batch(worker, files, req.params, dispatcher)?;

    // Rendering happens in the handlers on the worker thread; this thread only
    // mirrors status lines into the log.
    for event in handle.events.iter() {
        if let Event::Status { message } = event {
            debug!("{message}");
        }
    }
    let result = handle.join()?;

    if !req.common.json {
        terminal::print_summary(&result, start.elapsed());
    }
    info!(
        "Finished: {} converted, {} failed",
        result.success_count,
        result.failure_count()
    );

    Ok(result)
}
