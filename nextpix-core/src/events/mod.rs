//! Event stream emitted by the batch worker.
//!
//! The worker never prints anything itself. Front ends register one or more
//! [`EventHandler`]s on an [`EventDispatcher`] (or read the channel returned
//! by [`spawn_batch`](crate::processing::spawn_batch)) and render events as
//! they see fit.

use crate::processing::job::{BatchResult, JobOutcome};
use crate::utils::{calculate_size_change, format_bytes, format_size_change};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::mpsc::Sender;

pub mod json_handler;

/// Per-file record emitted after each job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    /// 1-based position of the file in the batch.
    pub index: usize,
    pub total: usize,
    pub filename: String,
    pub output_path: String,
    pub outcome: JobOutcome,
    pub input_size: Option<u64>,
    pub output_size: Option<u64>,
}

impl FileReport {
    /// Signed percentage change from input to output size, when both are known.
    pub fn size_change(&self) -> Option<f64> {
        match (self.input_size, self.output_size) {
            (Some(input), Some(output)) => Some(calculate_size_change(input, output)),
            _ => None,
        }
    }

    /// One-line human readable description of the job's result.
    pub fn describe(&self) -> String {
        let sizes = match (self.input_size, self.output_size, self.size_change()) {
            (Some(input), Some(output), Some(change)) => format!(
                " ({} -> {}, {})",
                format_bytes(input),
                format_bytes(output),
                format_size_change(change)
            ),
            _ => String::new(),
        };
        match &self.outcome {
            JobOutcome::Success => format!("{}: converted{}", self.filename, sizes),
            JobOutcome::MetadataFailed(msg) => format!(
                "{}: converted{}, metadata not copied: {}",
                self.filename, sizes, msg
            ),
            JobOutcome::EncodeFailed(msg) => format!("{}: encoding failed: {}", self.filename, msg),
            JobOutcome::SystemError(msg) => format!("{}: error: {}", self.filename, msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Free-form status line, e.g. "Processing 2/5: beach.jpg".
    Status { message: String },

    /// Emitted exactly once per processed file, after its `FileLog`.
    Progress {
        percent: u8,
        completed: usize,
        total: usize,
    },

    FileLog(FileReport),

    /// Final event of every batch.
    Summary(BatchResult),
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards every event into an `mpsc` channel.
///
/// Send errors (receiver dropped) are ignored; the batch keeps running.
pub struct ChannelEventHandler {
    sender: Sender<Event>,
}

impl ChannelEventHandler {
    pub fn new(sender: Sender<Event>) -> Self {
        Self { sender }
    }
}

impl EventHandler for ChannelEventHandler {
    fn handle(&self, event: &Event) {
        let _ = self.sender.send(event.clone());
    }
}

/// Calls a closure for every event.
pub struct CallbackEventHandler<F>
where
    F: Fn(&Event) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackEventHandler<F>
where
    F: Fn(&Event) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> EventHandler for CallbackEventHandler<F>
where
    F: Fn(&Event) + Send + Sync,
{
    fn handle(&self, event: &Event) {
        (self.callback)(event);
    }
}
