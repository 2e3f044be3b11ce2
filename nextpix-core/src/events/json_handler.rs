//! JSON progress handler for structured progress output
//!
//! This module provides a JSON-based event handler that writes one object
//! per line to stdout for consumption by scripts and GUI wrappers.

use super::{Event, EventHandler};
use serde_json::json;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Event handler that outputs batch events as structured JSON to stdout
pub struct JsonProgressHandler {
    output: Mutex<Box<dyn Write + Send>>,
}

impl JsonProgressHandler {
    /// Create a new JSON progress handler that writes to stdout
    pub fn new() -> Self {
        Self {
            output: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Create a new JSON progress handler with a custom writer
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(writer),
        }
    }

    /// Get current timestamp as seconds since Unix epoch
    fn get_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_json(&self, value: serde_json::Value) {
        if let Ok(mut output) = self.output.lock() {
            if let Ok(json_str) = serde_json::to_string(&value) {
                let _ = writeln!(output, "{}", json_str);
                let _ = output.flush();
            }
        }
    }
}

impl EventHandler for JsonProgressHandler {
    fn handle(&self, event: &Event) {
        let Ok(mut value) = serde_json::to_value(event) else {
            return;
        };

        // Derived values that consumers would otherwise recompute.
        match event {
            Event::FileLog(report) => {
                value["size_change_percent"] = json!(report.size_change());
                value["success"] = json!(report.outcome.is_success());
            }
            Event::Summary(result) => {
                value["failure_count"] = json!(result.failure_count());
            }
            _ => {}
        }
        value["timestamp"] = json!(Self::get_timestamp());

        self.write_json(value);
    }
}

impl Default for JsonProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FileReport;
    use crate::processing::job::JobOutcome;
    use std::sync::{Arc, Mutex};

    struct MockWriter {
        content: Arc<Mutex<Vec<u8>>>,
    }

    impl MockWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let content = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    content: content.clone(),
                },
                content,
            )
        }
    }

    impl Write for MockWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.content.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_progress_json() {
        let (writer, content) = MockWriter::new();
        let handler = JsonProgressHandler::with_writer(Box::new(writer));

        handler.handle(&Event::Progress {
            percent: 67,
            completed: 2,
            total: 3,
        });

        let output = String::from_utf8(content.lock().unwrap().clone()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();

        assert_eq!(parsed["type"], "progress");
        assert_eq!(parsed["percent"], 67);
        assert_eq!(parsed["completed"], 2);
        assert!(parsed["timestamp"].is_u64());
    }

    #[test]
    fn test_file_log_json() {
        let (writer, content) = MockWriter::new();
        let handler = JsonProgressHandler::with_writer(Box::new(writer));

        handler.handle(&Event::FileLog(FileReport {
            index: 1,
            total: 2,
            filename: "file1.jpg".to_string(),
            output_path: "/photos/file1.jxl".to_string(),
            outcome: JobOutcome::EncodeFailed("invalid quality".to_string()),
            input_size: Some(2000),
            output_size: None,
        }));

        let output = String::from_utf8(content.lock().unwrap().clone()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(output.trim()).unwrap();

        assert_eq!(parsed["type"], "file_log");
        assert_eq!(parsed["filename"], "file1.jpg");
        assert_eq!(parsed["outcome"]["status"], "encode_failed");
        assert_eq!(parsed["outcome"]["message"], "invalid quality");
        assert_eq!(parsed["success"], false);
        assert!(parsed["size_change_percent"].is_null());
    }
}
