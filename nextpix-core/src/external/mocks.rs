// nextpix-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---
//
// Scripted `ProcessRunner` for unit and integration tests, compiled only for
// this crate's tests or with the `mocks` feature. Expectations are consumed in
// insertion order: the first expectation whose pattern occurs in the program
// path or in any argument answers the call and is removed.

use super::{ProcessRunner, ToolCommand, ToolOutput};
use crate::error::{CoreResult, command_start_error};

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// What a matched expectation does.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// The process "runs" and exits with `exit_code`. When `creates` is set,
    /// that file is written with `contents` first, standing in for the
    /// encoder's output.
    Exit {
        exit_code: i32,
        stdout: String,
        stderr: String,
        creates: Option<(PathBuf, Vec<u8>)>,
    },
    /// The process cannot be started.
    SpawnError(io::ErrorKind),
}

/// Represents an expected command call and its mock result.
#[derive(Debug, Clone)]
pub struct MockExpectation {
    pub pattern: String,
    pub response: MockResponse,
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<MockExpectation>,
    received_calls: Vec<ToolCommand>,
}

/// Mock implementation of `ProcessRunner` supporting multiple expectations.
#[derive(Debug, Clone, Default)]
pub struct MockProcessRunner {
    state: Arc<Mutex<MockState>>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Default::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the calls it recorded.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_expectation(&self, pattern: &str, response: MockResponse) {
        self.lock().expectations.push(MockExpectation {
            pattern: pattern.to_string(),
            response,
        });
    }

    /// Exit 0 with the given output, writing no file.
    pub fn expect_success(&self, pattern: &str, stdout: &str, stderr: &str) {
        self.add_expectation(
            pattern,
            MockResponse::Exit {
                exit_code: 0,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                creates: None,
            },
        );
    }

    /// Exit 0 after writing `contents` to `output`.
    pub fn expect_success_creating(
        &self,
        pattern: &str,
        output: impl Into<PathBuf>,
        contents: &[u8],
    ) {
        self.add_expectation(
            pattern,
            MockResponse::Exit {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
                creates: Some((output.into(), contents.to_vec())),
            },
        );
    }

    /// Non-zero exit with the given stderr.
    pub fn expect_exit(&self, pattern: &str, exit_code: i32, stderr: &str) {
        self.add_expectation(
            pattern,
            MockResponse::Exit {
                exit_code,
                stdout: String::new(),
                stderr: stderr.to_string(),
                creates: None,
            },
        );
    }

    pub fn expect_spawn_error(&self, pattern: &str, kind: io::ErrorKind) {
        self.add_expectation(pattern, MockResponse::SpawnError(kind));
    }

    /// Every command received so far, in call order.
    pub fn received_calls(&self) -> Vec<ToolCommand> {
        self.lock().received_calls.clone()
    }

    /// Calls whose program file name equals `program_name`.
    pub fn calls_to(&self, program_name: &str) -> Vec<ToolCommand> {
        self.received_calls()
            .into_iter()
            .filter(|cmd| cmd.program_name() == program_name)
            .collect()
    }

    /// Number of expectations that have not been consumed.
    pub fn pending_expectations(&self) -> usize {
        self.lock().expectations.len()
    }
}

impl ProcessRunner for MockProcessRunner {
    fn execute(&self, cmd: &ToolCommand) -> CoreResult<ToolOutput> {
        let expectation = {
            let mut state = self.lock();
            state.received_calls.push(cmd.clone());

            let program = cmd.program.to_string_lossy();
            let found_index = state.expectations.iter().position(|exp| {
                program.contains(&exp.pattern)
                    || cmd
                        .args
                        .iter()
                        .any(|arg| arg.to_string_lossy().contains(&exp.pattern))
            });

            match found_index {
                Some(index) => state.expectations.remove(index),
                None => {
                    log::error!("MockProcessRunner: No expectation found for: {}", cmd.display());
                    panic!("MockProcessRunner: No expectation found for: {}", cmd.display());
                }
            }
        };

        log::info!(
            "MockProcessRunner: Matched expectation with pattern '{}'",
            expectation.pattern
        );

        match expectation.response {
            MockResponse::SpawnError(kind) => Err(command_start_error(
                cmd.program_name(),
                io::Error::new(kind, "mock spawn failure"),
            )),
            MockResponse::Exit {
                exit_code,
                stdout,
                stderr,
                creates,
            } => {
                if let Some((path, contents)) = creates {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, contents)?;
                    log::info!("MockProcessRunner created dummy output file: {}", path.display());
                }
                Ok(ToolOutput {
                    success: exit_code == 0,
                    exit_code: Some(exit_code),
                    stdout,
                    stderr,
                })
            }
        }
    }
}
