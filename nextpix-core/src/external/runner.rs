// ============================================================================
// nextpix-core/src/external/runner.rs
// ============================================================================
//
// PROCESS RUNNER: Executing External Tools and Classifying the Result
//
// StdProcessRunner spawns one child per call with piped stdout/stderr, waits
// for it and returns the captured text. run_tool() turns that into one of
// three outcomes the batch worker understands:
//
// - Success:      exit status 0
// - Failed:       non-zero exit, message taken from stderr
// - SystemError:  the process could not be launched or waited on
//
// On Windows the child is created without a console window so that a GUI
// front end does not flash a terminal for every file.

use super::{ProcessRunner, ToolCommand, ToolOutput};
use crate::error::{CoreResult, command_start_error, command_wait_error};

use std::process::{Command, Stdio};

#[cfg(windows)]
use std::os::windows::process::CommandExt;

/// `CREATE_NO_WINDOW` process creation flag.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Production `ProcessRunner` built on `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdProcessRunner;

impl StdProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for StdProcessRunner {
    fn execute(&self, cmd: &ToolCommand) -> CoreResult<ToolOutput> {
        log::debug!("Running: {}", cmd.display());

        let mut command = Command::new(&cmd.program);
        command
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        let child = command
            .spawn()
            .map_err(|e| command_start_error(cmd.program_name(), e))?;

        // Drains stdout and stderr concurrently while waiting.
        let output = child
            .wait_with_output()
            .map_err(|e| command_wait_error(cmd.program_name(), e))?;

        Ok(ToolOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Classified result of running one external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    Success(ToolOutput),
    /// Non-zero exit. Carries the captured error text.
    Failed(String),
    /// The process could not be started or waited on.
    SystemError(String),
}

/// Runs `cmd` through `runner` and classifies the result.
pub fn run_tool<R: ProcessRunner>(runner: &R, cmd: &ToolCommand) -> ToolStatus {
    match runner.execute(cmd) {
        Ok(output) if output.success => ToolStatus::Success(output),
        Ok(output) => {
            let message = failure_message(cmd, &output);
            log::debug!("{} failed: {}", cmd.program_name(), message);
            ToolStatus::Failed(message)
        }
        Err(e) => ToolStatus::SystemError(e.to_string()),
    }
}

/// Trimmed stderr, or a generic message naming the exit status when the
/// tool printed nothing to stderr.
fn failure_message(cmd: &ToolCommand, output: &ToolOutput) -> String {
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match output.exit_code {
        Some(code) => format!("{} exited with status {}", cmd.program_name(), code),
        None => format!("{} was terminated by a signal", cmd.program_name()),
    }
}
