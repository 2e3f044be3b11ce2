// ============================================================================
// nextpix-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with External CLI Tools and File System
//
// This module encapsulates interactions with external command-line tools
// (avifenc, ffmpeg, heif-enc, cjxl, exiftool) as well as file system metadata
// access. Both are expressed as traits so that the batch worker can be
// exercised with test doubles instead of real encoders.
//
// KEY COMPONENTS:
// - ToolCommand / ToolOutput: one external invocation and what it printed
// - ProcessRunner: trait for executing a ToolCommand
// - StdProcessRunner + run_tool (runner.rs): production runner and
//   success/failure classification
// - Dependency checking and executable lookup
// - FileMetadataProvider: file size access abstraction

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Production process runner and result classification
pub mod runner;

/// Scripted test doubles for `ProcessRunner`
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use runner::{StdProcessRunner, ToolStatus, run_tool};

// ============================================================================
// COMMAND TYPES
// ============================================================================

/// A single external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// File name of the program, used in messages ("cjxl", "exiftool").
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Shell-like rendering of the command line, for debug logging only.
    pub fn display(&self) -> String {
        std::iter::once(self.program.to_string_lossy())
            .chain(self.args.iter().map(|a| a.to_string_lossy()))
            .map(|part| {
                if part.contains(' ') {
                    format!("\"{part}\"")
                } else {
                    part.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    /// True when the process exited with status 0.
    pub success: bool,
    /// Exit code, `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

// ============================================================================
// PROCESS EXECUTION ABSTRACTION
// ============================================================================

/// Something that can run an external command to completion.
///
/// Implementations spawn exactly one child per call and block until it
/// exits. `Err` is reserved for the cases where the process could not be
/// started or waited on; a non-zero exit is reported through `ToolOutput`.
pub trait ProcessRunner {
    fn execute(&self, cmd: &ToolCommand) -> CoreResult<ToolOutput>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn execute(&self, cmd: &ToolCommand) -> CoreResult<ToolOutput> {
        (**self).execute(cmd)
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that a required external command can be launched.
///
/// Runs `program <version_arg>` and returns the first non-empty line it
/// printed (the version banner, for display). A tool that launches but exits
/// non-zero still counts as present.
pub fn check_dependency<R: ProcessRunner>(
    runner: &R,
    program: &Path,
    version_arg: &str,
) -> CoreResult<String> {
    let cmd = ToolCommand::new(program, vec![version_arg.into()]);
    match runner.execute(&cmd) {
        Ok(output) => {
            let banner = output
                .stdout
                .lines()
                .chain(output.stderr.lines())
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or_default()
                .to_string();
            log::debug!("Found dependency {}: {}", program.display(), banner);
            Ok(banner)
        }
        Err(CoreError::CommandStart(name, e)) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", name);
            Err(CoreError::DependencyNotFound(program.display().to_string()))
        }
        Err(e) => {
            log::error!(
                "Failed to start dependency check command '{}': {}",
                program.display(),
                e
            );
            Err(e)
        }
    }
}

/// Resolves an executable path.
///
/// Paths with a directory component must point at an executable file. Bare
/// names are looked up in `PATH`.
pub fn find_executable(program: &Path) -> Option<PathBuf> {
    if program.as_os_str().is_empty() {
        return None;
    }
    which::which(program).ok()
}

// ============================================================================
// FILE METADATA ACCESS
// ============================================================================

/// Abstraction over file size lookups used for output verification and
/// compression reporting.
pub trait FileMetadataProvider {
    /// Gets the size of the file at the given path in bytes.
    fn get_size(&self, path: &Path) -> CoreResult<u64>;
}

/// Standard implementation of FileMetadataProvider using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFsMetadataProvider;

impl FileMetadataProvider for StdFsMetadataProvider {
    fn get_size(&self, path: &Path) -> CoreResult<u64> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(CoreError::PathError(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        Ok(metadata.len())
    }
}
