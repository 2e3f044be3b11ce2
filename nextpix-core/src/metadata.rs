// ============================================================================
// nextpix-core/src/metadata.rs
// ============================================================================
//
// METADATA COPIER: Carrying EXIF/XMP/ICC Tags onto Converted Files
//
// Encoders drop most metadata. After a successful encode the worker runs the
// metadata tool once per file:
//
//   exiftool -tagsFromFile <source> -all:all -overwrite_original <target>
//
// The step is optional and never fatal. A missing tool yields `Skipped`;
// a tool that fails yields `Failed`, which the worker records as a warning.

use crate::external::{ProcessRunner, ToolCommand, ToolStatus, find_executable, run_tool};

use std::ffi::OsString;
use std::path::Path;

/// Result of one metadata copy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataOutcome {
    /// No tool configured, or the configured binary does not exist.
    Skipped,
    Copied,
    Failed(String),
}

/// Builds the metadata tool invocation for `source` -> `target`.
pub fn metadata_command(tool: &Path, source: &Path, target: &Path) -> ToolCommand {
    let args: Vec<OsString> = vec![
        "-tagsFromFile".into(),
        source.as_os_str().to_owned(),
        "-all:all".into(),
        "-overwrite_original".into(),
        target.as_os_str().to_owned(),
    ];
    ToolCommand::new(tool, args)
}

/// Copies metadata from `source` onto `target` using `tool`.
pub fn copy_metadata<R: ProcessRunner>(
    runner: &R,
    tool: Option<&Path>,
    source: &Path,
    target: &Path,
) -> MetadataOutcome {
    let Some(tool) = tool.filter(|t| !t.as_os_str().is_empty()) else {
        return MetadataOutcome::Skipped;
    };

    let Some(resolved) = find_executable(tool) else {
        log::debug!(
            "Metadata tool {} not found, skipping metadata copy",
            tool.display()
        );
        return MetadataOutcome::Skipped;
    };

    match run_tool(runner, &metadata_command(&resolved, source, target)) {
        ToolStatus::Success(_) => {
            log::debug!("Copied metadata onto {}", target.display());
            MetadataOutcome::Copied
        }
        ToolStatus::Failed(message) | ToolStatus::SystemError(message) => {
            MetadataOutcome::Failed(message)
        }
    }
}
