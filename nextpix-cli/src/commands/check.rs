//! Implementation of the `check` subcommand.

use crate::cli::CheckArgs;
use crate::error::CliResult;
use crate::terminal;

use nextpix_core::config::{DEFAULT_METADATA_TOOL, ToolPaths};
use nextpix_core::encoding::EncoderKind;
use nextpix_core::external::{ProcessRunner, StdProcessRunner, check_dependency};
use nextpix_core::CoreError;

use std::path::{Path, PathBuf};

/// Availability of one external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCheck {
    pub name: String,
    pub path: PathBuf,
    /// Version banner, or the reason the tool could not be launched.
    pub result: Result<String, String>,
}

fn check_tool<R: ProcessRunner>(
    runner: &R,
    name: &str,
    path: &Path,
    version_arg: &str,
) -> ToolCheck {
    let result = match check_dependency(runner, path, version_arg) {
        Ok(banner) if banner.is_empty() => Ok("available".to_string()),
        Ok(banner) => Ok(banner),
        Err(CoreError::DependencyNotFound(_)) => Err("not found".to_string()),
        Err(e) => Err(e.to_string()),
    };
    ToolCheck {
        name: name.to_string(),
        path: path.to_path_buf(),
        result,
    }
}

/// Probes every encoder (paths from NEXTPIX_* or PATH) and the metadata tool.
pub fn check_tools<R: ProcessRunner>(runner: &R, exiftool: Option<&Path>) -> Vec<ToolCheck> {
    let mut checks: Vec<ToolCheck> = EncoderKind::ALL
        .iter()
        .map(|&kind| {
            let path = ToolPaths::from_env(kind).encoder;
            check_tool(runner, kind.default_program(), &path, kind.version_arg())
        })
        .collect();

    let exiftool = exiftool.unwrap_or(Path::new(DEFAULT_METADATA_TOOL));
    // exiftool prints its bare version number for -ver.
    checks.push(check_tool(runner, DEFAULT_METADATA_TOOL, exiftool, "-ver"));
    checks
}

/// Prints tool availability. Returns the number of tools that could not be
/// launched.
pub fn run_check(args: CheckArgs) -> CliResult<usize> {
    let checks = check_tools(&StdProcessRunner::new(), args.exiftool.as_deref());

    terminal::print_section("External tools");
    for check in &checks {
        let value = match &check.result {
            Ok(banner) => format!("✓ {} ({})", banner, check.path.display()),
            Err(reason) => format!("✗ {} ({})", reason, check.path.display()),
        };
        terminal::print_status(&check.name, &value);
    }
    println!();

    Ok(checks.iter().filter(|c| c.result.is_err()).count())
}
