// ============================================================================
// nextpix-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern Dispatch for Console and Log File
//
// The core library logs through the `log` facade. This module installs the
// backend:
//
// - Console (stderr): CLI messages at info, warnings and errors with a colored
//   level tag. Per-file core messages are rendered from events instead, so
//   the core target is limited to errors unless --verbose is given.
// - Log file (optional): every record at debug level with a timestamp, written
//   to <log-dir>/nextpix_<YYYYMMDD_HHMMSS>.log.

use crate::config::LOG_FILE_PREFIX;
use crate::error::{CliErrorContext, CliResult};

use log::LevelFilter;
use owo_colors::OwoColorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the log file for a run started now.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("{}_{}.log", LOG_FILE_PREFIX, get_timestamp()))
}

/// Check if color should be used (respects NO_COLOR and non-terminal stderr)
pub fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::Term::stderr().features().colors_supported()
}

fn console_line(level: log::Level, message: &std::fmt::Arguments<'_>, color: bool) -> String {
    match (level, color) {
        (log::Level::Error, true) => format!("{} {}", "error:".red().bold(), message),
        (log::Level::Warn, true) => format!("{} {}", "warning:".yellow().bold(), message),
        (log::Level::Error, false) => format!("error: {message}"),
        (log::Level::Warn, false) => format!("warning: {message}"),
        (log::Level::Debug | log::Level::Trace, true) => format!("{}", message.dimmed()),
        _ => message.to_string(),
    }
}

/// Installs the global logger. Returns the log file path when one was created.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> CliResult<Option<PathBuf>> {
    let color = should_use_color();
    let console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let core_console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    };

    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!("{}", console_line(record.level(), message, color)))
        })
        .level(console_level)
        .level_for("nextpix_core", core_console_level)
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new().chain(console);

    let log_path = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir).cli_with_context(|| {
                format!("Failed to create log directory '{}'", dir.display())
            })?;
            let path = log_file_path(dir);
            let file = fern::log_file(&path).cli_with_context(|| {
                format!("Failed to open log file '{}'", path.display())
            })?;
            dispatch = dispatch.chain(
                fern::Dispatch::new()
                    .format(|out, message, record| {
                        out.finish(format_args!(
                            "{} [{}] [{}] {}",
                            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                            record.level(),
                            record.target(),
                            message
                        ))
                    })
                    .level(LevelFilter::Debug)
                    .chain(file),
            );
            Some(path)
        }
        None => None,
    };

    dispatch
        .apply()
        .map_err(|e| {
            nextpix_core::CoreError::OperationFailed(format!("Failed to initialize logging: {e}"))
        })?;

    Ok(log_path)
}
