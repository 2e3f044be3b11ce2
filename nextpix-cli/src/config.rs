// nextpix-cli/src/config.rs
//
// Defines default configuration constants for the `nextpix` binary.

/// Prefix of per-run log files written to `--log-dir`.
pub const LOG_FILE_PREFIX: &str = "nextpix";

/// Process exit status when the batch ran but at least one file failed.
pub const EXIT_BATCH_FAILURES: i32 = 2;

/// Process exit status for setup errors (bad arguments, missing encoder).
pub const EXIT_ERROR: i32 = 1;
