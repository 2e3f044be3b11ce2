// nextpix-cli/src/lib.rs
//
// Library portion of the nextpix CLI application.
// Contains argument definitions, command logic and terminal rendering.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod progress;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ConvertRequest};
pub use commands::check::run_check;
pub use commands::convert::run_convert;
