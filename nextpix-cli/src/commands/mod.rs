//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific subcommand.

/// The four conversion subcommands (`avif`, `avif-ffmpeg`, `heif`, `jxl`).
pub mod convert;

/// The `check` subcommand: reports which external tools can be launched.
pub mod check;
