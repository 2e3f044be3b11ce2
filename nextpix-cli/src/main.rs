// nextpix-cli/src/main.rs
//
// Entry point of the `nextpix` binary.
//
// Parses arguments, installs logging, dispatches to the subcommand and maps
// the outcome to the process exit status:
//
// - 0: every file converted (metadata warnings do not count as failures)
// - 1: setup error (invalid parameters, encoder not found, unreadable input)
// - 2: the batch ran but at least one file failed

use clap::Parser;
use nextpix_cli::config::{EXIT_BATCH_FAILURES, EXIT_ERROR};
use nextpix_cli::logging::init_logging;
use nextpix_cli::{Cli, Commands, ConvertRequest, run_check, run_convert};

use anyhow::Context;
use owo_colors::OwoColorize;
use std::process;

fn run(cli: Cli) -> anyhow::Result<i32> {
    let request: ConvertRequest = match cli.command {
        Commands::Check(args) => {
            init_logging(cli.verbose, None)?;
            run_check(args)?;
            return Ok(0);
        }
        Commands::Avif(args) => args.into(),
        Commands::AvifFfmpeg(args) => args.into(),
        Commands::Heif(args) => args.into(),
        Commands::Jxl(args) => args.into(),
    };

    if let Some(log_path) = init_logging(cli.verbose, request.common.log_dir.as_deref())? {
        log::info!("Log file: {}", log_path.display());
    }

    let kind = request.kind();
    let result = run_convert(request).with_context(|| format!("{kind} conversion failed"))?;

    if result.failure_count() > 0 {
        Ok(EXIT_BATCH_FAILURES)
    } else {
        Ok(0)
    }
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(EXIT_ERROR);
        }
    }
}
