//! Terminal output styling for nextpix.
//!
//! Results go to stdout so they can be piped; logs and the progress bar live
//! on stderr.

use console::style;
use nextpix_core::events::FileReport;
use nextpix_core::processing::{BatchResult, JobOutcome};
use nextpix_core::utils::{calculate_size_change, format_size_change};
use nextpix_core::{format_bytes, format_duration};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Check if color should be used on stdout (respects NO_COLOR)
fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::Term::stdout().features().colors_supported()
}

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    println!();
    if should_use_color() {
        println!("===== {} =====", title.to_uppercase().cyan());
    } else {
        println!("===== {} =====", title.to_uppercase());
    }
}

/// Print a key-value status line with an aligned label
pub fn print_status(label: &str, value: &str) {
    let formatted_label = format!("{:<14}", format!("{label}:"));
    if should_use_color() {
        println!("  {} {}", style(formatted_label).bold(), value);
    } else {
        println!("  {formatted_label} {value}");
    }
}

/// Line printed for one finished file.
pub fn file_report_line(report: &FileReport, color: bool) -> String {
    let counter = format!("[{}/{}]", report.index, report.total);
    let text = report.describe();
    if !color {
        let symbol = match report.outcome {
            JobOutcome::Success => "✓",
            JobOutcome::MetadataFailed(_) => "⚠",
            JobOutcome::EncodeFailed(_) | JobOutcome::SystemError(_) => "✗",
        };
        return format!("  {symbol} {counter} {text}");
    }
    match report.outcome {
        JobOutcome::Success => format!("  {} {} {}", "✓".green(), counter.dimmed(), text),
        JobOutcome::MetadataFailed(_) => {
            format!("  {} {} {}", "⚠".yellow(), counter.dimmed(), text.yellow())
        }
        JobOutcome::EncodeFailed(_) | JobOutcome::SystemError(_) => {
            format!("  {} {} {}", "✗".red().bold(), counter.dimmed(), text.red())
        }
    }
}

pub fn print_file_report(report: &FileReport) {
    println!("{}", file_report_line(report, should_use_color()));
}

/// Prints the final report: counts, sizes, the first failure and warnings.
pub fn print_summary(result: &BatchResult, elapsed: Duration) {
    print_section("Summary");

    let converted = format!("{} of {}", result.success_count, result.total_files);
    print_status("Converted", &converted);
    print_status("Failed", &result.failure_count().to_string());
    if !result.warnings.is_empty() {
        print_status("Warnings", &result.warnings.len().to_string());
    }
    if result.cancelled {
        print_status("Cancelled", &format!("{} file(s) not started", result.skipped));
    }
    if result.total_input_bytes > 0 {
        let change = calculate_size_change(result.total_input_bytes, result.total_output_bytes);
        print_status(
            "Size",
            &format!(
                "{} -> {} ({})",
                format_bytes(result.total_input_bytes),
                format_bytes(result.total_output_bytes),
                format_size_change(change)
            ),
        );
    }
    print_status("Time", &format_duration(elapsed.as_secs_f64()));

    if let Some(first) = result.first_failure() {
        println!();
        let line = format!("First failure: {}: {}", first.filename, first.message);
        if should_use_color() {
            println!("  {}", line.red());
        } else {
            println!("  {line}");
        }
    }

    for warning in &result.warnings {
        let line = format!("Metadata not copied for {}: {}", warning.filename, warning.message);
        if should_use_color() {
            println!("  ⚠ {}", line.yellow());
        } else {
            println!("  ⚠ {line}");
        }
    }

    println!();
    if result.all_succeeded() {
        if should_use_color() {
            println!("  ✓ {}", "All files converted".green());
        } else {
            println!("  ✓ All files converted");
        }
    }
}
