// ============================================================================
// nextpix-cli/src/progress.rs
// ============================================================================
//
// PROGRESS REPORTING: Rendering Batch Events in the Terminal
//
// TerminalProgressHandler is the EventHandler the CLI registers when --json
// is not given. It drives an indicatif bar on stderr from Progress events and
// prints one line per finished file above the bar. The bar is hidden when
// stderr is not a terminal; file lines are printed either way.

use crate::terminal;

use console::Term;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use nextpix_core::events::{Event, EventHandler};
use std::io::IsTerminal;
use std::sync::Mutex;
use std::time::Duration;

fn bar_style() -> ProgressStyle {
    let term_width = Term::stderr().size().1 as usize;
    let template = if term_width >= 80 {
        "  ⧖ {percent:>3}% [{bar:30}] {pos}/{len} {wide_msg}"
    } else {
        "  ⧖ {percent:>3}% [{bar:15}] {pos}/{len}"
    };
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##.")
}

/// Event handler rendering a batch as a progress bar plus per-file lines.
pub struct TerminalProgressHandler {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalProgressHandler {
    /// Creates the handler and its bar for a batch of `total` files.
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(bar_style());
        if std::io::stderr().is_terminal() {
            bar.enable_steady_tick(Duration::from_millis(100));
        } else {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        Self {
            bar: Mutex::new(Some(bar)),
        }
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }
}

impl EventHandler for TerminalProgressHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::Status { message } => self.with_bar(|bar| bar.set_message(message.clone())),
            Event::FileLog(report) => {
                self.with_bar(|bar| bar.suspend(|| terminal::print_file_report(report)))
            }
            Event::Progress { completed, .. } => {
                self.with_bar(|bar| bar.set_position(*completed as u64))
            }
            Event::Summary(_) => {
                if let Ok(mut guard) = self.bar.lock() {
                    if let Some(bar) = guard.take() {
                        bar.finish_and_clear();
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextpix_core::processing::BatchResult;

    #[test]
    fn test_bar_tracks_progress_and_finishes_on_summary() {
        let handler = TerminalProgressHandler::new(3);
        handler.handle(&Event::Progress {
            percent: 67,
            completed: 2,
            total: 3,
        });
        handler.with_bar(|bar| assert_eq!(bar.position(), 2));

        handler.handle(&Event::Summary(BatchResult::new(3)));
        assert!(handler.bar.lock().unwrap().is_none());
    }
}
