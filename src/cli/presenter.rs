//! CLI presenter for output formatting

use std::sync::{Arc, Mutex};
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::PreviewSink;

/// Presenter for CLI output formatting
#[derive(Clone)]
pub struct Presenter {
    spinner: Arc<Mutex<Option<ProgressBar>>>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self {
            spinner: Arc::new(Mutex::new(None)),
        }
    }

    fn with_spinner(&self, f: impl FnOnce(&mut Option<ProgressBar>)) {
        if let Ok(mut guard) = self.spinner.lock() {
            f(&mut guard);
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.with_spinner(|slot| {
            if let Some(old) = slot.replace(spinner) {
                old.finish_and_clear();
            }
        });
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        self.with_spinner(|slot| {
            if let Some(spinner) = slot.as_ref() {
                spinner.set_message(message.to_string());
            }
        });
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&self, message: &str) {
        self.with_spinner(|slot| {
            if let Some(spinner) = slot.take() {
                spinner.finish_with_message(format!("{} {}", "✓".green(), message));
            }
        });
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&self, message: &str) {
        self.with_spinner(|slot| {
            if let Some(spinner) = slot.take() {
                spinner.finish_with_message(format!("{} {}", "✗".red(), message));
            }
        });
    }

    /// Stop spinner without status
    pub fn stop_spinner(&self) {
        self.with_spinner(|slot| {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
        });
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Format the countdown bar: filled segments are seconds already recorded
    pub fn format_countdown(&self, remaining: u32, total: u32) -> String {
        let elapsed = total.saturating_sub(remaining);
        let bar_width = total.clamp(1, 20) as usize;
        let filled = if total == 0 {
            bar_width
        } else {
            (elapsed as usize * bar_width) / total as usize
        };
        let empty = bar_width - filled;

        format!(
            "[{}{}] {:>2}s left",
            "█".repeat(filled).red(),
            "░".repeat(empty),
            remaining
        )
    }

    /// Update the countdown display
    pub fn update_countdown(&self, remaining: u32, total: u32) {
        let bar = self.format_countdown(remaining, total);
        self.update_spinner(&format!("{} Recording... {}", "●".red(), bar));
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Shows which device the live preview is bound to
pub struct TerminalPreview {
    presenter: Presenter,
}

impl TerminalPreview {
    pub fn new(presenter: Presenter) -> Self {
        Self { presenter }
    }
}

impl PreviewSink for TerminalPreview {
    fn bind(&self, device_label: &str) {
        self.presenter.info(&format!("Camera ready: {}", device_label));
    }
}
