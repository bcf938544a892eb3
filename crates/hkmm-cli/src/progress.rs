//! Download progress and install notifications for the terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use hkmm_pm::{InstallListener, ModError};

use crate::output::Output;

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {bytes} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Install listener drawing one download bar at a time.
///
/// The bar starts as a byte-counting spinner and switches to a bounded bar
/// once the server reports a content length.
pub struct ProgressListener {
    output: Output,
    enabled: bool,
    current: Mutex<Option<ProgressBar>>,
}

impl ProgressListener {
    pub fn new(output: Output, enabled: bool) -> Self {
        Self {
            output,
            enabled,
            current: Mutex::new(None),
        }
    }

    /// Begin a download bar labelled `name`
    pub fn start(&self, name: &str) {
        let pb = if self.enabled {
            let pb = ProgressBar::new_spinner();
            pb.set_style(spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(name.to_string());

        if let Ok(mut current) = self.current.lock() {
            if let Some(old) = current.replace(pb) {
                old.finish_and_clear();
            }
        }
    }

    pub fn advance(&self, done: u64, total: u64) {
        let Ok(current) = self.current.lock() else {
            return;
        };
        if let Some(pb) = current.as_ref() {
            if total > 0 && pb.length() != Some(total) {
                pb.set_length(total);
                pb.set_style(bar_style());
            }
            pb.set_position(done);
        }
    }

    /// Clear the active bar, if any
    pub fn finish(&self) {
        if let Ok(mut current) = self.current.lock() {
            if let Some(pb) = current.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl InstallListener for ProgressListener {
    fn on_resolve(&self, name: &str, depth: usize) {
        if depth > 0 {
            self.output.verbose(&format!("Resolving dependency {}", name));
        }
    }

    fn on_download_start(&self, name: &str, url: &str) {
        self.output.verbose(&format!("Downloading {} from {}", name, url));
        self.start(name);
    }

    fn on_progress(&self, done: u64, total: u64) {
        self.advance(done, total);
    }

    fn on_download_complete(&self, _name: &str, filename: &str, size: u64) {
        self.finish();
        self.output
            .verbose(&format!("Downloaded {} ({})", filename, format_bytes(size)));
    }

    fn on_installed(&self, name: &str, path: &Path) {
        self.output
            .list_item("+", &format!("{} ({})", name, path.display()));
    }

    fn on_dependency_failed(&self, parent: &str, dependency: &str, error: &ModError) {
        self.finish();
        self.output.warning(&format!(
            "Could not install dependency {} of {}: {}",
            dependency, parent, error
        ));
    }

    fn on_skipped(&self, name: &str) {
        self.output
            .verbose(&format!("{} already installed in this run, skipping", name));
    }
}

impl Drop for ProgressListener {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Helper to format bytes for display
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
