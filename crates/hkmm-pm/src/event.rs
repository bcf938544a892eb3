//! Install progress notifications.
//!
//! The installer reports what it is doing through an [`InstallListener`]
//! so that terminal presentation (progress bars, colored warnings) stays
//! out of the install logic. Every method has a no-op default.

use std::path::Path;

use crate::error::ModError;

pub trait InstallListener {
    /// A mod name is about to be resolved against the index.
    fn on_resolve(&self, _name: &str, _depth: usize) {}

    /// The artifact download for `name` has started.
    fn on_download_start(&self, _name: &str, _url: &str) {}

    /// Bytes received so far; `total` is 0 when unknown.
    fn on_progress(&self, _done: u64, _total: u64) {}

    /// The artifact has been fully written to temporary storage.
    fn on_download_complete(&self, _name: &str, _filename: &str, _size: u64) {}

    /// The mod was placed in its destination directory.
    fn on_installed(&self, _name: &str, _path: &Path) {}

    /// A dependency could not be installed; the parent install continues.
    fn on_dependency_failed(&self, _parent: &str, _dependency: &str, _error: &ModError) {}

    /// `name` was already handled earlier in this install and is skipped.
    fn on_skipped(&self, _name: &str) {}
}

/// Listener that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl InstallListener for NoopListener {}
