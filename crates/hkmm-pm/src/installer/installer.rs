use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::downloader::{verify_sha256, ArchiveExtractor, ArtifactFetcher};
use crate::event::{InstallListener, NoopListener};
use crate::manifest::Manifest;
use crate::Result;

/// A dependency that could not be installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyFailure {
    /// Mod that declared the dependency
    pub parent: String,
    pub name: String,
    pub error: String,
    pub exit_code: i32,
}

/// Outcome of a successful top-level install
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// The requested mod
    pub name: String,
    /// Where the requested mod was placed
    pub path: PathBuf,
    /// Every mod placed during this install, in install order
    pub installed: Vec<String>,
    /// Dependencies that failed; the install still succeeded
    pub failures: Vec<DependencyFailure>,
    /// Names reached again through the dependency graph and not reinstalled
    pub skipped: Vec<String>,
}

impl InstallReport {
    pub fn has_warnings(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Installs mods and their dependencies into a mods directory
pub struct ModInstaller {
    manifest: Manifest,
    fetcher: ArtifactFetcher,
    listener: Arc<dyn InstallListener>,
}

impl ModInstaller {
    pub fn new(manifest: Manifest, fetcher: ArtifactFetcher) -> Self {
        Self {
            manifest,
            fetcher,
            listener: Arc::new(NoopListener),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn InstallListener>) -> Self {
        self.listener = listener;
        self
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Install `name` into `mods_root/name`, then its dependencies.
    ///
    /// Errors for the requested mod abort and are returned. Errors for any
    /// dependency are logged, passed to the listener and recorded in the
    /// report, and the install carries on.
    pub fn install(&self, mods_root: &Path, name: &str) -> Result<InstallReport> {
        let mut report = InstallReport {
            name: name.to_string(),
            path: mods_root.join(name),
            ..Default::default()
        };
        let mut visited = HashSet::new();

        self.install_recursive(mods_root, name, 0, &mut visited, &mut report)?;

        Ok(report)
    }

    fn install_recursive(
        &self,
        mods_root: &Path,
        name: &str,
        depth: usize,
        visited: &mut HashSet<String>,
        report: &mut InstallReport,
    ) -> Result<()> {
        if !visited.insert(name.to_string()) {
            log::debug!("'{}' already handled in this install, skipping", name);
            self.listener.on_skipped(name);
            report.skipped.push(name.to_string());
            return Ok(());
        }

        self.listener.on_resolve(name, depth);
        let record = self.manifest.lookup(name)?;

        self.place_mod(mods_root, &record.name, &record.download_url, record.sha256.as_deref())?;
        report.installed.push(record.name.clone());

        for dependency in &record.dependencies {
            let Some(dep_name) = dependency.usable_name() else {
                continue;
            };

            log::info!("Installing dependency {} of {}", dep_name, name);
            if let Err(e) = self.install_recursive(mods_root, dep_name, depth + 1, visited, report) {
                log::warn!("Failed to install dependency {} of {}: {}", dep_name, name, e);
                self.listener.on_dependency_failed(name, dep_name, &e);
                report.failures.push(DependencyFailure {
                    parent: name.to_string(),
                    name: dep_name.to_string(),
                    error: e.to_string(),
                    exit_code: e.exit_code(),
                });
            }
        }

        Ok(())
    }

    /// Fetch one artifact and place it; the temporary download is removed
    /// when this returns.
    fn place_mod(&self, mods_root: &Path, name: &str, url: &str, sha256: Option<&str>) -> Result<()> {
        self.listener.on_download_start(name, url);
        let listener = &self.listener;
        let artifact = self
            .fetcher
            .fetch(url, Some(|done, total| listener.on_progress(done, total)))?;
        self.listener
            .on_download_complete(name, artifact.filename(), artifact.size());

        if let Some(expected) = sha256 {
            verify_sha256(artifact.path(), expected, url)?;
        }

        let destination = mods_root.join(name);
        ArchiveExtractor::place(artifact.path(), artifact.filename(), &destination)?;

        log::info!("Installed {} into {}", name, destination.display());
        self.listener.on_installed(name, &destination);
        Ok(())
    }
}

/// Convenience for callers that only need the exit code of an outcome
pub fn exit_code(result: &Result<InstallReport>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.exit_code(),
    }
}
