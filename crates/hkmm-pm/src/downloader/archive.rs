//! Placing fetched artifacts: zip extraction or a verbatim copy.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{ModError, Result};

/// Entries whose name starts with this prefix are never extracted
const SKIPPED_PREFIX: &str = "README";

/// Supported archive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    Zip,
}

impl ArchiveType {
    /// Detect archive type from a file name; the extension is case-sensitive
    pub fn from_filename(filename: &str) -> Option<Self> {
        if filename.ends_with(".zip") {
            Some(ArchiveType::Zip)
        } else {
            None
        }
    }
}

/// Archive extractor
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    /// Materialize an artifact in `dest_dir`.
    ///
    /// Archives are extracted (minus `README*` entries); anything else is
    /// copied as `dest_dir/declared_filename`, replacing an existing file.
    /// `dest_dir` is only created once the artifact is known to be usable,
    /// so a corrupt archive leaves nothing behind. Errors name the artifact
    /// by `declared_filename`.
    pub fn place(artifact_path: &Path, declared_filename: &str, dest_dir: &Path) -> Result<()> {
        match ArchiveType::from_filename(declared_filename) {
            Some(ArchiveType::Zip) => {
                log::info!("Extracting {} into {}", declared_filename, dest_dir.display());
                Self::extract_zip(artifact_path, declared_filename, dest_dir)
            }
            None => {
                Self::create_dest(declared_filename, dest_dir)?;
                let target = dest_dir.join(declared_filename);
                log::info!("Copying {} to {}", declared_filename, target.display());
                std::fs::copy(artifact_path, &target)
                    .map(|_| ())
                    .map_err(|e| ModError::unpack(declared_filename, e))
            }
        }
    }

    fn create_dest(declared_filename: &str, dest_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dest_dir).map_err(|e| {
            ModError::unpack(declared_filename, format!("cannot create {}: {}", dest_dir.display(), e))
        })
    }

    /// Extract a zip archive, skipping documentation entries
    fn extract_zip(archive_path: &Path, declared_filename: &str, dest_dir: &Path) -> Result<()> {
        let fail = |reason: String| ModError::unpack(declared_filename, reason);

        let file = File::open(archive_path).map_err(|e| fail(e.to_string()))?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))
            .map_err(|e| fail(format!("failed to open zip: {}", e)))?;

        // Rejects absolute paths and `..` components before anything is written
        for i in 0..archive.len() {
            let entry = archive
                .by_index(i)
                .map_err(|e| fail(format!("failed to read zip entry: {}", e)))?;
            if entry.enclosed_name().is_none() {
                return Err(fail(format!("path traversal detected in archive: {}", entry.name())));
            }
        }

        Self::create_dest(declared_filename, dest_dir)?;

        let mut extracted = 0usize;
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| fail(format!("failed to read zip entry: {}", e)))?;

            if entry.name().starts_with(SKIPPED_PREFIX) {
                log::debug!("Skipping {}", entry.name());
                continue;
            }

            let relative = entry.enclosed_name().ok_or_else(|| {
                fail(format!("path traversal detected in archive: {}", entry.name()))
            })?;
            let outpath = dest_dir.join(relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&outpath).map_err(|e| fail(e.to_string()))?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent).map_err(|e| fail(e.to_string()))?;
            }

            let mut outfile = File::create(&outpath)
                .map_err(|e| fail(format!("cannot write {}: {}", outpath.display(), e)))?;
            std::io::copy(&mut entry, &mut outfile)
                .map_err(|e| fail(format!("cannot write {}: {}", outpath.display(), e)))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                        .map_err(|e| fail(e.to_string()))?;
                }
            }

            extracted += 1;
        }

        log::debug!("Extracted {} files into {}", extracted, dest_dir.display());
        Ok(())
    }
}
