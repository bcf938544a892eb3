//! Refreshing the locally cached mod index.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::http::HttpClient;
use crate::{ModError, Result};

use super::Manifest;

/// Remote location of the mod index and where its cached copy lives
pub struct ManifestSource {
    http_client: Arc<HttpClient>,
    url: String,
    cache_path: PathBuf,
}

impl ManifestSource {
    pub fn new(http_client: Arc<HttpClient>, url: impl Into<String>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            http_client,
            url: url.into(),
            cache_path: cache_path.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Download the index and replace the cached copy.
    ///
    /// The document is parsed before it is written, so a broken download
    /// never clobbers a good cache. Returns the number of mods it lists.
    pub fn refresh(&self) -> Result<usize> {
        log::info!("Fetching mod index from {}", self.url);
        let bytes = self
            .http_client
            .get_bytes(&self.url)
            .map_err(|e| ModError::DownloadFailed {
                url: self.url.clone(),
                status: e.status(),
                reason: e.reason(),
            })?;

        let content = String::from_utf8_lossy(&bytes);
        let manifest = Manifest::from_xml_str(&content)?;

        let parent = self
            .cache_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        staged.write_all(&bytes)?;
        staged
            .persist(&self.cache_path)
            .map_err(|e| ModError::Io(e.error))?;

        log::debug!("Cached mod index at {}", self.cache_path.display());
        Ok(manifest.len())
    }
}
