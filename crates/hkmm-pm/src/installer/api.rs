//! Modding API bootstrap: installs the patched game assemblies that load
//! mods from the `Mods` directory.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use crate::downloader::{ArchiveExtractor, ArtifactFetcher};
use crate::game::GameDir;
use crate::http::HttpClient;
use crate::{ModError, Result};

const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
pub struct GithubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<GithubAsset>,
}

#[derive(Debug, Deserialize)]
pub struct GithubAsset {
    pub name: String,
    pub browser_download_url: String,
}

impl GithubRelease {
    pub fn find_asset(&self, name: &str) -> Option<&GithubAsset> {
        self.assets.iter().find(|a| a.name == name)
    }
}

/// Release asset carrying the API build for this platform
pub fn platform_asset_name() -> &'static str {
    if cfg!(target_os = "macos") {
        "ModdingApiMac.zip"
    } else if cfg!(target_os = "linux") {
        "ModdingApiLinux.zip"
    } else {
        "ModdingApiWin.zip"
    }
}

/// Installs the latest modding API release into the game's `Managed` dir
pub struct ModApiInstaller {
    http_client: Arc<HttpClient>,
    fetcher: ArtifactFetcher,
    repo: String,
    api_base: String,
}

impl ModApiInstaller {
    /// `repo` is an `owner/name` GitHub repository
    pub fn new(http_client: Arc<HttpClient>, repo: impl Into<String>) -> Self {
        Self {
            fetcher: ArtifactFetcher::new(Arc::clone(&http_client)),
            http_client,
            repo: repo.into(),
            api_base: GITHUB_API.to_string(),
        }
    }

    /// Point release lookups at another GitHub-compatible API root
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn latest_release(&self) -> Result<GithubRelease> {
        let url = format!("{}/repos/{}/releases/latest", self.api_base, self.repo);
        self.http_client
            .get_json(&url)
            .map_err(|e| ModError::DownloadFailed {
                url,
                status: e.status(),
                reason: e.reason(),
            })
    }

    /// Download the platform asset of the latest release and extract it.
    /// Returns the release tag and the directory written to.
    pub fn install<F>(&self, game: &GameDir, progress: Option<F>) -> Result<(String, PathBuf)>
    where
        F: Fn(u64, u64),
    {
        let release = self.latest_release()?;
        let asset_name = platform_asset_name();
        let asset = release.find_asset(asset_name).ok_or_else(|| ModError::DownloadFailed {
            url: format!("{}/{}", self.repo, release.tag_name),
            status: None,
            reason: format!("release has no asset named {}", asset_name),
        })?;

        log::info!("Installing modding API {} ({})", release.tag_name, asset.name);
        let artifact = self.fetcher.fetch(&asset.browser_download_url, progress)?;

        // The asset name is authoritative; download hosts often rename files
        let managed = game.managed_dir();
        ArchiveExtractor::place(artifact.path(), &asset.name, &managed)?;

        Ok((release.tag_name.clone(), managed))
    }
}
