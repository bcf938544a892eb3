use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::http::HttpClientConfig;
use crate::manifest::ManifestStore;
use super::source::{ConfigLoader, RawConfig};

pub const DEFAULT_MANIFEST_URL: &str =
    "https://github.com/hk-modding/modlinks/raw/refs/heads/main/ModLinks.xml";
pub const DEFAULT_API_REPO: &str = "hk-modding/api";
pub const MANIFEST_FILENAME: &str = "ModLinks.xml";
pub const CONFIG_FILENAME: &str = "config.json";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where `update` downloads the mod index from
    pub manifest_url: String,
    /// Directory holding the cached mod index
    pub cache_dir: PathBuf,
    /// Explicit game installation; Steam discovery is used when unset
    pub game_path: Option<PathBuf>,
    /// GitHub `owner/name` publishing the modding API
    pub api_repo: String,
    /// Overall request timeout in seconds
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let http = HttpClientConfig::default();
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            cache_dir: PathBuf::from("cache"),
            game_path: None,
            api_repo: DEFAULT_API_REPO.to_string(),
            timeout_secs: http.timeout.as_secs(),
            connect_timeout_secs: http.connect_timeout.as_secs(),
            user_agent: None,
        }
    }
}

impl Config {
    /// Build the configuration: defaults, then `config.json` in the hkmm
    /// home directory, then `HKMM_*` environment variables.
    pub fn build(use_environment: bool) -> Result<Self> {
        let loader = ConfigLoader::new(use_environment);
        let mut config = Config {
            cache_dir: loader.get_cache_dir(),
            ..Default::default()
        };

        let file = loader.load_config_file(loader.get_home().join(CONFIG_FILENAME))?;
        config.merge(file);
        config.merge(loader.env_overrides());

        log::debug!("Cache directory: {}", config.cache_dir.display());
        Ok(config)
    }

    /// Configuration rooted in `cache_dir`, ignoring files and environment
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ..Default::default()
        }
    }

    /// Overlay every value present in `raw`
    pub fn merge(&mut self, raw: RawConfig) {
        if let Some(url) = raw.manifest_url {
            self.manifest_url = url;
        }
        if let Some(dir) = raw.cache_dir {
            self.cache_dir = dir;
        }
        if let Some(path) = raw.game_path {
            self.game_path = Some(path);
        }
        if let Some(repo) = raw.api_repo {
            self.api_repo = repo;
        }
        if let Some(secs) = raw.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(secs) = raw.connect_timeout_secs {
            self.connect_timeout_secs = secs;
        }
        if let Some(agent) = raw.user_agent {
            self.user_agent = Some(agent);
        }
    }

    /// Cached mod index location
    pub fn manifest_path(&self) -> PathBuf {
        self.cache_dir.join(MANIFEST_FILENAME)
    }

    pub fn manifest_store(&self) -> ManifestStore {
        ManifestStore::new(self.manifest_path())
    }

    pub fn game_path(&self) -> Option<&Path> {
        self.game_path.as_deref()
    }

    /// Remember `game_path` in `config.json`, keeping the other stored keys.
    /// Returns the file written.
    pub fn save_game_path(&mut self, game_path: impl Into<PathBuf>, use_environment: bool) -> Result<PathBuf> {
        let loader = ConfigLoader::new(use_environment);
        let file = loader.get_home().join(CONFIG_FILENAME);

        let game_path = game_path.into();
        let mut raw = loader.load_config_file(&file)?;
        raw.game_path = Some(game_path.clone());
        loader.save_config_file(&file, &raw)?;

        self.game_path = Some(game_path);
        Ok(file)
    }

    pub fn http_config(&self) -> HttpClientConfig {
        let mut http = HttpClientConfig::new()
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs));
        if let Some(agent) = &self.user_agent {
            http = http.with_user_agent(agent.clone());
        }
        http
    }
}
