use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ModError, Result};

/// Raw configuration as stored in `config.json`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_repo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Resolves directories and reads configuration files and `HKMM_*`
/// environment variables
#[derive(Debug)]
pub struct ConfigLoader {
    use_environment: bool,
}

impl ConfigLoader {
    pub fn new(use_environment: bool) -> Self {
        Self { use_environment }
    }

    /// Get an HKMM_* environment variable
    pub fn get_env(&self, var: &str) -> Option<String> {
        if !self.use_environment {
            return None;
        }

        env::var(var).ok().filter(|s| !s.is_empty())
    }

    /// Get the hkmm home directory (holds `config.json`)
    pub fn get_home(&self) -> PathBuf {
        if let Some(home) = self.get_env("HKMM_HOME") {
            return PathBuf::from(home);
        }

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "hkmm") {
            proj_dirs.config_dir().to_path_buf()
        } else if let Some(base) = directories::BaseDirs::new() {
            base.home_dir().join(".hkmm")
        } else {
            PathBuf::from(".hkmm")
        }
    }

    /// Get the cache directory (holds the mod index)
    pub fn get_cache_dir(&self) -> PathBuf {
        if let Some(cache) = self.get_env("HKMM_CACHE_DIR") {
            return PathBuf::from(cache);
        }

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "hkmm") {
            proj_dirs.cache_dir().to_path_buf()
        } else {
            self.get_home().join("cache")
        }
    }

    /// Load configuration from a JSON file; a missing file is empty config
    pub fn load_config_file<P: AsRef<Path>>(&self, path: P) -> Result<RawConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(RawConfig::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ModError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| ModError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Write `raw` as pretty JSON, creating parent directories
    pub fn save_config_file<P: AsRef<Path>>(&self, path: P, raw: &RawConfig) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(raw)
            .map_err(|e| ModError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents + "\n")?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Environment overrides, applied on top of file configuration
    pub fn env_overrides(&self) -> RawConfig {
        RawConfig {
            manifest_url: self.get_env("HKMM_MANIFEST_URL"),
            cache_dir: self.get_env("HKMM_CACHE_DIR").map(PathBuf::from),
            game_path: self.get_env("HKMM_GAME_PATH").map(PathBuf::from),
            api_repo: self.get_env("HKMM_API_REPO"),
            timeout_secs: self.get_env("HKMM_TIMEOUT").and_then(|v| v.parse().ok()),
            connect_timeout_secs: None,
            user_agent: None,
        }
    }
}
