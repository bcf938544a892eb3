//! Hollow Knight installation layout.
//!
//! Locates the game through Steam and knows where the managed assemblies
//! and the `Mods` directory live inside it.

use std::path::{Path, PathBuf};

use crate::{ModError, Result};

/// Steam app id of Hollow Knight
pub const STEAM_APP_ID: u32 = 367520;

/// Directory inside the mods folder used by mod managers for disabled mods
pub const DISABLED_DIR: &str = "Disabled";

/// Data directories relative to the game root, most common first
const DATA_DIRS: &[&str] = &[
    "hollow_knight_Data",
    "Hollow Knight_Data",
    "hollow_knight.app/Contents/Resources/Data",
];

/// A Hollow Knight installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDir {
    root: PathBuf,
}

impl GameDir {
    /// Use an explicit installation directory
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ModError::GameNotFound(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Find the game in the local Steam libraries
    pub fn locate() -> Result<Self> {
        let steam_dir = steamlocate::SteamDir::locate()
            .map_err(|e| ModError::GameNotFound(format!("Steam not found: {}", e)))?;

        if let Some((app, library)) = steam_dir.find_app(STEAM_APP_ID).ok().flatten() {
            let path = library.resolve_app_dir(&app);
            log::debug!("Steam reports Hollow Knight at {}", path.display());
            return Self::new(path);
        }

        Err(ModError::GameNotFound(format!(
            "Steam app {} is not installed",
            STEAM_APP_ID
        )))
    }

    /// Prefer an explicit path, fall back to Steam discovery
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::new(path),
            None => Self::locate(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The game's `Managed` directory holding Assembly-CSharp and the mod API
    pub fn managed_dir(&self) -> PathBuf {
        let data_dir = DATA_DIRS
            .iter()
            .map(|d| self.root.join(d))
            .find(|p| p.is_dir())
            .unwrap_or_else(|| self.root.join(DATA_DIRS[0]));
        data_dir.join("Managed")
    }

    /// Where mods are installed, one directory per mod
    pub fn mods_dir(&self) -> PathBuf {
        self.managed_dir().join("Mods")
    }
}

/// Names of installed mods: every directory under `mods_dir` except the
/// reserved `Disabled` one, sorted.
pub fn list_installed(mods_dir: &Path) -> Result<Vec<String>> {
    if !mods_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut mods = Vec::new();
    for entry in std::fs::read_dir(mods_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != DISABLED_DIR {
            mods.push(name);
        }
    }
    mods.sort();
    Ok(mods)
}

/// A mod counts as installed when its directory exists
pub fn is_installed(mods_dir: &Path, name: &str) -> bool {
    mods_dir.join(name).is_dir()
}
