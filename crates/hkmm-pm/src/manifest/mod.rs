//! The mod index: records of every installable mod, keyed by name.
//!
//! The index is read from a locally cached XML document (see
//! [`ManifestSource`] for refreshing that cache) and is immutable once
//! loaded. Installing never writes back to it.

mod source;
mod xml;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::{ModError, Result};

pub use source::ManifestSource;

/// Reference from one mod to another by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    pub name: String,
}

impl DependencyRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The dependency name, or `None` for blank entries which are skipped
    pub fn usable_name(&self) -> Option<&str> {
        let name = self.name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

/// One entry of the mod index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModRecord {
    pub name: String,
    pub download_url: String,
    pub version: Option<String>,
    pub description: Option<String>,
    /// Expected SHA-256 of the artifact, when the index publishes one
    pub sha256: Option<String>,
    pub dependencies: Vec<DependencyRef>,
}

impl ModRecord {
    pub fn new(name: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            download_url: download_url.into(),
            version: None,
            description: None,
            sha256: None,
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(DependencyRef::new(name));
        self
    }
}

/// Parsed mod index, in document order
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    mods: IndexMap<String, ModRecord>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from records; the first record with a given name wins
    pub fn from_records(records: impl IntoIterator<Item = ModRecord>) -> Self {
        let mut mods = IndexMap::new();
        for record in records {
            if mods.contains_key(&record.name) {
                log::debug!("Ignoring duplicate entry for mod '{}'", record.name);
                continue;
            }
            mods.insert(record.name.clone(), record);
        }
        Self { mods }
    }

    /// Parse a ModLinks XML document
    pub fn from_xml_str(content: &str) -> Result<Self> {
        let raw: xml::RawModLinks = quick_xml::de::from_str(content)
            .map_err(|e| ModError::ManifestParse(e.to_string()))?;

        Ok(Self::from_records(
            raw.manifests.into_iter().filter_map(|m| m.into_record()),
        ))
    }

    /// Read and parse the document at `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ModError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ModError::ManifestParse(format!("{}: {}", path.display(), e)))?;
        let manifest = Self::from_xml_str(&content)?;

        log::debug!("Loaded {} mods from {}", manifest.len(), path.display());
        Ok(manifest)
    }

    /// Exact, case-sensitive lookup
    pub fn lookup(&self, name: &str) -> Result<&ModRecord> {
        self.mods.get(name).ok_or_else(|| ModError::ModNotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.mods.contains_key(name)
    }

    /// Records in document order
    pub fn iter(&self) -> impl Iterator<Item = &ModRecord> {
        self.mods.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.mods.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }
}

/// Loads the cached mod index from a configured location
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Manifest> {
        Manifest::load(&self.path)
    }
}
