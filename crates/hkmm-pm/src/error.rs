use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModError {
    // Manifest errors
    #[error("Mod index not found at {}; run `update` first", path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("Failed to parse mod index: {0}")]
    ManifestParse(String),

    // Lookup errors
    #[error("Mod '{name}' not found in the mod index")]
    ModNotFound { name: String },

    // Download errors
    #[error("Download failed for {url}: {}", describe_failure(*status, reason))]
    DownloadFailed {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    // Placement errors
    #[error("Failed to unpack {artifact}: {reason}")]
    UnpackFailed { artifact: String, reason: String },

    // Game discovery errors
    #[error("Hollow Knight installation not found: {0}")]
    GameNotFound(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_failure(status: Option<u16>, reason: &str) -> String {
    match status {
        Some(code) => format!("HTTP {} {}", code, reason),
        None => reason.to_string(),
    }
}

impl ModError {
    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            ModError::ModNotFound { .. } => 2,
            ModError::DownloadFailed { .. } => 3,
            ModError::UnpackFailed { .. } => 4,
            ModError::ManifestNotFound { .. } => 5,
            ModError::ManifestParse(_) => 6,
            ModError::ChecksumMismatch { .. } => 7,
            ModError::GameNotFound(_) => 8,
            ModError::Config(_) | ModError::Io(_) => 1,
        }
    }

    /// `artifact` is the name the download was declared under
    pub(crate) fn unpack(artifact: impl Into<String>, reason: impl ToString) -> Self {
        ModError::UnpackFailed {
            artifact: artifact.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModError>;
