pub mod config;
pub mod downloader;
pub mod error;
pub mod event;
pub mod game;
pub mod http;
pub mod installer;
pub mod manifest;

pub use config::Config;
pub use downloader::{ArchiveExtractor, ArtifactFetcher, FetchedArtifact};
pub use error::{ModError, Result};
pub use event::{InstallListener, NoopListener};
pub use game::{list_installed, GameDir};
pub use http::HttpClient;
pub use installer::{InstallReport, ModApiInstaller, ModInstaller};
pub use manifest::{DependencyRef, Manifest, ManifestSource, ManifestStore, ModRecord};
