//! Artifact downloading and placement.
//!
//! This module fetches mod artifacts over HTTP into scoped temporary
//! directories and materializes them in the mods directory, either by
//! extracting a zip archive or by copying the file verbatim.

mod archive;
mod checksum;
mod file;

pub use archive::{ArchiveExtractor, ArchiveType};
pub use checksum::{compute_sha256, verify_sha256};
pub use file::{declared_filename, parse_content_disposition, ArtifactFetcher, FetchedArtifact, FALLBACK_FILENAME};
