//! Mod installation.
//!
//! This module resolves mods against the index, fetches and places their
//! artifacts in the mods directory, and walks declared dependencies.

mod api;
mod installer;

pub use api::{platform_asset_name, GithubAsset, GithubRelease, ModApiInstaller};
pub use installer::{exit_code, DependencyFailure, InstallReport, ModInstaller};
