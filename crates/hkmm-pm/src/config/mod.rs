//! Configuration management.
//!
//! Values are merged in priority order, highest first:
//!
//! 1. Environment variables (`HKMM_*`)
//! 2. `config.json` in the hkmm home directory (`HKMM_HOME` or the
//!    platform config directory)
//! 3. Built-in defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use hkmm_pm::config::Config;
//!
//! let config = Config::build(true).unwrap();
//! println!("Mod index cached at {:?}", config.manifest_path());
//! ```

mod config;
mod source;

pub use config::{Config, CONFIG_FILENAME, DEFAULT_API_REPO, DEFAULT_MANIFEST_URL, MANIFEST_FILENAME};
pub use source::{ConfigLoader, RawConfig};
