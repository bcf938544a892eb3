//! State shared by every command in one process, including across shell lines.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use hkmm_pm::{ArtifactFetcher, Config, GameDir, HttpClient};

use crate::output::Output;
use crate::progress::ProgressListener;

pub struct Session {
    pub config: Config,
    pub output: Output,
    http_client: Arc<HttpClient>,
    progress: bool,
}

impl Session {
    pub fn new(config: Config, output: Output, progress: bool) -> Result<Self> {
        let http_client = HttpClient::with_config(config.http_config())
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            output,
            http_client: Arc::new(http_client),
            progress,
        })
    }

    pub fn http_client(&self) -> Arc<HttpClient> {
        Arc::clone(&self.http_client)
    }

    pub fn fetcher(&self) -> ArtifactFetcher {
        ArtifactFetcher::new(self.http_client())
    }

    /// Terminal listener for installs and downloads
    pub fn listener(&self) -> Arc<ProgressListener> {
        Arc::new(ProgressListener::new(self.output.clone(), self.progress))
    }

    /// The configured game directory, or the one Steam knows about
    pub fn game(&self) -> hkmm_pm::Result<GameDir> {
        let game = GameDir::resolve(self.config.game_path())?;
        log::debug!("Game directory: {}", game.root().display());
        Ok(game)
    }

    /// Validate and remember a game directory for this and later runs
    pub fn set_game_path(&mut self, path: PathBuf) -> Result<(GameDir, PathBuf)> {
        let game = GameDir::new(path)?;
        let file = self.config.save_game_path(game.root(), true)?;
        Ok((game, file))
    }
}
