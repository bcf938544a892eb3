use anyhow::Result;

use hkmm_pm::ManifestSource;

use crate::session::Session;

pub fn execute(session: &mut Session) -> Result<i32> {
    let source = ManifestSource::new(
        session.http_client(),
        session.config.manifest_url.clone(),
        session.config.manifest_path(),
    );

    session
        .output
        .info(&format!("Updating mod index from {}", source.url()));
    let count = source.refresh()?;

    session.output.success(&format!("Mod index updated: {} mods available", count));
    session
        .output
        .verbose(&format!("Cached at {}", source.cache_path().display()));
    Ok(0)
}
