use anyhow::Result;

use hkmm_pm::ModApiInstaller;

use crate::session::Session;

pub fn execute(session: &mut Session) -> Result<i32> {
    let game = session.game()?;
    let installer = ModApiInstaller::new(session.http_client(), session.config.api_repo.clone());

    session
        .output
        .info(&format!("Installing modding API from {}", session.config.api_repo));
    let listener = session.listener();
    listener.start("Modding API");
    let (tag, managed) = installer.install(&game, Some(|done, total| listener.advance(done, total)))?;
    listener.finish();

    session.output.success(&format!(
        "Installed modding API {} into {}",
        tag,
        managed.display()
    ));
    Ok(0)
}
