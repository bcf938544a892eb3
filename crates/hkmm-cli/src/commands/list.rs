use anyhow::Result;

use hkmm_pm::list_installed;

use crate::session::Session;

pub fn execute(session: &mut Session) -> Result<i32> {
    let game = session.game()?;
    let mods_dir = game.mods_dir();
    let installed = list_installed(&mods_dir)?;

    if installed.is_empty() {
        session
            .output
            .info(&format!("No mods installed in {}", mods_dir.display()));
        return Ok(0);
    }

    for name in &installed {
        session.output.writeln(name);
    }
    Ok(0)
}
