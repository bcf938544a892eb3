use anyhow::Result;
use clap::Args;

use hkmm_pm::ModInstaller;

use crate::session::Session;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Mod name; several words are joined and `+` stands for a space
    #[arg(value_name = "MOD", required = true, num_args = 1..)]
    pub name: Vec<String>,
}

impl InstallArgs {
    /// The mod name as listed in the index
    pub fn mod_name(&self) -> String {
        self.name.join(" ").replace('+', " ").trim().to_string()
    }
}

pub fn execute(args: InstallArgs, session: &mut Session) -> Result<i32> {
    let name = args.mod_name();

    let manifest = session.config.manifest_store().load()?;
    let game = session.game()?;
    let mods_dir = game.mods_dir();

    session.output.info(&format!("Installing {}", name));
    let installer = ModInstaller::new(manifest, session.fetcher()).with_listener(session.listener());
    let report = installer.install(&mods_dir, &name)?;

    if report.has_warnings() {
        let failed: Vec<&str> = report.failures.iter().map(|f| f.name.as_str()).collect();
        session.output.warning(&format!(
            "{} installed, but these dependencies failed: {}",
            report.name,
            failed.join(", ")
        ));
    } else {
        session.output.success(&format!(
            "Installed {} ({} mod{})",
            report.name,
            report.installed.len(),
            if report.installed.len() == 1 { "" } else { "s" }
        ));
    }

    Ok(0)
}
