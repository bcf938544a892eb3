//! Command definitions shared by the command line and the interactive shell.

mod available;
mod gamepath;
mod install;
mod install_api;
mod list;
mod update;

use anyhow::Result;
use clap::Subcommand;

use hkmm_pm::ModError;

use crate::session::Session;
use crate::shell;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a mod and its dependencies
    Install(install::InstallArgs),

    /// Download the latest mod index
    Update,

    /// List installed mods
    List,

    /// List mods in the index
    Available(available::AvailableArgs),

    /// Show or set the Hollow Knight installation directory
    Gamepath(gamepath::GamepathArgs),

    /// Install the latest modding API into the game
    InstallApi,

    /// Start the interactive shell
    Shell,
}

pub fn execute(command: Commands, session: &mut Session) -> Result<i32> {
    match command {
        Commands::Install(args) => install::execute(args, session),
        Commands::Update => update::execute(session),
        Commands::List => list::execute(session),
        Commands::Available(args) => available::execute(args, session),
        Commands::Gamepath(args) => gamepath::execute(args, session),
        Commands::InstallApi => install_api::execute(session),
        Commands::Shell => shell::run(session),
    }
}

/// Exit code for an error surfaced by a command
pub fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ModError>())
        .map(ModError::exit_code)
        .unwrap_or(1)
}
