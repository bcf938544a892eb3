use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::session::Session;

#[derive(Args, Debug)]
pub struct GamepathArgs {
    /// New installation directory; prints the current one when omitted
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

pub fn execute(args: GamepathArgs, session: &mut Session) -> Result<i32> {
    let Some(path) = args.path else {
        let game = session.game()?;
        session.output.writeln(&game.root().display().to_string());
        return Ok(0);
    };

    let (game, file) = session.set_game_path(path)?;
    session
        .output
        .success(&format!("Game path set to {}", game.root().display()));
    session
        .output
        .verbose(&format!("Saved to {}", file.display()));
    Ok(0)
}
