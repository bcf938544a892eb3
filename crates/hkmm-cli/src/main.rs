mod commands;
mod output;
mod progress;
mod session;
mod shell;

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

use hkmm_pm::Config;

use commands::Commands;
use output::{Output, Verbosity};
use session::Session;

#[derive(Parser, Debug)]
#[command(name = "hkmm")]
#[command(about = "Hollow Knight mod manager")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Hollow Knight installation directory (skips Steam discovery)
    #[arg(long, global = true, value_name = "PATH")]
    game_path: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Error,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // RUST_LOG takes precedence over -v
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn run(args: Args) -> Result<i32> {
    init_logging(args.verbose);

    let mut config = Config::build(true)?;
    if let Some(path) = args.game_path {
        config.game_path = Some(path);
    }

    let output = Output::new(Verbosity::from_count(args.verbose));
    let mut session = Session::new(config, output, !args.no_progress)?;

    commands::execute(args.command.unwrap_or(Commands::Shell), &mut session)
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            Output::default().report(&e);
            ExitCode::from(commands::exit_code(&e) as u8)
        }
    }
}
