//! Interactive prompt reading one command per line.

use anyhow::Result;
use clap::Parser;
use std::io::{BufRead, Write};

use crate::commands::{self, Commands};
use crate::session::Session;

const PROMPT: &str = "hkmm> ";

#[derive(Parser, Debug)]
#[command(name = "hkmm", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug)]
enum Input {
    Empty,
    Exit,
    Command(Commands),
    Invalid(clap::Error),
}

fn parse_line(line: &str) -> Input {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.first() {
        None => Input::Empty,
        Some(&"exit") | Some(&"quit") => Input::Exit,
        Some(_) => match ShellLine::try_parse_from(words) {
            Ok(parsed) => Input::Command(parsed.command),
            Err(e) => Input::Invalid(e),
        },
    }
}

/// Run the prompt until `exit`, `quit` or end of input. Command errors are
/// printed and the prompt continues.
pub fn run(session: &mut Session) -> Result<i32> {
    session
        .output
        .info("hkmm interactive shell; type `help` for commands, `exit` to leave");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    loop {
        print!("{}", PROMPT);
        std::io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            println!();
            break;
        }

        match parse_line(&line) {
            Input::Empty => continue,
            Input::Exit => break,
            Input::Invalid(e) => {
                let _ = e.print();
            }
            Input::Command(Commands::Shell) => session.output.info("Already in the shell"),
            Input::Command(command) => {
                if let Err(e) = commands::execute(command, session) {
                    log::debug!("Command failed with exit code {}", commands::exit_code(&e));
                    session.output.report(&e);
                }
            }
        }
    }

    Ok(0)
}
