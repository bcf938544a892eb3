//! Output formatting for the CLI.

use console::{style, Term};
use std::io::Write;

/// Verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    /// Map the number of `-v` flags to a level
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }
}

/// Output handler: listings go to stdout, diagnostics to stderr
#[derive(Debug, Clone)]
pub struct Output {
    out: Term,
    err: Term,
    verbosity: Verbosity,
}

impl Output {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            verbosity,
        }
    }

    /// Write a line
    pub fn writeln(&self, message: &str) {
        let _ = writeln!(&self.out, "{}", message);
    }

    /// Write an info message
    pub fn info(&self, message: &str) {
        let _ = writeln!(&self.out, "{}", style(message).cyan());
    }

    /// Write a success message
    pub fn success(&self, message: &str) {
        let _ = writeln!(&self.out, "{}", style(message).green());
    }

    /// Write a warning message
    pub fn warning(&self, message: &str) {
        let _ = writeln!(&self.err, "{} {}", style("Warning:").yellow().bold(), message);
    }

    /// Write an error message
    pub fn error(&self, message: &str) {
        let _ = writeln!(&self.err, "{} {}", style("Error:").red().bold(), message);
    }

    /// Write a verbose message
    pub fn verbose(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            let _ = writeln!(&self.err, "{}", style(message).dim());
        }
    }

    /// Write a list item
    pub fn list_item(&self, prefix: &str, message: &str) {
        let _ = writeln!(&self.out, "  {} {}", style(prefix).green(), message);
    }

    /// Write a table row
    pub fn table_row(&self, columns: &[&str], widths: &[usize]) {
        let mut line = String::new();
        for (i, col) in columns.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(20);
            line.push_str(&format!("{:<width$}", col, width = width));
        }
        let _ = writeln!(&self.out, "{}", line.trim_end());
    }

    /// Print an error with its cause chain
    pub fn report(&self, error: &anyhow::Error) {
        self.error(&error.to_string());
        for cause in error.chain().skip(1) {
            let _ = writeln!(&self.err, "  Caused by: {}", cause);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new(Verbosity::Normal)
    }
}
