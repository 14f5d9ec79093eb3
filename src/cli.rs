use std::path::PathBuf;

use clap::Parser;

/// A small lisp with tail calls and macros. Without a file, starts an interactive session.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Script to load instead of starting the repl.
    pub file: Option<String>,

    /// Arguments exposed to the script as *ARGV*.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Prints evaluation traces to stderr.
    #[arg(short, long)]
    pub debug: bool,

    /// Where the repl keeps its history. Defaults to ~/.mal_history.
    #[arg(long)]
    pub history: Option<PathBuf>,
}

impl Options {
    pub fn history_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.history {
            return Some(path.clone());
        }

        let home = std::env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".mal_history"))
    }
}
