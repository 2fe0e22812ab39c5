use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(version, about = "An interpreter for a small parenthesized expression language")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate every expression in a source file and print the last value
    Run {
        /// Path to the source file
        file: PathBuf,
    },

    /// Check a source file for syntax errors
    Check {
        /// Path to the source file to check
        file: PathBuf,
    },

    /// Start an interactive REPL session
    Repl {
        /// Do not read or write the history file
        #[arg(long)]
        no_history: bool,
    },
}
