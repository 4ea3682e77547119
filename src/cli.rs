//! Command-line interface for strictly_guess.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Strictly Guess - number-guessing game with a typed state engine
#[derive(Parser, Debug)]
#[command(name = "strictly_guess")]
#[command(about = "Guess the hidden multiple before time or attempts run out", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Path to a TOML config file (defaults to strictly_guess.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check registration fields without playing
    Validate {
        /// Display name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// 10-digit phone number
        #[arg(long)]
        phone: String,
    },

    /// Run a scripted game and print the result as JSON
    Replay {
        /// Path to a TOML replay script
        script: PathBuf,

        /// Path to a TOML config file (defaults to strictly_guess.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
