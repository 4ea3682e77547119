//! Strictly Guess - Unified CLI
//!
//! Terminal game, field validation and scripted replays.

#![warn(missing_docs)]

mod cli;

use std::io::{self, Stdout};
use std::path::Path;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use strictly_guess::{
    AppConfig, ReplayScript, ShellController, run_replay, validate_email, validate_name,
    validate_phone,
};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { config } => run_play(config.as_deref()).await,
        Command::Validate { name, email, phone } => {
            init_stderr_tracing();
            run_validate(&name, &email, &phone)
        }
        Command::Replay { script, config } => {
            init_stderr_tracing();
            run_replay_command(&script, config.as_deref())
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .try_init();
}

/// Run the interactive terminal game
async fn run_play(config_path: Option<&Path>) -> Result<()> {
    let config = AppConfig::load(config_path)?;

    // Setup logging to file to avoid interfering with the terminal
    let log_file = std::fs::File::create(config.shell().log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!("Starting Strictly Guess");

    let mut terminal = setup_terminal()?;

    let mut controller = ShellController::new(config);
    let res = controller.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "Shell loop error");
        return Err(err);
    }

    info!("Goodbye");
    Ok(())
}

/// Enter raw mode and the alternate screen, undoing both if setup fails
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    restore_on_error(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        },
        restore_terminal,
    )
}

/// Best-effort terminal reset for failed setup
fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        error!(error = %e, "Failed to leave raw mode");
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
        error!(error = %e, "Failed to leave alternate screen");
    }
}

/// Run `setup`, calling `restore` before returning its error
fn restore_on_error<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    let result = setup();
    if result.is_err() {
        restore();
    }
    result
}

/// Print each field check and fail if any did not pass
#[instrument(skip_all)]
fn run_validate(name: &str, email: &str, phone: &str) -> Result<()> {
    let results = [
        ("name", validate_name(name)),
        ("email", validate_email(email)),
        ("phone", validate_phone(phone)),
    ];

    let mut failed = 0;
    for (field, result) in &results {
        match result {
            Ok(()) => println!("{field}: ok"),
            Err(e) => {
                failed += 1;
                println!("{field}: {e}");
            }
        }
    }

    if failed > 0 {
        bail!("{} field(s) failed validation", failed);
    }
    Ok(())
}

/// Run a replay script and print the report
#[instrument(skip(config_path), fields(script = %script.display()))]
fn run_replay_command(script: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let script = ReplayScript::from_file(script)?;
    let report = run_replay(&script, *config.rules())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_failed_setup_restores_terminal() {
        let restored = Cell::new(false);
        let result: Result<()> = restore_on_error(
            || bail!("alternate screen unavailable"),
            || restored.set(true),
        );
        assert!(result.is_err());
        assert!(restored.get());
    }

    #[test]
    fn test_successful_setup_leaves_terminal_alone() {
        let restored = Cell::new(false);
        let value = restore_on_error(|| Ok(7), || restored.set(true)).unwrap();
        assert_eq!(value, 7);
        assert!(!restored.get());
    }
}
