//! Scripted, headless runs of the game engine.
//!
//! A replay script names a phone number, the targets the number source
//! should hand out, and a list of player events. Running it yields the
//! final session plus a one-line summary per event.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::games::guess::{
    GameEvent, GameRules, GameSession, Phase, ScriptedSource, Seed, SeedError,
};
use crate::registration::validate_phone;

/// One scripted player action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Press start.
    Start,
    /// Let `count` seconds pass.
    Tick {
        /// Number of ticks.
        #[serde(default = "one")]
        count: u32,
    },
    /// Submit a guess.
    Guess {
        /// Raw text as typed.
        input: String,
    },
    /// Reveal the hint.
    Hint,
    /// Dismiss the feedback card.
    TryAgain,
    /// Give up from the feedback card.
    EndGame,
    /// Start over after the game ends.
    NewSession,
}

fn one() -> u32 {
    1
}

impl ScriptEvent {
    /// The engine event this applies, and how many times at most.
    fn event(&self) -> (GameEvent, u32) {
        match self {
            Self::Start => (GameEvent::Start, 1),
            Self::Tick { count } => (GameEvent::Tick, *count),
            Self::Guess { input } => (GameEvent::Guess(input.clone()), 1),
            Self::Hint => (GameEvent::Hint, 1),
            Self::TryAgain => (GameEvent::TryAgain, 1),
            Self::EndGame => (GameEvent::EndGame, 1),
            Self::NewSession => (GameEvent::NewSession, 1),
        }
    }
}

/// A replay script.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplayScript {
    phone: String,
    #[serde(default)]
    targets: Vec<u32>,
    #[serde(default)]
    events: Vec<ScriptEvent>,
}

impl ReplayScript {
    /// Loads a script from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ReplayError::new(format!("Failed to read script: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses a script from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ReplayError> {
        let script: Self = toml::from_str(content)
            .map_err(|e| ReplayError::new(format!("Failed to parse script: {}", e)))?;
        debug!(events = script.events.len(), "Script parsed");
        Ok(script)
    }
}

/// Result of a replay.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct ReplayReport {
    steps: Vec<String>,
    session: GameSession,
}

/// Runs `script` under `rules`.
///
/// Each scripted event yields one step line. Rejected guesses are recorded
/// and the run continues. An operation the current phase does not allow
/// stops the run. A tick run stops early once the clock is frozen.
#[instrument(skip(script, rules), fields(events = script.events.len()))]
pub fn run_replay(script: &ReplayScript, rules: GameRules) -> Result<ReplayReport, ReplayError> {
    validate_phone(&script.phone)
        .map_err(|e| ReplayError::new(format!("Bad phone number: {}", e)))?;
    let seed = Seed::from_phone(&script.phone)?;
    let mut source = ScriptedSource::new(script.targets.iter().copied());
    let mut session = GameSession::create(seed, rules, &mut source);
    let mut steps = Vec::with_capacity(script.events.len());

    for (index, scripted) in script.events.iter().enumerate() {
        let (event, times) = scripted.event();
        let mut applied = 0;
        let mut verdict = None;
        while applied < times {
            let step = session.apply(&event, &mut source).map_err(|e| {
                ReplayError::new(format!("Event {} ({}) failed: {}", index + 1, event.operation(), e))
            })?;
            let (next, step_verdict) = step.into_parts();
            session = next;
            verdict = step_verdict;
            applied += 1;
            if session.phase() != Phase::InProgress {
                break;
            }
        }

        let label = match scripted {
            ScriptEvent::Tick { count } => {
                format!("{} x{} (applied {})", event.operation(), count, applied)
            }
            _ => event.operation().to_string(),
        };
        let line = match verdict {
            Some(verdict) => format!("{}: {}", label, verdict),
            None => format!(
                "{}: {} ({}s, {} attempts left)",
                label,
                session.phase(),
                session.seconds_remaining(),
                session.attempts_remaining()
            ),
        };
        debug!(step = %line, "Replayed");
        steps.push(line);
    }

    info!(phase = %session.phase(), steps = steps.len(), "Replay finished");
    Ok(ReplayReport { steps, session })
}

/// Replay error.
#[derive(Debug, Clone, Display, Error)]
#[display("Replay error: {} at {}:{}", message, file, line)]
pub struct ReplayError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ReplayError {
    /// Creates a new replay error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<SeedError> for ReplayError {
    #[track_caller]
    fn from(e: SeedError) -> Self {
        Self::new(format!("Bad phone number: {}", e))
    }
}
