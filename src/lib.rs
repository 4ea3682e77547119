//! Strictly Guess library - a number-guessing game with a typed state engine
//!
//! A hidden multiple of the player's seed digit must be found before a
//! countdown or the attempt budget runs out.
//!
//! # Architecture
//!
//! - **Games**: the session state machine, its rules, invariants and contracts
//! - **Registration**: form validation that yields the player's seed
//! - **Timer**: a cancellable countdown task
//! - **Shell**: ratatui screens and the controller that drives them
//! - **Replay**: headless, scripted runs of the engine
//!
//! # Example
//!
//! ```
//! use strictly_guess::{GameRules, GameSession, ScriptedSource, Seed};
//!
//! let mut source = ScriptedSource::new([9, 9]);
//! let session = GameSession::create(Seed::new(3)?, GameRules::default(), &mut source);
//! let session = session.start(&mut source)?;
//! let (session, _verdict) = session.submit_guess("9")?.into_parts();
//! assert_eq!(session.outcome_message().as_deref(), Some("you guessed it in 1 attempt"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod games;
mod palette;
mod registration;
mod replay;
mod shell;
mod timer;

// Crate-level exports - Configuration
pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE, ShellConfig};

// Crate-level exports - Game engine
pub use games::guess::{
    AttemptsInvariant, ClockInvariant, Contract, Feedback, GameError, GameEvent, GameRules,
    GameSession, GuessRejection, GuessReport, Hint, Invariant, InvariantSet, InvariantViolation,
    MonotonicCounters, NumberSource, Operation, Outcome, Phase, PhaseAllows, PhasePayloadInvariant,
    RandomSource, RulesError, ScriptedSource, Seed, SeedError, SessionInvariants, SessionView,
    Step, TargetInvariant, TransitionContract, Verdict, feedback_for,
};

// Crate-level exports - Registration
pub use registration::{
    FieldError, Player, Registration, RegistrationError, validate_email, validate_name,
    validate_phone,
};

// Crate-level exports - Timer
pub use timer::CountdownTimer;

// Crate-level exports - Terminal shell
pub use palette::{PALETTE, Palette};
pub use shell::{
    ConfirmScreen, GameScreen, LiveGame, Screen, ScreenTransition, ShellController, StartScreen,
};

// Crate-level exports - Replay
pub use replay::{ReplayError, ReplayReport, ReplayScript, ScriptEvent, run_replay};
