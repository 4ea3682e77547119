//! Number-guessing game: find a hidden multiple of the player's seed digit
//! before the clock or the attempts run out.

mod action;
mod contracts;
mod invariants;
mod rules;
mod session;
mod source;
mod types;

pub use action::{
    GameError, GameEvent, GuessRejection, GuessReport, Operation, Step, Verdict,
};
pub use contracts::{Contract, MonotonicCounters, PhaseAllows, TransitionContract};
pub use invariants::{
    AttemptsInvariant, ClockInvariant, Invariant, InvariantSet, InvariantViolation,
    PhasePayloadInvariant, SessionInvariants, TargetInvariant,
};
pub use rules::{GameRules, RulesError, feedback_for};
pub use session::{GameSession, SessionView};
pub use source::{NumberSource, RandomSource, ScriptedSource};
pub use types::{Feedback, Hint, Outcome, Phase, Seed, SeedError};
