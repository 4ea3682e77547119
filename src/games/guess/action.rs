//! First-class events and results for the guessing game.
//!
//! Player and clock actions are domain events, not side effects. The shell
//! and the replay runner both feed them through [`GameSession::apply`].
//!
//! [`GameSession::apply`]: super::GameSession::apply

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

use super::session::GameSession;
use super::types::{Feedback, Phase, Seed};

/// Something that happens to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player pressed start.
    Start,
    /// One second elapsed.
    Tick,
    /// The player submitted guess text.
    Guess(String),
    /// The player asked for the hint.
    Hint,
    /// The player dismissed the feedback card to keep playing.
    TryAgain,
    /// The player gave up from the feedback card.
    EndGame,
    /// The player asked for a fresh session after the end.
    NewSession,
}

impl GameEvent {
    /// The operation this event invokes.
    pub fn operation(&self) -> Operation {
        match self {
            GameEvent::Start => Operation::Start,
            GameEvent::Tick => Operation::Tick,
            GameEvent::Guess(_) => Operation::SubmitGuess,
            GameEvent::Hint => Operation::UseHint,
            GameEvent::TryAgain => Operation::TryAgain,
            GameEvent::EndGame => Operation::EndGame,
            GameEvent::NewSession => Operation::NewSession,
        }
    }
}

/// Engine operations, used for precondition checks and error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, strum::EnumIter)]
pub enum Operation {
    /// Begin play.
    #[display("start")]
    Start,
    /// Count down one second.
    #[display("tick")]
    Tick,
    /// Judge a guess.
    #[display("submit a guess")]
    SubmitGuess,
    /// Reveal the hint.
    #[display("use the hint")]
    UseHint,
    /// Leave the feedback card and keep playing.
    #[display("try again")]
    TryAgain,
    /// Leave the feedback card and give up.
    #[display("end the game")]
    EndGame,
    /// Replace a finished session.
    #[display("start a new session")]
    NewSession,
}

impl Operation {
    /// Returns true if the operation may run from `phase`.
    pub fn allowed_from(self, phase: Phase) -> bool {
        match self {
            Operation::Start => phase == Phase::NotStarted,
            Operation::Tick | Operation::SubmitGuess | Operation::UseHint => {
                phase == Phase::InProgress
            }
            Operation::TryAgain | Operation::EndGame => phase == Phase::AwaitingFeedbackAck,
            Operation::NewSession => phase.is_terminal(),
        }
    }
}

/// Why a guess was refused without costing an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum GuessRejection {
    /// Not an integer.
    #[display("{:?} is not a number", _0)]
    InvalidInput(String),

    /// Outside `1..=upper_bound`.
    #[display("{} is not between 1 and {}", input, upper_bound)]
    OutOfRange {
        /// The text as entered (trimmed).
        input: String,
        /// Largest legal guess.
        upper_bound: u32,
    },

    /// Not a multiple of the seed.
    #[display("{} is not a multiple of {}", value, seed)]
    NotAMultiple {
        /// The parsed guess.
        value: u32,
        /// The session seed.
        seed: Seed,
    },
}

/// How a submitted guess was judged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// Refused; attempts and phase untouched.
    Rejected(GuessRejection),
    /// Wrong, attempts remain; the feedback card is showing.
    Wrong(Feedback),
    /// Wrong on the last attempt; the session is lost.
    Exhausted,
    /// Hit the target; the session is won.
    Correct {
        /// Guesses it took, counting the winning one.
        attempts_used: u32,
    },
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Rejected(reason) => write!(f, "rejected: {}", reason),
            Verdict::Wrong(feedback) => write!(f, "wrong: {}", feedback),
            Verdict::Exhausted => write!(f, "wrong: attempts exhausted"),
            Verdict::Correct { attempts_used } => {
                write!(f, "correct after {} attempt(s)", attempts_used)
            }
        }
    }
}

/// Result of [`GameSession::submit_guess`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GuessReport {
    session: GameSession,
    verdict: Verdict,
}

impl GuessReport {
    pub(super) fn new(session: GameSession, verdict: Verdict) -> Self {
        Self { session, verdict }
    }

    /// Splits the report into its parts.
    pub fn into_parts(self) -> (GameSession, Verdict) {
        (self.session, self.verdict)
    }
}

/// Result of applying any [`GameEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Step {
    session: GameSession,
    verdict: Option<Verdict>,
}

impl Step {
    pub(super) fn new(session: GameSession, verdict: Option<Verdict>) -> Self {
        Self { session, verdict }
    }

    /// Splits the step into its parts.
    pub fn into_parts(self) -> (GameSession, Option<Verdict>) {
        (self.session, self.verdict)
    }
}

/// Error that can occur when driving a session.
///
/// Rejected guesses are not errors; see [`Verdict::Rejected`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// The operation is not legal from the current phase.
    #[display("cannot {} while the game is {}", operation, phase)]
    InvalidTransition {
        /// What was attempted.
        operation: Operation,
        /// The phase it was attempted from.
        phase: Phase,
    },

    /// A postcondition failed after a transition.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for GameError {}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_each_operation_has_a_source_phase() {
        for op in Operation::iter() {
            assert!(
                Phase::iter().any(|p| op.allowed_from(p)),
                "{} is unreachable",
                op
            );
        }
    }

    #[test]
    fn test_terminal_phases_only_allow_new_session() {
        for op in Operation::iter() {
            let allowed = op.allowed_from(Phase::Won);
            assert_eq!(allowed, op == Operation::NewSession, "{}", op);
            assert_eq!(op.allowed_from(Phase::Lost), allowed, "{}", op);
        }
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = GameError::InvalidTransition {
            operation: Operation::Start,
            phase: Phase::Won,
        };
        assert_eq!(err.to_string(), "cannot start while the game is Won");
    }

    #[test]
    fn test_rejection_messages() {
        let r = GuessRejection::InvalidInput("x".into());
        assert_eq!(r.to_string(), "\"x\" is not a number");
        let r = GuessRejection::NotAMultiple {
            value: 10,
            seed: Seed::clamped(3),
        };
        assert_eq!(r.to_string(), "10 is not a multiple of 3");
    }
}
