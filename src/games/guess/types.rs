//! Core domain types for the guessing game.

use serde::{Deserialize, Serialize};
use tracing::instrument;

// ─────────────────────────────────────────────────────────────
//  Seed
// ─────────────────────────────────────────────────────────────

/// The divisor every target is a multiple of.
///
/// Taken from the last digit of the player's phone number. Always in `1..=9`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
#[display("{}", _0)]
pub struct Seed(u8);

impl Seed {
    /// Smallest legal seed.
    pub const MIN: u8 = 1;
    /// Largest legal seed.
    pub const MAX: u8 = 9;

    /// Creates a seed, rejecting values outside `1..=9`.
    #[instrument]
    pub fn new(value: u8) -> Result<Self, SeedError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SeedError::OutOfRange(value))
        }
    }

    /// Creates a seed, clamping out-of-range values into `1..=9`.
    #[instrument]
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Derives the seed from the trailing digit of a phone number.
    #[instrument]
    pub fn from_phone(phone: &str) -> Result<Self, SeedError> {
        let digit = phone
            .trim()
            .chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .ok_or(SeedError::MissingDigit)?;
        Self::new(digit as u8)
    }

    /// Returns the seed as a number.
    pub fn get(self) -> u32 {
        u32::from(self.0)
    }
}

impl TryFrom<u8> for Seed {
    type Error = SeedError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Seed> for u8 {
    fn from(seed: Seed) -> Self {
        seed.0
    }
}

/// Error building a [`Seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SeedError {
    /// The digit is outside `1..=9`.
    #[display("seed {} is outside {}..={}", _0, Seed::MIN, Seed::MAX)]
    OutOfRange(u8),

    /// The phone number does not end in a digit.
    #[display("phone number does not end in a digit")]
    MissingDigit,
}

impl std::error::Error for SeedError {}

// ─────────────────────────────────────────────────────────────
//  Phase
// ─────────────────────────────────────────────────────────────

/// Where a session is in its lifecycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Phase {
    /// Created, waiting for the player to press start.
    NotStarted,
    /// Clock running, guesses accepted.
    InProgress,
    /// A wrong guess was made; the player must try again or give up.
    AwaitingFeedbackAck,
    /// The target was guessed.
    Won,
    /// Time ran out, attempts ran out, or the player gave up.
    Lost,
}

impl Phase {
    /// Returns true for `Won` and `Lost`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

// ─────────────────────────────────────────────────────────────
//  Outcome, feedback, hint
// ─────────────────────────────────────────────────────────────

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The target was guessed.
    Won {
        /// Guesses it took, counting the winning one.
        attempts_used: u32,
    },
    /// The countdown reached zero.
    TimeExceeded,
    /// The last attempt was a wrong guess.
    AttemptsExhausted,
    /// The player chose to end the game from the feedback card.
    PlayerEnded,
}

impl Outcome {
    /// Returns true if the player won.
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Won { .. })
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Won { attempts_used: 1 } => write!(f, "you guessed it in 1 attempt"),
            Outcome::Won { attempts_used } => {
                write!(f, "you guessed it in {} attempts", attempts_used)
            }
            Outcome::TimeExceeded => write!(f, "time exceeded"),
            Outcome::AttemptsExhausted => write!(f, "attempts exhausted"),
            Outcome::PlayerEnded => write!(f, "player ended the session"),
        }
    }
}

/// Direction hint after a wrong guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Feedback {
    /// The guess was above the target.
    #[display("guess lower")]
    GuessLower,
    /// The guess was below the target.
    #[display("guess higher")]
    GuessHigher,
}

/// The single hint a session may reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Hint {
    /// Target is above the threshold.
    #[display("greater than {}", _0)]
    GreaterThan(u32),
    /// Target is at or below the threshold.
    #[display("less than or equal to {}", _0)]
    AtMost(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_bounds() {
        assert!(Seed::new(0).is_err());
        assert_eq!(Seed::new(1).map(Seed::get), Ok(1));
        assert_eq!(Seed::new(9).map(Seed::get), Ok(9));
        assert_eq!(Seed::new(10), Err(SeedError::OutOfRange(10)));
    }

    #[test]
    fn test_seed_clamped() {
        assert_eq!(Seed::clamped(0).get(), 1);
        assert_eq!(Seed::clamped(5).get(), 5);
        assert_eq!(Seed::clamped(42).get(), 9);
    }

    #[test]
    fn test_seed_from_phone() {
        assert_eq!(Seed::from_phone("5551234567").map(Seed::get), Ok(7));
        assert_eq!(Seed::from_phone("555123456x"), Err(SeedError::MissingDigit));
        assert_eq!(Seed::from_phone(""), Err(SeedError::MissingDigit));
        assert_eq!(Seed::from_phone("5551234560"), Err(SeedError::OutOfRange(0)));
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(Outcome::TimeExceeded.to_string(), "time exceeded");
        assert_eq!(Outcome::AttemptsExhausted.to_string(), "attempts exhausted");
        assert_eq!(Outcome::PlayerEnded.to_string(), "player ended the session");
        assert_eq!(
            Outcome::Won { attempts_used: 1 }.to_string(),
            "you guessed it in 1 attempt"
        );
        assert_eq!(
            Outcome::Won { attempts_used: 3 }.to_string(),
            "you guessed it in 3 attempts"
        );
    }

    #[test]
    fn test_feedback_and_hint_text() {
        assert_eq!(Feedback::GuessLower.to_string(), "guess lower");
        assert_eq!(Feedback::GuessHigher.to_string(), "guess higher");
        assert_eq!(Hint::GreaterThan(50).to_string(), "greater than 50");
        assert_eq!(Hint::AtMost(50).to_string(), "less than or equal to 50");
    }

    #[test]
    fn test_terminal_phases() {
        use strum::IntoEnumIterator;
        let terminal: Vec<Phase> = Phase::iter().filter(|p| p.is_terminal()).collect();
        assert_eq!(terminal, vec![Phase::Won, Phase::Lost]);
    }
}
