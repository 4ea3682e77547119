//! Numeric rules: candidate targets, guess judging, hints.

use serde::Deserialize;
use tracing::{debug, instrument};

use super::action::GuessRejection;
use super::types::{Feedback, Hint, Seed};

/// Tunable constants of a session.
///
/// Construction goes through [`GameRules::new`] so the candidate set for any
/// seed is never empty and the hint threshold splits the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RulesFile")]
pub struct GameRules {
    seconds: u32,
    attempts: u32,
    upper_bound: u32,
    hint_threshold: u32,
}

impl GameRules {
    /// Seconds on the clock at start.
    pub const DEFAULT_SECONDS: u32 = 60;
    /// Attempts available at start.
    pub const DEFAULT_ATTEMPTS: u32 = 4;
    /// Largest possible target.
    pub const DEFAULT_UPPER_BOUND: u32 = 100;
    /// Hint split point.
    pub const DEFAULT_HINT_THRESHOLD: u32 = 50;

    /// Creates a validated rule set.
    #[instrument]
    pub fn new(
        seconds: u32,
        attempts: u32,
        upper_bound: u32,
        hint_threshold: u32,
    ) -> Result<Self, RulesError> {
        if seconds == 0 {
            return Err(RulesError::NoTime);
        }
        if attempts == 0 {
            return Err(RulesError::NoAttempts);
        }
        if upper_bound < u32::from(Seed::MAX) {
            return Err(RulesError::UpperBoundTooSmall(upper_bound));
        }
        if hint_threshold == 0 || hint_threshold >= upper_bound {
            return Err(RulesError::ThresholdOutsideRange {
                threshold: hint_threshold,
                upper_bound,
            });
        }
        Ok(Self {
            seconds,
            attempts,
            upper_bound,
            hint_threshold,
        })
    }

    /// Seconds on the clock when a session starts.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Attempts available when a session starts.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Largest legal guess and target.
    pub fn upper_bound(&self) -> u32 {
        self.upper_bound
    }

    /// Value the hint compares the target against.
    pub fn hint_threshold(&self) -> u32 {
        self.hint_threshold
    }

    /// All multiples of `seed` in `1..=upper_bound`, ascending.
    ///
    /// Never empty: `seed <= 9 <= upper_bound`.
    #[instrument(skip(self))]
    pub fn candidates(&self, seed: Seed) -> Vec<u32> {
        let step = seed.get() as usize;
        (seed.get()..=self.upper_bound).step_by(step).collect()
    }

    /// Returns true if `value` could be a target for `seed`.
    pub fn is_candidate(&self, seed: Seed, value: u32) -> bool {
        (1..=self.upper_bound).contains(&value) && value % seed.get() == 0
    }

    /// Validates raw guess text. First failing check wins:
    /// integer, then range, then multiple of the seed.
    #[instrument(skip(self))]
    pub fn judge(&self, seed: Seed, raw: &str) -> Result<u32, GuessRejection> {
        let trimmed = raw.trim();
        let value: i64 = match trimmed.parse() {
            Ok(value) => value,
            Err(e) => {
                return Err(match e.kind() {
                    std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow => {
                        GuessRejection::OutOfRange {
                            input: trimmed.to_string(),
                            upper_bound: self.upper_bound,
                        }
                    }
                    _ => GuessRejection::InvalidInput(trimmed.to_string()),
                });
            }
        };

        let value = match u32::try_from(value) {
            Ok(v) if (1..=self.upper_bound).contains(&v) => v,
            _ => {
                return Err(GuessRejection::OutOfRange {
                    input: trimmed.to_string(),
                    upper_bound: self.upper_bound,
                });
            }
        };

        if value % seed.get() != 0 {
            return Err(GuessRejection::NotAMultiple { value, seed });
        }

        debug!(value, "Guess accepted for judging");
        Ok(value)
    }

    /// The hint for a target.
    pub fn hint_for(&self, target: u32) -> Hint {
        if target > self.hint_threshold {
            Hint::GreaterThan(self.hint_threshold)
        } else {
            Hint::AtMost(self.hint_threshold)
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            seconds: Self::DEFAULT_SECONDS,
            attempts: Self::DEFAULT_ATTEMPTS,
            upper_bound: Self::DEFAULT_UPPER_BOUND,
            hint_threshold: Self::DEFAULT_HINT_THRESHOLD,
        }
    }
}

/// Directional feedback for a guess, or `None` when it hits.
pub fn feedback_for(guess: u32, target: u32) -> Option<Feedback> {
    match guess.cmp(&target) {
        std::cmp::Ordering::Greater => Some(Feedback::GuessLower),
        std::cmp::Ordering::Less => Some(Feedback::GuessHigher),
        std::cmp::Ordering::Equal => None,
    }
}

/// On-disk shape of `[rules]`; missing keys fall back to defaults.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RulesFile {
    seconds: u32,
    attempts: u32,
    upper_bound: u32,
    hint_threshold: u32,
}

impl Default for RulesFile {
    fn default() -> Self {
        Self {
            seconds: GameRules::DEFAULT_SECONDS,
            attempts: GameRules::DEFAULT_ATTEMPTS,
            upper_bound: GameRules::DEFAULT_UPPER_BOUND,
            hint_threshold: GameRules::DEFAULT_HINT_THRESHOLD,
        }
    }
}

impl TryFrom<RulesFile> for GameRules {
    type Error = RulesError;

    fn try_from(file: RulesFile) -> Result<Self, Self::Error> {
        GameRules::new(file.seconds, file.attempts, file.upper_bound, file.hint_threshold)
    }
}

/// A rule set that would break session invariants.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RulesError {
    /// `seconds` is zero.
    #[display("seconds must be at least 1")]
    NoTime,

    /// `attempts` is zero.
    #[display("attempts must be at least 1")]
    NoAttempts,

    /// Some seed would have no candidates.
    #[display("upper_bound {} must be at least {}", _0, Seed::MAX)]
    UpperBoundTooSmall(u32),

    /// The hint would always say the same thing.
    #[display("hint_threshold {} must be in 1..{}", threshold, upper_bound)]
    ThresholdOutsideRange {
        /// Configured threshold.
        threshold: u32,
        /// Configured upper bound.
        upper_bound: u32,
    },
}

impl std::error::Error for RulesError {}
