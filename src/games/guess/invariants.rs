//! First-class invariants for the guessing game.
//!
//! Invariants are logical properties that must hold for every reachable
//! session. They are checked after each transition in debug builds and
//! can be tested independently.

use super::session::GameSession;
use super::types::{Outcome, Phase};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of up to four invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

// ─────────────────────────────────────────────────────────────
//  Session invariants
// ─────────────────────────────────────────────────────────────

/// Invariant: the target is a multiple of the seed within `1..=upper_bound`.
pub struct TargetInvariant;

impl Invariant<GameSession> for TargetInvariant {
    fn holds(session: &GameSession) -> bool {
        session
            .rules()
            .is_candidate(session.seed(), session.target())
    }

    fn description() -> &'static str {
        "Target is a multiple of the seed within range"
    }
}

/// Invariant: attempts never exceed the rules, and zero attempts means lost.
pub struct AttemptsInvariant;

impl Invariant<GameSession> for AttemptsInvariant {
    fn holds(session: &GameSession) -> bool {
        let left = session.attempts_remaining();
        left <= session.rules().attempts()
            && (left > 0 || session.outcome() == Some(Outcome::AttemptsExhausted))
    }

    fn description() -> &'static str {
        "Attempts stay within the rules and run out only by losing"
    }
}

/// Invariant: the clock never exceeds the rules, and zero seconds means lost.
pub struct ClockInvariant;

impl Invariant<GameSession> for ClockInvariant {
    fn holds(session: &GameSession) -> bool {
        let left = session.seconds_remaining();
        left <= session.rules().seconds()
            && (left > 0 || session.outcome() == Some(Outcome::TimeExceeded))
    }

    fn description() -> &'static str {
        "Clock stays within the rules and runs out only by losing"
    }
}

/// Invariant: each phase carries exactly the payload it needs.
///
/// Terminal phases have an outcome matching the phase; only the feedback
/// phase has feedback.
pub struct PhasePayloadInvariant;

impl Invariant<GameSession> for PhasePayloadInvariant {
    fn holds(session: &GameSession) -> bool {
        let phase = session.phase();
        let outcome_matches = match (phase, session.outcome()) {
            (Phase::Won, Some(outcome)) => outcome.is_win(),
            (Phase::Lost, Some(outcome)) => !outcome.is_win(),
            (Phase::Won | Phase::Lost, None) => false,
            (_, outcome) => outcome.is_none(),
        };
        let feedback_matches =
            session.feedback().is_some() == (phase == Phase::AwaitingFeedbackAck);
        outcome_matches && feedback_matches
    }

    fn description() -> &'static str {
        "Phase payload (outcome, feedback) matches the phase"
    }
}

/// All session invariants as a composable set.
pub type SessionInvariants = (
    TargetInvariant,
    AttemptsInvariant,
    ClockInvariant,
    PhasePayloadInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::guess::{GameRules, ScriptedSource, Seed};

    fn started() -> GameSession {
        let mut source = ScriptedSource::new([9, 9]);
        GameSession::create(Seed::clamped(3), GameRules::default(), &mut source)
            .start(&mut source)
            .expect("start")
    }

    #[test]
    fn test_invariant_set_holds_for_new_session() {
        let mut source = ScriptedSource::new([9]);
        let session = GameSession::create(Seed::clamped(3), GameRules::default(), &mut source);
        assert!(SessionInvariants::check_all(&session).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_through_play() {
        let session = started();
        assert!(SessionInvariants::check_all(&session).is_ok());

        let (session, _) = session.submit_guess("12").expect("guess").into_parts();
        assert!(SessionInvariants::check_all(&session).is_ok());

        let session = session.end_game().expect("end");
        assert!(SessionInvariants::check_all(&session).is_ok());
    }

    #[test]
    fn test_clock_runs_out_only_by_losing() {
        let mut session = started();
        for _ in 0..60 {
            session = session.tick().expect("tick");
        }
        assert_eq!(session.seconds_remaining(), 0);
        assert!(ClockInvariant::holds(&session));
        assert!(AttemptsInvariant::holds(&session));
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (TargetInvariant, PhasePayloadInvariant);
        assert!(TwoInvariants::check_all(&started()).is_ok());
    }
}
