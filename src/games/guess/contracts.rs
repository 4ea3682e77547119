//! Contract-based validation for session transitions.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use tracing::{instrument, warn};

use super::action::{GameError, Operation};
use super::invariants::{InvariantSet, SessionInvariants};
use super::session::GameSession;
use super::types::Phase;

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), GameError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), GameError>;
}

// ─────────────────────────────────────────────────────────────
//  Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the operation is legal from the session's phase.
pub struct PhaseAllows;

impl PhaseAllows {
    /// Fails with `InvalidTransition` when `operation` may not run now.
    #[instrument(skip(session), fields(phase = %session.phase()))]
    pub fn check(operation: Operation, session: &GameSession) -> Result<(), GameError> {
        if operation.allowed_from(session.phase()) {
            Ok(())
        } else {
            warn!(%operation, "Rejected transition");
            Err(GameError::InvalidTransition {
                operation,
                phase: session.phase(),
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Postconditions
// ─────────────────────────────────────────────────────────────

/// Postcondition: attempts and the clock only count down, and the clock
/// only moves while in progress.
///
/// Leaving a terminal phase produces a fresh session, so that edge is exempt.
pub struct MonotonicCounters;

impl MonotonicCounters {
    /// Returns true if `after` is a legal successor of `before` for both counters.
    #[instrument(skip_all)]
    pub fn holds(before: &GameSession, after: &GameSession) -> bool {
        if before.phase().is_terminal() {
            return true;
        }
        let attempts_ok = after.attempts_remaining() <= before.attempts_remaining();
        let clock_ok = if before.phase() == Phase::InProgress {
            after.seconds_remaining() <= before.seconds_remaining()
        } else {
            after.seconds_remaining() == before.seconds_remaining()
        };
        if !(attempts_ok && clock_ok) {
            warn!(
                attempts_before = before.attempts_remaining(),
                attempts_after = after.attempts_remaining(),
                seconds_before = before.seconds_remaining(),
                seconds_after = after.seconds_remaining(),
                "Counters moved the wrong way"
            );
        }
        attempts_ok && clock_ok
    }
}

// ─────────────────────────────────────────────────────────────
//  Transition Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for every session transition.
///
/// Preconditions:
/// - The phase allows the operation
///
/// Postconditions:
/// - All [`SessionInvariants`] hold
/// - Counters are monotonic
pub struct TransitionContract;

impl Contract<GameSession, Operation> for TransitionContract {
    fn pre(session: &GameSession, operation: &Operation) -> Result<(), GameError> {
        PhaseAllows::check(*operation, session)
    }

    fn post(before: &GameSession, after: &GameSession) -> Result<(), GameError> {
        let mut descriptions = match SessionInvariants::check_all(after) {
            Ok(()) => Vec::new(),
            Err(violations) => violations.into_iter().map(|v| v.description).collect(),
        };
        if !MonotonicCounters::holds(before, after) {
            descriptions.push("Counters are monotonic".to_string());
        }
        if descriptions.is_empty() {
            Ok(())
        } else {
            Err(GameError::InvariantViolation(format!(
                "Postcondition failed: {}",
                descriptions.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::guess::{GameRules, ScriptedSource, Seed};

    fn fresh() -> (GameSession, ScriptedSource) {
        let mut source = ScriptedSource::new([9, 9]);
        let session = GameSession::create(Seed::clamped(3), GameRules::default(), &mut source);
        (session, source)
    }

    #[test]
    fn test_precondition_start_from_not_started() {
        let (session, _) = fresh();
        assert!(TransitionContract::pre(&session, &Operation::Start).is_ok());
        assert!(TransitionContract::pre(&session, &Operation::SubmitGuess).is_err());
    }

    #[test]
    fn test_precondition_feedback_operations() {
        let (session, mut source) = fresh();
        let session = session.start(&mut source).expect("start");
        assert!(TransitionContract::pre(&session, &Operation::TryAgain).is_err());

        let (session, _) = session.submit_guess("15").expect("guess").into_parts();
        assert!(TransitionContract::pre(&session, &Operation::TryAgain).is_ok());
        assert!(TransitionContract::pre(&session, &Operation::EndGame).is_ok());
        assert!(TransitionContract::pre(&session, &Operation::SubmitGuess).is_err());
    }

    #[test]
    fn test_postcondition_holds_after_transition() {
        let (session, mut source) = fresh();
        let after = session.start(&mut source).expect("start");
        assert!(TransitionContract::post(&session, &after).is_ok());

        let ticked = after.tick().expect("tick");
        assert!(TransitionContract::post(&after, &ticked).is_ok());
    }

    #[test]
    fn test_postcondition_detects_counter_reversal() {
        let (session, mut source) = fresh();
        let started = session.start(&mut source).expect("start");
        let ticked = started.tick().expect("tick");
        // Going from 59 back to 60 seconds is not a legal transition.
        assert!(!MonotonicCounters::holds(&ticked, &started));
        assert!(matches!(
            TransitionContract::post(&ticked, &started),
            Err(GameError::InvariantViolation(_))
        ));
    }
}
