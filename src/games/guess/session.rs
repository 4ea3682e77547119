//! The guessing-game session and its transition functions.
//!
//! Every transition borrows the current session and returns the next one.
//! Nothing is mutated in place, so callers can keep or drop the old state
//! freely. Preconditions are checked on every call; postconditions are
//! checked in debug builds.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::action::{GameError, GameEvent, GuessReport, Operation, Step, Verdict};
use super::contracts::{Contract, TransitionContract};
use super::rules::{GameRules, feedback_for};
use super::source::NumberSource;
use super::types::{Feedback, Hint, Outcome, Phase, Seed};

/// One round of the guessing game.
///
/// `hint_used` is not stored: a session has used its hint exactly when it
/// carries one, which keeps the single-hint rule true by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    rules: GameRules,
    seed: Seed,
    target: u32,
    phase: Phase,
    seconds_remaining: u32,
    attempts_remaining: u32,
    hint: Option<Hint>,
    feedback: Option<Feedback>,
    outcome: Option<Outcome>,
}

// ─────────────────────────────────────────────────────────────
//  Construction
// ─────────────────────────────────────────────────────────────

impl GameSession {
    /// Creates a session in `NotStarted` with a freshly drawn target.
    #[instrument(skip(source))]
    pub fn create(seed: Seed, rules: GameRules, source: &mut impl NumberSource) -> Self {
        let target = draw_target(&rules, seed, source);
        debug!(%seed, "Session created");
        Self {
            rules,
            seed,
            target,
            phase: Phase::NotStarted,
            seconds_remaining: rules.seconds(),
            attempts_remaining: rules.attempts(),
            hint: None,
            feedback: None,
            outcome: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Transitions
// ─────────────────────────────────────────────────────────────

impl GameSession {
    /// Starts play. Redraws the target and resets the clock and attempts.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the session is `NotStarted`.
    #[instrument(skip(self, source), fields(phase = %self.phase))]
    pub fn start(&self, source: &mut impl NumberSource) -> Result<Self, GameError> {
        TransitionContract::pre(self, &Operation::Start)?;

        let mut next = self.clone();
        next.target = draw_target(&self.rules, self.seed, source);
        next.phase = Phase::InProgress;
        next.seconds_remaining = self.rules.seconds();
        next.attempts_remaining = self.rules.attempts();
        info!(seed = %self.seed, "Game started");
        self.checked(next)
    }

    /// Counts down one second; losing when the clock reaches zero.
    ///
    /// Ticks after the session has ended, or while the feedback card is up,
    /// leave the session unchanged.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` if the session has not started.
    #[instrument(skip(self), fields(phase = %self.phase, seconds = self.seconds_remaining))]
    pub fn tick(&self) -> Result<Self, GameError> {
        if self.phase.is_terminal() || self.phase == Phase::AwaitingFeedbackAck {
            debug!("Tick ignored, clock is stopped");
            return Ok(self.clone());
        }
        TransitionContract::pre(self, &Operation::Tick)?;

        let mut next = self.clone();
        next.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if next.seconds_remaining == 0 {
            info!("Time exceeded");
            next.finish(Outcome::TimeExceeded);
        }
        self.checked(next)
    }

    /// Judges a guess.
    ///
    /// Malformed, out-of-range and non-multiple guesses come back as
    /// [`Verdict::Rejected`] with the session unchanged. A wrong guess costs
    /// one attempt and shows feedback, or loses on the last attempt.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the session is `InProgress`.
    #[instrument(skip(self), fields(phase = %self.phase, attempts = self.attempts_remaining))]
    pub fn submit_guess(&self, raw: &str) -> Result<GuessReport, GameError> {
        TransitionContract::pre(self, &Operation::SubmitGuess)?;

        let guess = match self.rules.judge(self.seed, raw) {
            Ok(guess) => guess,
            Err(rejection) => {
                debug!(%rejection, "Guess rejected");
                return Ok(GuessReport::new(self.clone(), Verdict::Rejected(rejection)));
            }
        };

        let mut next = self.clone();
        let verdict = match feedback_for(guess, self.target) {
            None => {
                let attempts_used = self.attempts_used() + 1;
                info!(guess, attempts_used, "Target guessed");
                next.finish(Outcome::Won { attempts_used });
                Verdict::Correct { attempts_used }
            }
            Some(feedback) => {
                next.attempts_remaining = self.attempts_remaining.saturating_sub(1);
                if next.attempts_remaining == 0 {
                    info!(guess, "Attempts exhausted");
                    next.finish(Outcome::AttemptsExhausted);
                    Verdict::Exhausted
                } else {
                    debug!(guess, %feedback, left = next.attempts_remaining, "Wrong guess");
                    next.phase = Phase::AwaitingFeedbackAck;
                    next.feedback = Some(feedback);
                    Verdict::Wrong(feedback)
                }
            }
        };

        Ok(GuessReport::new(self.checked(next)?, verdict))
    }

    /// Dismisses the feedback card and resumes play.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the session is `AwaitingFeedbackAck`.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn try_again(&self) -> Result<Self, GameError> {
        TransitionContract::pre(self, &Operation::TryAgain)?;

        let mut next = self.clone();
        next.phase = Phase::InProgress;
        next.feedback = None;
        self.checked(next)
    }

    /// Gives up from the feedback card.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the session is `AwaitingFeedbackAck`.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn end_game(&self) -> Result<Self, GameError> {
        TransitionContract::pre(self, &Operation::EndGame)?;

        let mut next = self.clone();
        info!("Player ended the session");
        next.finish(Outcome::PlayerEnded);
        self.checked(next)
    }

    /// Reveals whether the target is above the hint threshold.
    ///
    /// Once the hint is shown, further calls return the session unchanged.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` if no hint has been shown and the session is not
    /// `InProgress`.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn use_hint(&self) -> Result<Self, GameError> {
        if self.hint.is_some() {
            debug!("Hint already used");
            return Ok(self.clone());
        }
        TransitionContract::pre(self, &Operation::UseHint)?;

        let mut next = self.clone();
        let hint = self.rules.hint_for(self.target);
        debug!(%hint, "Hint revealed");
        next.hint = Some(hint);
        self.checked(next)
    }

    /// Replaces a finished session with a fresh, started one for the same seed.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the session is `Won` or `Lost`.
    #[instrument(skip(self, source), fields(phase = %self.phase))]
    pub fn new_session(&self, source: &mut impl NumberSource) -> Result<Self, GameError> {
        TransitionContract::pre(self, &Operation::NewSession)?;

        let next = Self::create(self.seed, self.rules, source).start(source)?;
        info!(seed = %self.seed, "New session");
        self.checked(next)
    }

    /// Applies any event, dispatching to the matching transition.
    #[instrument(skip(self, source), fields(phase = %self.phase, operation = %event.operation()))]
    pub fn apply(
        &self,
        event: &GameEvent,
        source: &mut impl NumberSource,
    ) -> Result<Step, GameError> {
        let step = match event {
            GameEvent::Start => Step::new(self.start(source)?, None),
            GameEvent::Tick => Step::new(self.tick()?, None),
            GameEvent::Guess(raw) => {
                let (session, verdict) = self.submit_guess(raw)?.into_parts();
                Step::new(session, Some(verdict))
            }
            GameEvent::Hint => Step::new(self.use_hint()?, None),
            GameEvent::TryAgain => Step::new(self.try_again()?, None),
            GameEvent::EndGame => Step::new(self.end_game()?, None),
            GameEvent::NewSession => Step::new(self.new_session(source)?, None),
        };
        Ok(step)
    }

    /// Moves into a terminal phase.
    fn finish(&mut self, outcome: Outcome) {
        self.phase = if outcome.is_win() {
            Phase::Won
        } else {
            Phase::Lost
        };
        self.feedback = None;
        self.outcome = Some(outcome);
    }

    /// Verifies postconditions in debug builds.
    fn checked(&self, next: Self) -> Result<Self, GameError> {
        #[cfg(debug_assertions)]
        TransitionContract::post(self, &next).inspect_err(|e| {
            warn!(error = %e, "Postcondition failed");
        })?;

        Ok(next)
    }
}

// ─────────────────────────────────────────────────────────────
//  Accessors
// ─────────────────────────────────────────────────────────────

impl GameSession {
    /// Rules this session was created with.
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Divisor of the target.
    pub fn seed(&self) -> Seed {
        self.seed
    }

    /// The number to guess.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left on the clock.
    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    /// Attempts left.
    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    /// Wrong guesses so far.
    pub fn attempts_used(&self) -> u32 {
        self.rules.attempts() - self.attempts_remaining
    }

    /// Whether the hint has been shown.
    pub fn hint_used(&self) -> bool {
        self.hint.is_some()
    }

    /// The hint, once shown.
    pub fn hint(&self) -> Option<Hint> {
        self.hint
    }

    /// Feedback for the last wrong guess while the card is showing.
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// Why the session ended.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Hint as display text.
    pub fn hint_text(&self) -> Option<String> {
        self.hint.map(|h| h.to_string())
    }

    /// Feedback as display text.
    pub fn last_feedback(&self) -> Option<String> {
        self.feedback.map(|f| f.to_string())
    }

    /// Outcome as display text.
    pub fn outcome_message(&self) -> Option<String> {
        self.outcome.map(|o| o.to_string())
    }

    /// Flat, display-ready copy of every field.
    pub fn view(&self) -> SessionView {
        SessionView {
            seed: self.seed,
            target: self.target,
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            attempts_remaining: self.attempts_remaining,
            hint_used: self.hint_used(),
            hint_text: self.hint_text(),
            last_feedback: self.last_feedback(),
            outcome_message: self.outcome_message(),
        }
    }
}

/// Serialized form of a [`GameSession`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Divisor of the target.
    pub seed: Seed,
    /// The number to guess.
    pub target: u32,
    /// Current phase.
    pub phase: Phase,
    /// Seconds left on the clock.
    pub seconds_remaining: u32,
    /// Attempts left.
    pub attempts_remaining: u32,
    /// Whether the hint has been shown.
    pub hint_used: bool,
    /// The hint, once shown.
    pub hint_text: Option<String>,
    /// Feedback for the last wrong guess.
    pub last_feedback: Option<String>,
    /// Why the session ended.
    pub outcome_message: Option<String>,
}

impl Serialize for GameSession {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.view().serialize(serializer)
    }
}

/// Draws a target, falling back to the seed itself if the source misbehaves.
fn draw_target(rules: &GameRules, seed: Seed, source: &mut impl NumberSource) -> u32 {
    let candidates = rules.candidates(seed);
    let picked = source.pick(&candidates);
    if rules.is_candidate(seed, picked) {
        picked
    } else {
        warn!(picked, %seed, "Number source returned a non-candidate");
        seed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::guess::{GuessRejection, ScriptedSource};

    fn seed3_target9() -> (GameSession, ScriptedSource) {
        let mut source = ScriptedSource::new([9, 9]);
        let session = GameSession::create(Seed::clamped(3), GameRules::default(), &mut source);
        (session, source)
    }

    fn started() -> GameSession {
        let (session, mut source) = seed3_target9();
        session.start(&mut source).expect("start from NotStarted")
    }

    #[test]
    fn test_create_defaults() {
        let (session, _) = seed3_target9();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.target(), 9);
        assert_eq!(session.seconds_remaining(), 60);
        assert_eq!(session.attempts_remaining(), 4);
        assert!(!session.hint_used());
        assert_eq!(session.outcome_message(), None);
    }

    #[test]
    fn test_start_redraws_target() {
        let mut source = ScriptedSource::new([12, 27]);
        let session = GameSession::create(Seed::clamped(3), GameRules::default(), &mut source);
        assert_eq!(session.target(), 12);
        let session = session.start(&mut source).expect("start");
        assert_eq!(session.target(), 27);
        assert_eq!(session.phase(), Phase::InProgress);
    }

    #[test]
    fn test_start_twice_is_invalid() {
        let mut source = ScriptedSource::default();
        let session = started();
        assert_eq!(
            session.start(&mut source),
            Err(GameError::InvalidTransition {
                operation: Operation::Start,
                phase: Phase::InProgress
            })
        );
    }

    #[test]
    fn test_tick_before_start_is_invalid() {
        let (session, _) = seed3_target9();
        assert!(matches!(
            session.tick(),
            Err(GameError::InvalidTransition {
                operation: Operation::Tick,
                ..
            })
        ));
    }

    #[test]
    fn test_tick_counts_down() {
        let session = started().tick().expect("tick");
        assert_eq!(session.seconds_remaining(), 59);
        assert_eq!(session.phase(), Phase::InProgress);
    }

    #[test]
    fn test_rejected_guess_leaves_session_untouched() {
        let session = started();
        let report = session.submit_guess("10").expect("in progress");
        assert_eq!(report.session(), &session);
        assert!(matches!(
            report.verdict(),
            Verdict::Rejected(GuessRejection::NotAMultiple { value: 10, .. })
        ));
    }

    #[test]
    fn test_wrong_guess_shows_feedback() {
        let (session, verdict) = started().submit_guess("15").expect("guess").into_parts();
        assert_eq!(verdict, Verdict::Wrong(Feedback::GuessLower));
        assert_eq!(session.phase(), Phase::AwaitingFeedbackAck);
        assert_eq!(session.attempts_remaining(), 3);
        assert_eq!(session.last_feedback().as_deref(), Some("guess lower"));
    }

    #[test]
    fn test_ticks_ignored_while_feedback_showing() {
        let (session, _) = started().submit_guess("3").expect("guess").into_parts();
        assert_eq!(session.last_feedback().as_deref(), Some("guess higher"));
        assert_eq!(session.tick().expect("ignored"), session);
    }

    #[test]
    fn test_try_again_clears_feedback() {
        let (session, _) = started().submit_guess("15").expect("guess").into_parts();
        let session = session.try_again().expect("try again");
        assert_eq!(session.phase(), Phase::InProgress);
        assert_eq!(session.feedback(), None);
        assert_eq!(session.attempts_remaining(), 3);
    }

    #[test]
    fn test_end_game_from_feedback() {
        let (session, _) = started().submit_guess("15").expect("guess").into_parts();
        let session = session.end_game().expect("end");
        assert_eq!(session.phase(), Phase::Lost);
        assert_eq!(
            session.outcome_message().as_deref(),
            Some("player ended the session")
        );
        assert_eq!(session.feedback(), None);
    }

    #[test]
    fn test_correct_guess_reports_attempts_used() {
        let (session, _) = started().submit_guess("15").expect("guess").into_parts();
        let session = session.try_again().expect("try again");
        let (session, verdict) = session.submit_guess("9").expect("guess").into_parts();
        assert_eq!(verdict, Verdict::Correct { attempts_used: 2 });
        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(
            session.outcome_message().as_deref(),
            Some("you guessed it in 2 attempts")
        );
    }

    #[test]
    fn test_hint_requires_in_progress() {
        let (session, _) = seed3_target9();
        assert!(session.use_hint().is_err());
        let session = started().use_hint().expect("hint");
        assert_eq!(session.hint_text().as_deref(), Some("less than or equal to 50"));
    }

    #[test]
    fn test_new_session_only_after_end() {
        let mut source = ScriptedSource::new([30, 60]);
        let session = started();
        assert!(session.new_session(&mut source).is_err());

        let (lost, _) = session.submit_guess("15").expect("guess").into_parts();
        let lost = lost.end_game().expect("end");
        let fresh = lost.new_session(&mut source).expect("new session");
        assert_eq!(fresh.phase(), Phase::InProgress);
        assert_eq!(fresh.target(), 60);
        assert_eq!(fresh.attempts_remaining(), 4);
        assert_eq!(fresh.seconds_remaining(), 60);
        assert_eq!(fresh.outcome(), None);
        assert!(!fresh.hint_used());
    }

    #[test]
    fn test_apply_dispatches_guess() {
        let mut source = ScriptedSource::default();
        let step = started()
            .apply(&GameEvent::Guess("9".into()), &mut source)
            .expect("apply");
        assert_eq!(step.verdict(), &Some(Verdict::Correct { attempts_used: 1 }));
        assert_eq!(step.session().phase(), Phase::Won);
    }

    #[test]
    fn test_serialized_shape() {
        let session = started().use_hint().expect("hint");
        let json = serde_json::to_value(&session).expect("serialize");
        assert_eq!(json["seed"], 3);
        assert_eq!(json["target"], 9);
        assert_eq!(json["phase"], "InProgress");
        assert_eq!(json["secondsRemaining"], 60);
        assert_eq!(json["attemptsRemaining"], 4);
        assert_eq!(json["hintUsed"], true);
        assert_eq!(json["hintText"], "less than or equal to 50");
        assert!(json["lastFeedback"].is_null());
        assert!(json["outcomeMessage"].is_null());
    }

    #[test]
    fn test_postcondition_detects_corruption() {
        let before = started();
        let mut after = before.clone();
        after.target = 10;
        after.feedback = Some(Feedback::GuessLower);
        let err = TransitionContract::post(&before, &after).expect_err("corrupted");
        let GameError::InvariantViolation(message) = err else {
            panic!("expected invariant violation, got {err:?}");
        };
        assert!(message.contains("Target is a multiple"));
        assert!(message.contains("Phase payload"));
    }

    #[test]
    fn test_faulty_source_falls_back_to_seed() {
        struct Broken;
        impl NumberSource for Broken {
            fn pick(&mut self, _candidates: &[u32]) -> u32 {
                1000
            }
        }
        let session = GameSession::create(Seed::clamped(7), GameRules::default(), &mut Broken);
        assert_eq!(session.target(), 7);
    }
}
