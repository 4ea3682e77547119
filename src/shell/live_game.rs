//! A session paired with the countdown that drives it.

use std::time::Duration;

use tracing::{debug, instrument};

use crate::games::guess::{
    GameError, GameEvent, GameRules, GameSession, NumberSource, Phase, RandomSource, Seed, Verdict,
};
use crate::timer::CountdownTimer;

/// The live game: current session, its timer, and the number source.
///
/// A timer exists exactly while the session is `InProgress`. Leaving that
/// phase cancels it, and re-entering spawns a fresh one, so ticks from an
/// earlier period or an earlier session are never applied.
#[derive(Debug)]
pub struct LiveGame<S = RandomSource> {
    session: GameSession,
    timer: Option<CountdownTimer>,
    source: S,
    tick_period: Duration,
}

impl<S: NumberSource> LiveGame<S> {
    /// Creates a not-yet-started game. No timer runs until [`GameEvent::Start`].
    #[instrument(skip(source))]
    pub fn new(seed: Seed, rules: GameRules, tick_period: Duration, mut source: S) -> Self {
        let session = GameSession::create(seed, rules, &mut source);
        Self {
            session,
            timer: None,
            source,
            tick_period,
        }
    }

    /// Current session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Whether a countdown is running.
    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Applies a player event and starts or stops the timer to match.
    ///
    /// # Errors
    ///
    /// Whatever the session transition returns. The game is unchanged on error.
    #[instrument(skip(self), fields(phase = %self.session.phase()))]
    pub fn apply(&mut self, event: GameEvent) -> Result<Option<Verdict>, GameError> {
        let (next, verdict) = self.session.apply(&event, &mut self.source)?.into_parts();
        if matches!(event, GameEvent::NewSession) {
            // The old session's timer goes with it.
            self.stop_timer();
        }
        self.session = next;
        self.sync_timer();
        Ok(verdict)
    }

    /// Applies every tick delivered since the last call. Returns how many
    /// were applied.
    ///
    /// # Errors
    ///
    /// Propagates a failed tick transition.
    pub fn pump_ticks(&mut self) -> Result<u32, GameError> {
        let Some(timer) = self.timer.as_mut() else {
            return Ok(0);
        };
        let pending = timer.drain();
        let mut applied = 0;
        for _ in 0..pending {
            if self.session.phase() != Phase::InProgress {
                break;
            }
            self.session = self.session.tick()?;
            applied += 1;
        }
        if applied > 0 {
            debug!(applied, seconds = self.session.seconds_remaining(), "Applied ticks");
        }
        self.sync_timer();
        Ok(applied)
    }

    /// Spawns or cancels the timer so it runs only while `InProgress`.
    fn sync_timer(&mut self) {
        let running = self.session.phase() == Phase::InProgress;
        match (running, self.timer.is_some()) {
            (true, false) => self.timer = Some(CountdownTimer::spawn(self.tick_period)),
            (false, true) => self.stop_timer(),
            _ => {}
        }
    }

    fn stop_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::guess::{Feedback, ScriptedSource};

    fn game(targets: &[u32]) -> LiveGame<ScriptedSource> {
        LiveGame::new(
            Seed::clamped(3),
            GameRules::default(),
            Duration::from_secs(1),
            ScriptedSource::new(targets.iter().copied()),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_only_runs_in_progress() {
        let mut game = game(&[9, 9]);
        assert!(!game.timer_running());

        game.apply(GameEvent::Start).expect("start");
        assert!(game.timer_running());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(game.pump_ticks().expect("ticks"), 3);
        assert_eq!(game.session().seconds_remaining(), 57);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feedback_card_stops_the_clock() {
        let mut game = game(&[9, 9]);
        game.apply(GameEvent::Start).expect("start");
        let verdict = game.apply(GameEvent::Guess("15".into())).expect("guess");
        assert_eq!(verdict, Some(Verdict::Wrong(Feedback::GuessLower)));
        assert!(!game.timer_running());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(game.pump_ticks().expect("ticks"), 0);
        assert_eq!(game.session().seconds_remaining(), 60);

        game.apply(GameEvent::TryAgain).expect("try again");
        assert!(game.timer_running());
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(game.pump_ticks().expect("ticks"), 1);
        assert_eq!(game.session().seconds_remaining(), 59);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_runs_out() {
        let mut game = LiveGame::new(
            Seed::clamped(3),
            GameRules::new(2, 4, 100, 50).expect("rules"),
            Duration::from_secs(1),
            ScriptedSource::new([9, 9]),
        );
        game.apply(GameEvent::Start).expect("start");
        tokio::time::sleep(Duration::from_millis(5500)).await;
        assert_eq!(game.pump_ticks().expect("ticks"), 2);
        assert_eq!(game.session().phase(), Phase::Lost);
        assert_eq!(
            game.session().outcome_message().as_deref(),
            Some("time exceeded")
        );
        assert!(!game.timer_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_session_gets_a_fresh_clock() {
        let mut game = game(&[9, 9, 30, 60]);
        game.apply(GameEvent::Start).expect("start");
        tokio::time::sleep(Duration::from_millis(2500)).await;
        game.apply(GameEvent::Guess("9".into())).expect("win");
        assert_eq!(game.session().phase(), Phase::Won);

        // Ticks queued before the win must not reach the new session.
        game.apply(GameEvent::NewSession).expect("new session");
        assert_eq!(game.session().target(), 60);
        assert_eq!(game.pump_ticks().expect("ticks"), 0);
        assert_eq!(game.session().seconds_remaining(), 60);
    }

    #[tokio::test]
    async fn test_invalid_event_leaves_game_unchanged() {
        let mut game = game(&[9, 9]);
        let before = game.session().clone();
        assert!(game.apply(GameEvent::TryAgain).is_err());
        assert_eq!(game.session(), &before);
        assert!(!game.timer_running());
    }
}
