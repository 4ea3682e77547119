//! Property-based tests for the session state machine.
//!
//! Arbitrary event sequences are applied to fresh sessions; every state
//! reached must satisfy the session invariants and counter monotonicity.

use proptest::prelude::*;
use strictly_guess::{
    GameEvent, GameRules, GameSession, InvariantSet, MonotonicCounters, Phase, RandomSource, Seed,
    SessionInvariants,
};

/// Generate player and clock events, guesses biased towards small numbers.
fn event_strategy() -> impl Strategy<Value = GameEvent> {
    prop_oneof![
        1 => Just(GameEvent::Start),
        4 => Just(GameEvent::Tick),
        4 => (0u32..=110).prop_map(|n| GameEvent::Guess(n.to_string())),
        1 => "[a-z0-9 ]{0,4}".prop_map(GameEvent::Guess),
        1 => Just(GameEvent::Hint),
        2 => Just(GameEvent::TryAgain),
        1 => Just(GameEvent::EndGame),
        1 => Just(GameEvent::NewSession),
    ]
}

fn seed_strategy() -> impl Strategy<Value = Seed> {
    (1u8..=9).prop_map(|n| Seed::new(n).unwrap())
}

proptest! {
    /// Every seed yields a target that is a multiple of it in range.
    #[test]
    fn prop_target_is_candidate(seed in seed_strategy(), rng in any::<u64>()) {
        let mut source = RandomSource::seeded(rng);
        let session = GameSession::create(seed, GameRules::default(), &mut source);
        prop_assert_eq!(session.target() % seed.get(), 0);
        prop_assert!((1..=100).contains(&session.target()));
    }

    /// Invariants and monotonic counters hold under arbitrary sequences.
    #[test]
    fn prop_invariants_hold(
        seed in seed_strategy(),
        rng in any::<u64>(),
        events in prop::collection::vec(event_strategy(), 0..80),
    ) {
        let mut source = RandomSource::seeded(rng);
        let mut session = GameSession::create(seed, GameRules::default(), &mut source);

        for event in events {
            let Ok(step) = session.apply(&event, &mut source) else {
                continue;
            };
            let (next, _) = step.into_parts();
            prop_assert!(
                SessionInvariants::check_all(&next).is_ok(),
                "Invariant violated after {:?}", event
            );
            prop_assert!(
                MonotonicCounters::holds(&session, &next),
                "Counters moved after {:?}", event
            );
            session = next;
        }
    }

    /// The exact target always wins while in progress.
    #[test]
    fn prop_target_always_wins(seed in seed_strategy(), rng in any::<u64>(), ticks in 0usize..59) {
        let mut source = RandomSource::seeded(rng);
        let mut session = GameSession::create(seed, GameRules::default(), &mut source)
            .start(&mut source)
            .unwrap();
        for _ in 0..ticks {
            session = session.tick().unwrap();
        }
        let target = session.target();
        let (session, _) = session.submit_guess(&target.to_string()).unwrap().into_parts();
        prop_assert_eq!(session.phase(), Phase::Won);
    }

    /// Ticks after the end change nothing.
    #[test]
    fn prop_tick_after_end_is_noop(seed in seed_strategy(), rng in any::<u64>(), ticks in 1usize..10) {
        let mut source = RandomSource::seeded(rng);
        let session = GameSession::create(seed, GameRules::default(), &mut source)
            .start(&mut source)
            .unwrap();
        let target = session.target();
        let (won, _) = session.submit_guess(&target.to_string()).unwrap().into_parts();
        let mut after = won.clone();
        for _ in 0..ticks {
            after = after.tick().unwrap();
        }
        prop_assert_eq!(after, won);
    }

    /// Using the hint twice equals using it once.
    #[test]
    fn prop_hint_is_idempotent(seed in seed_strategy(), rng in any::<u64>()) {
        let mut source = RandomSource::seeded(rng);
        let once = GameSession::create(seed, GameRules::default(), &mut source)
            .start(&mut source)
            .unwrap()
            .use_hint()
            .unwrap();
        prop_assert_eq!(once.use_hint().unwrap(), once);
    }
}
