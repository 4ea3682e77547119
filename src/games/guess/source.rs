//! Random number sources for drawing targets.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument, warn};

/// Picks a target from a candidate list.
///
/// Callers always pass a non-empty, ascending list. A pick outside the list is
/// treated as a faulty source by the session and replaced with the smallest
/// candidate.
pub trait NumberSource {
    /// Picks one value from `candidates`.
    fn pick(&mut self, candidates: &[u32]) -> u32;
}

/// Uniform picks from an OS-seeded or fixed-seed RNG.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Creates a source seeded from the operating system.
    #[instrument]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible source.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberSource for RandomSource {
    fn pick(&mut self, candidates: &[u32]) -> u32 {
        candidates.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

/// Hands out preset values in order, for tests and replays.
///
/// A preset that is not a candidate, or an empty queue, yields the smallest
/// candidate.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    queue: VecDeque<u32>,
}

impl ScriptedSource {
    /// Creates a source that returns `values` in order.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: values.into_iter().collect(),
        }
    }

    /// Presets not yet handed out.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl NumberSource for ScriptedSource {
    #[instrument(skip(self, candidates), fields(queued = self.queue.len()))]
    fn pick(&mut self, candidates: &[u32]) -> u32 {
        let fallback = candidates.first().copied().unwrap_or_default();
        match self.queue.pop_front() {
            Some(value) if candidates.contains(&value) => {
                debug!(value, "Scripted target");
                value
            }
            Some(value) => {
                warn!(value, fallback, "Scripted target is not a candidate");
                fallback
            }
            None => {
                debug!(fallback, "Script exhausted, using smallest candidate");
                fallback
            }
        }
    }
}
