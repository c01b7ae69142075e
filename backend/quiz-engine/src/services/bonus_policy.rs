use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::models::BonusKind;

/// Source of uniform choices. Bonus kinds are drawn through this so tests
/// and replays can force a specific branch.
pub trait RandomSource: Send {
    /// Returns an index in `0..upper`. `upper` is never zero.
    fn pick(&mut self, upper: usize) -> usize;
}

/// Thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&mut self, upper: usize) -> usize {
        rand::rng().random_range(0..upper)
    }
}

/// Reproducible RNG for replays and tests.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper)
    }
}

/// Decides whether a correct answer earns a bonus, and which one.
pub struct BonusPolicy {
    streak_threshold: u32,
    extra_time_seconds: u32,
    random: Box<dyn RandomSource>,
}

impl BonusPolicy {
    pub fn new(
        streak_threshold: u32,
        extra_time_seconds: u32,
        random: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            streak_threshold,
            extra_time_seconds,
            random,
        }
    }

    pub fn from_config(game: &GameConfig, random: Box<dyn RandomSource>) -> Self {
        Self::new(game.bonus_streak, game.extra_time_seconds, random)
    }

    /// Seconds an `ExtraTime` bonus adds to the next question.
    pub fn extra_time_seconds(&self) -> u32 {
        self.extra_time_seconds
    }

    /// Offers a bonus when the streak has reached the threshold and the
    /// answer came in under half the allotted time.
    pub fn evaluate(
        &mut self,
        consecutive_correct: u32,
        response_seconds: u32,
        allotted_seconds: u32,
    ) -> Option<BonusKind> {
        if !self.qualifies(consecutive_correct, response_seconds, allotted_seconds) {
            return None;
        }

        let index = self.random.pick(BonusKind::ALL.len());
        let kind = BonusKind::ALL[index % BonusKind::ALL.len()];
        tracing::debug!(
            "Bonus drawn: kind={}, streak={}, response={}s of {}s",
            kind.as_str(),
            consecutive_correct,
            response_seconds,
            allotted_seconds
        );
        Some(kind)
    }

    // response < allotted / 2, without losing the half second to integer division
    fn qualifies(&self, consecutive_correct: u32, response_seconds: u32, allotted_seconds: u32) -> bool {
        consecutive_correct >= self.streak_threshold
            && u64::from(response_seconds) * 2 < u64::from(allotted_seconds)
    }
}

impl std::fmt::Debug for BonusPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BonusPolicy")
            .field("streak_threshold", &self.streak_threshold)
            .field("extra_time_seconds", &self.extra_time_seconds)
            .finish_non_exhaustive()
    }
}
