//! DeterministicRng - Seeded Randomness
//!
//! TigerStyle: same seed, same draws, every run.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded random source for mission outcomes and timing.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    seed: u64,
    rng: ChaCha8Rng,
}

impl DeterministicRng {
    /// Create a generator from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed this generator was built from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns true with the given probability.
    ///
    /// # Panics
    /// Panics if `probability` is outside `[0, 1]`.
    pub fn next_bool(&mut self, probability: f64) -> bool {
        // Precondition
        assert!(
            (0.0..=1.0).contains(&probability),
            "probability {probability} outside [0, 1]"
        );

        self.rng.gen_bool(probability)
    }

    /// Uniform draw from `[lo, hi]`, both ends inclusive.
    ///
    /// # Panics
    /// Panics if `lo > hi`.
    pub fn next_in_range(&mut self, lo: i64, hi: i64) -> i64 {
        // Precondition
        assert!(lo <= hi, "empty range [{lo}, {hi}]");

        self.rng.gen_range(lo..=hi)
    }
}
