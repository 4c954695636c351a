//! Seedable random source threaded through everything probabilistic.
//!
//! A battle owns exactly one instance, so a replay from the same seed makes
//! the same draws in the same order.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform integer in [0, max).
    fn next_max(&mut self, max: u32) -> u32;
    /// Uniform integer in [min, max].
    fn next_range(&mut self, min: u32, max: u32) -> u32;
    /// Uniform float in [0, 1).
    fn next_f32(&mut self) -> f32;
    /// Uniform double in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Roll a percentage chance.
    fn chance(&mut self, percent: u8) -> bool {
        if percent >= 100 {
            return true;
        }
        if percent == 0 {
            return false;
        }
        self.next_max(100) < percent as u32
    }
}

pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_max(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.rng.gen_range(0..max)
    }

    fn next_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    fn next_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
