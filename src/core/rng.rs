//! Seeded random source shared by terrain generation and particle emission

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic PRNG. The same seed always reproduces the same stream, which
/// is what lets a known terrain seed carry a hand-placed runway.
#[derive(Clone, Debug)]
pub struct SimRng {
    rng: StdRng,
}

impl SimRng {
    /// Create a generator from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[min, max)`. Returns `min` when the range is empty.
    pub fn random(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..max)
    }

    /// Uniform float in `[min, max]`. Bounds may be given in either order.
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        if lo == hi {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }

    /// Zero-centred displacement used by diamond-square: `(random(0, 500) - 250) / smoothness`.
    pub fn displacement(&mut self, smoothness: f32) -> f32 {
        (self.random(0, 500) - 250) as f32 / smoothness
    }
}
