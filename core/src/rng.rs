//! Deterministic random number generation for opt-in exploration.
//!
//! RULE: Nothing in the engine may call any platform RNG. Selection is
//! fully deterministic unless the caller explicitly passes an Exploration
//! with a seed, and then the jitter stream is reproducible from that seed
//! alone.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A seeded jitter stream for one selection call.
pub struct ExplorationRng {
    inner: Pcg64Mcg,
}

impl ExplorationRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Symmetric jitter in (-amplitude, amplitude).
    pub fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}
