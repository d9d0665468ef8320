//! Deterministic random number generation for scripted players.
//!
//! RULE: The economy itself is never random. Only the AutoPlayer rolls
//! dice, and it does so through an AutoRng seeded from the run seed, so a
//! seed fully reproduces a headless run.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct AutoRng {
    inner: Pcg64Mcg,
}

impl AutoRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a usize in [0, n).
    pub fn next_below(&mut self, n: usize) -> usize {
        assert!(n > 0, "n must be > 0");
        (self.inner.next_u64() % n as u64) as usize
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}
