//! Random source for course generation and effects
//!
//! Every random draw in the simulation goes through [`RandomSource`] so a run
//! can be replayed from its seed, or driven by a fixed script in tests.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A source of uniform samples
pub trait RandomSource {
    /// Uniform sample in [0, 1)
    fn next_unit(&mut self) -> f32;

    /// Uniform index in 0..len (len must be non-zero)
    fn pick(&mut self, len: usize) -> usize {
        ((self.next_unit() * len as f32) as usize).min(len.saturating_sub(1))
    }

    /// Uniform sample in [-magnitude, magnitude)
    fn signed(&mut self, magnitude: f32) -> f32 {
        (self.next_unit() - 0.5) * magnitude * 2.0
    }
}

impl RandomSource for Pcg32 {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Seeded default source
pub fn seeded(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    samples: Vec<f32>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// Always returns the same sample
    pub fn constant(sample: f32) -> Self {
        Self::new(vec![sample])
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f32 {
        if self.samples.is_empty() {
            return 0.5;
        }
        let sample = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        sample
    }
}
