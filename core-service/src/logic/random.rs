//! Random Source - Injectable uniform [0,1) draws
//!
//! Every stochastic component (walk, sampler, synthesizer, forensics) pulls
//! its randomness through `RandomSource` so tests can seed or script it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform [0,1) draw source
pub trait RandomSource {
    /// Next value in [0, 1)
    fn next_unit(&mut self) -> f64;

    /// Uniform value in [low, high)
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_unit() * (high - low)
    }

    /// Symmetric value in [-amplitude, +amplitude)
    fn symmetric(&mut self, amplitude: f64) -> f64 {
        (self.next_unit() * 2.0 - 1.0) * amplitude
    }

    /// True with the given probability
    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }
}

/// Default source backed by `StdRng`
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: StdRng,
}

impl SimRng {
    pub fn from_entropy() -> Self {
        Self { inner: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { inner: StdRng::seed_from_u64(seed) }
    }

    /// Seeded when a seed is configured, entropy otherwise
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for SimRng {
    fn next_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Used to pin exact branches (shock / no shock, band edges) in tests.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Self {
        let values = if values.is_empty() { vec![0.0] } else { values };
        Self { values, cursor: 0 }
    }

    /// Always returns the same draw
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        // keep scripted values inside the contract
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
