//! Injectable random sources
//!
//! The engine never reaches for a global generator. Every draw goes through
//! [`RandomSource`], so tests can swap in [`ScriptedRandom`] or a seeded
//! [`StdRng`] and get the same frames back on every run.

use rand::Rng;
use rand::rngs::{StdRng, ThreadRng};

/// Source of uniformly distributed floats in `[0, 1)`
pub trait RandomSource {
    /// Next sample in `[0, 1)`
    fn next_f32(&mut self) -> f32;

    /// Sample in `[lo, hi)`
    #[inline]
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// Bernoulli trial succeeding with probability `p`
    #[inline]
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

impl RandomSource for StdRng {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

impl RandomSource for ThreadRng {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }
}

/// Deterministic source replaying a fixed list of samples in a loop
///
/// Values are clamped into `[0, 1)` on construction. An empty script
/// behaves like a constant `0.0`, which makes every probability check pass.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Source that always returns `value`
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples handed out so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f32(&mut self) -> f32 {
        let value = if self.values.is_empty() {
            0.0
        } else {
            self.values[self.cursor % self.values.len()]
        };
        self.cursor += 1;
        value
    }
}
