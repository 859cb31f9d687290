//! Random sources for the simulation
//!
//! The simulation only ever asks for a float in [0, 1). Production runs use a
//! seeded PCG stream; tests script the exact values they need.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform floats in [0, 1)
pub trait RandomSource: Send {
    fn next_f32(&mut self) -> f32;

    /// Uniform float in [lo, hi)
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}

/// PCG-backed source, seeded once per app session
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed from the wall clock
    pub fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED);
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always returns the same value
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f32(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        // Keep the [0, 1) contract even for sloppy scripts
        if value.is_finite() {
            value.clamp(0.0, 1.0 - f32::EPSILON)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..100 {
            let x = a.next_f32();
            assert_eq!(x, b.next_f32());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_scripted_cycles_and_clamps() {
        let mut rng = ScriptedRandom::new(vec![0.25, 1.5]);
        assert_eq!(rng.next_f32(), 0.25);
        assert!(rng.next_f32() < 1.0);
        assert_eq!(rng.next_f32(), 0.25);
    }

    #[test]
    fn test_range() {
        let mut rng = ScriptedRandom::constant(0.5);
        assert!((rng.range(0.1, 0.9) - 0.5).abs() < 1e-6);
    }
}
