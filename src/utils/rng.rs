//! Simple random number generator for reproducibility.
//!
//! This module provides a lightweight xorshift-based PRNG that doesn't require
//! external dependencies, ensuring reproducible results across runs. Each
//! generator is an explicit instance owned by its caller — nothing is shared
//! process-wide, so several networks can be initialized independently and
//! deterministically inside one process.
//!
//! On top of the raw generator it offers the sampling methods used by weight
//! initialization: uniform, normal (Box–Muller), Xavier/Glorot and He/Kaiming.

use std::time::{SystemTime, UNIX_EPOCH};

/// Simple RNG for reproducibility without external crates.
///
/// Uses the xorshift algorithm for fast, deterministic random number
/// generation. Two instances created with the same seed produce bit-identical
/// sequences.
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new RNG with explicit seed (if zero, use a fixed value).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state }
    }

    /// Produce a nonzero seed from the current wall-clock time.
    ///
    /// Used when the caller did not supply a seed; the generated value is
    /// reported back so the run can be reproduced later.
    pub fn seed_from_time() -> u64 {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        if nanos == 0 {
            0x9e3779b97f4a7c15
        } else {
            nanos
        }
    }

    /// Basic xorshift to generate u32.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        (x >> 32) as u32
    }

    /// Generate a u64 from two consecutive draws.
    pub fn next_u64(&mut self) -> u64 {
        ((self.next_u32() as u64) << 32) | self.next_u32() as u64
    }

    /// Convert to [0, 1].
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / u32::MAX as f64
    }

    /// Uniform sample in [min, max].
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min).abs() * self.next_f64()
    }

    /// Normally distributed sample with the given mean and standard
    /// deviation, via the Box–Muller transform.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let x = self.next_f64().max(f64::MIN_POSITIVE);
        let y = self.next_f64();

        (-2.0 * x.ln()).sqrt() * (2.0 * std::f64::consts::PI * y).cos() * std_dev + mean
    }

    /// Xavier/Glorot sample: uniform in [-1/√n, 1/√n], where `n` is the
    /// neuron's incoming-link count. Suited to sigmoid/tanh layers.
    pub fn xavier(&mut self, n: usize) -> f64 {
        let a = 1.0 / (n.max(1) as f64).sqrt();
        self.uniform(-a, a)
    }

    /// He/Kaiming sample: normal with std √(2/n), where `n` is the neuron's
    /// incoming-link count. Suited to ReLU-family layers.
    pub fn he(&mut self, n: usize) -> f64 {
        let a = (2.0 / n.max(1) as f64).sqrt();
        self.normal(0.0, a)
    }

    /// Integer sample in [0, upper).
    pub fn gen_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            0
        } else {
            (self.next_u32() as usize) % upper
        }
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, data: &mut [T]) {
        if data.len() <= 1 {
            return;
        }
        for i in (1..data.len()).rev() {
            let j = self.gen_usize(i + 1);
            data.swap(i, j);
        }
    }
}
