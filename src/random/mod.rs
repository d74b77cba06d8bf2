//! Deterministic random engine
//!
//! Every sampler, the tree search and the risk assessor draw from a single
//! [`RandomEngine`]. With a seed the output sequence is fully reproducible:
//! the 128-bit generator state is the first 16 bytes of the SHA-256 digest of
//! the seed, so nearby seeds still start from unrelated states. Without a seed
//! the state comes from operating-system entropy.
//!
//! # Distributions
//!
//! - `next_float`: uniform on [0, 1) with 53 bits of precision
//! - `next_int`: uniform integer in an inclusive range, rejection sampled
//! - `next_normal`: standard normal via Box–Muller
//! - `next_gamma`: Marsaglia–Tsang, with the `alpha < 1` boost
//! - `next_beta`: ratio of two gamma draws
//! - [`halton`]: low-discrepancy sequence (pure, consumes no state)
//!
//! # Example
//!
//! ```
//! use probsim::random::RandomEngine;
//!
//! let mut a = RandomEngine::new(Some(42));
//! let mut b = RandomEngine::new(Some(42));
//!
//! for _ in 0..100 {
//!     assert_eq!(a.next_float().to_bits(), b.next_float().to_bits());
//! }
//!
//! let p = a.next_beta(2.0, 5.0).unwrap();
//! assert!((0.0..=1.0).contains(&p));
//! ```
//!
//! Concurrent consumers each own their own engine.

mod halton;

pub use halton::{halton, prime_base, PRIMES};

use std::f64::consts::TAU;

use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;
use sha2::{Digest, Sha256};

use crate::error::{Result, SimError};

/// Seedable pseudo-random source backing every sampler in the crate.
#[derive(Debug, Clone)]
pub struct RandomEngine {
    rng: Xoroshiro128PlusPlus,
    seed: Option<u64>,
}

impl RandomEngine {
    /// Create an engine. `Some(seed)` is reproducible, `None` draws from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::from_seed(s),
            None => Self {
                rng: Xoroshiro128PlusPlus::from_entropy(),
                seed: None,
            },
        }
    }

    /// Reproducible engine derived from a SHA-256 hash of `seed`.
    pub fn from_seed(seed: u64) -> Self {
        let digest = Sha256::digest(seed.to_le_bytes());
        let mut state = [0u8; 16];
        state.copy_from_slice(&digest[..16]);

        Self {
            rng: Xoroshiro128PlusPlus::from_seed(state),
            seed: Some(seed),
        }
    }

    /// Seed this engine was built from, if any.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Raw 64 bits from the generator.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Uniform float in [0, 1).
    #[inline]
    pub fn next_float(&mut self) -> f64 {
        // top 53 bits -> exact multiples of 2^-53
        (self.rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform integer in the inclusive range `[min, max]`.
    ///
    /// Draws falling in the incomplete top block of the 64-bit range are
    /// rejected, so every value is exactly equally likely.
    pub fn next_int(&mut self, min: i64, max: i64) -> Result<i64> {
        if min > max {
            return Err(SimError::InvalidRange { min, max });
        }

        let span = (max as i128 - min as i128 + 1) as u128;
        if span > u64::MAX as u128 {
            // full 64-bit range: every raw value is valid
            return Ok(self.rng.next_u64() as i64);
        }

        let span = span as u64;
        let limit = u64::MAX - u64::MAX % span;
        loop {
            let v = self.rng.next_u64();
            if v < limit {
                return Ok((min as i128 + (v % span) as i128) as i64);
            }
        }
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    #[inline]
    pub(crate) fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let span = len as u64;
        let limit = u64::MAX - u64::MAX % span;
        loop {
            let v = self.rng.next_u64();
            if v < limit {
                return (v % span) as usize;
            }
        }
    }

    /// Fisher–Yates shuffle driven by this engine.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }

    /// Standard normal draw (Box–Muller).
    pub fn next_normal(&mut self) -> f64 {
        // 1 - u lies in (0, 1], keeping ln finite
        let u1 = 1.0 - self.next_float();
        let u2 = self.next_float();
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }

    /// Gamma(alpha, 1) draw using the Marsaglia–Tsang method.
    ///
    /// Shapes below 1 are boosted: `Gamma(a) = Gamma(a + 1) * U^(1/a)`.
    pub fn next_gamma(&mut self, alpha: f64) -> Result<f64> {
        check_shape("alpha", alpha)?;
        Ok(self.gamma_unchecked(alpha))
    }

    fn gamma_unchecked(&mut self, alpha: f64) -> f64 {
        if alpha < 1.0 {
            let u = 1.0 - self.next_float();
            return self.gamma_unchecked(alpha + 1.0) * u.powf(1.0 / alpha);
        }

        let d = alpha - 1.0 / 3.0;
        let c = 1.0 / (9.0 * d).sqrt();

        loop {
            let x = self.next_normal();
            let t = 1.0 + c * x;
            if t <= 0.0 {
                continue;
            }
            let v = t * t * t;
            let u = 1.0 - self.next_float();
            let x2 = x * x;

            if u < 1.0 - 0.0331 * x2 * x2 {
                return d * v;
            }
            if u.ln() < 0.5 * x2 + d * (1.0 - v + v.ln()) {
                return d * v;
            }
        }
    }

    /// Beta(alpha, beta) draw as `G(alpha) / (G(alpha) + G(beta))`.
    pub fn next_beta(&mut self, alpha: f64, beta: f64) -> Result<f64> {
        check_shape("alpha", alpha)?;
        check_shape("beta", beta)?;

        let x = self.gamma_unchecked(alpha);
        let y = self.gamma_unchecked(beta);
        let total = x + y;
        if total <= 0.0 {
            // both gammas underflowed (tiny shapes); split the mass by shape
            return Ok(alpha / (alpha + beta));
        }
        Ok(x / total)
    }

    /// Halton radical inverse; see [`halton`].
    #[inline]
    pub fn halton(index: u64, base: u32) -> f64 {
        halton::halton(index, base)
    }
}

#[inline]
fn check_shape(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidShape { name, value })
    }
}
