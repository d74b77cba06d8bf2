//! Sampling strategies
//!
//! Each strategy turns a [`ProbabilitySpace`] and a count `n` into exactly `n`
//! [`Sample`]s with values in [0, 1]. Strategies share nothing but the
//! [`RandomEngine`] they are handed, so their output is a pure function of
//! `(space, n, engine state)`.
//!
//! | Strategy | Idea |
//! |---|---|
//! | `Uniform` | independent U(0,1) per dimension |
//! | `Importance` | draws pulled toward each dimension's normalized weight, reweighted |
//! | `Stratified` | ⌈√n⌉ equal strata visited round-robin |
//! | `Antithetic` | every draw `u` is paired with `1 - u` |
//! | `LatinHypercube` | one sample per stratum per dimension |
//! | `QuasiRandom` | Halton sequence, one prime base per dimension |
//!
//! # Example
//!
//! ```
//! use probsim::probability::ProbabilitySpace;
//! use probsim::random::RandomEngine;
//! use probsim::sampling::{draw, SamplingStrategy};
//!
//! let space = ProbabilitySpace::from_weights([("a", 0.2), ("b", 0.8)]).unwrap();
//! let mut rng = RandomEngine::new(Some(42));
//!
//! let samples = draw(SamplingStrategy::Antithetic, &space, 4, &mut rng).unwrap();
//! assert_eq!(samples.len(), 4);
//! assert_eq!(samples[0].get("a").unwrap() + samples[1].get("a").unwrap(), 1.0);
//! ```

mod importance;
mod quasi;
mod stratified;

pub use importance::importance;
pub use quasi::quasi_random;
pub use stratified::{latin_hypercube, stratified};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::probability::{ProbabilitySpace, Sample};
use crate::random::RandomEngine;

/// The six interchangeable sampling algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    #[default]
    Uniform,
    Importance,
    Stratified,
    Antithetic,
    LatinHypercube,
    QuasiRandom,
}

impl SamplingStrategy {
    pub const ALL: [SamplingStrategy; 6] = [
        SamplingStrategy::Uniform,
        SamplingStrategy::Importance,
        SamplingStrategy::Stratified,
        SamplingStrategy::Antithetic,
        SamplingStrategy::LatinHypercube,
        SamplingStrategy::QuasiRandom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Importance => "importance",
            Self::Stratified => "stratified",
            Self::Antithetic => "antithetic",
            Self::LatinHypercube => "latin_hypercube",
            Self::QuasiRandom => "quasi_random",
        }
    }
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SamplingStrategy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(|c: char| c == '-' || c == ' ', "_");
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == normalized)
            .ok_or_else(|| SimError::UnknownStrategy(s.to_string()))
    }
}

/// Draw `n` samples from `space` with the given strategy.
pub fn draw(
    strategy: SamplingStrategy,
    space: &ProbabilitySpace,
    n: usize,
    rng: &mut RandomEngine,
) -> Result<Vec<Sample>> {
    if n == 0 {
        return Err(SimError::InvalidSampleCount { what: "n", value: 0 });
    }

    let samples = match strategy {
        SamplingStrategy::Uniform => uniform(space, n, rng),
        SamplingStrategy::Importance => importance(space, n, rng),
        SamplingStrategy::Stratified => stratified(space, n, rng),
        SamplingStrategy::Antithetic => antithetic(space, n, rng),
        SamplingStrategy::LatinHypercube => latin_hypercube(space, n, rng),
        SamplingStrategy::QuasiRandom => quasi_random(space, n, rng),
    };
    debug_assert_eq!(samples.len(), n);
    Ok(samples)
}

/// Independent U(0,1) per dimension, unit weight.
pub fn uniform(space: &ProbabilitySpace, n: usize, rng: &mut RandomEngine) -> Vec<Sample> {
    let keys = space.shared_keys();
    let d = space.len();
    (0..n)
        .map(|_| {
            let values = (0..d).map(|_| rng.next_float()).collect();
            Sample::new(keys.clone(), values)
        })
        .collect()
}

/// Pairs each uniform draw `u` with its mirror `1 - u`; odd `n` drops the
/// final mirror.
pub fn antithetic(space: &ProbabilitySpace, n: usize, rng: &mut RandomEngine) -> Vec<Sample> {
    let keys = space.shared_keys();
    let d = space.len();
    let mut out = Vec::with_capacity(n + 1);

    while out.len() < n {
        let u: Vec<f64> = (0..d).map(|_| rng.next_float()).collect();
        let mirror = u.iter().map(|x| 1.0 - x).collect();
        out.push(Sample::new(keys.clone(), u));
        out.push(Sample::new(keys.clone(), mirror));
    }

    out.truncate(n);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> ProbabilitySpace {
        ProbabilitySpace::from_weights([("a", 0.2), ("b", 0.8), ("c", 0.5)]).unwrap()
    }

    #[test]
    fn test_every_strategy_returns_n_samples_in_range() {
        let space = space();
        for strategy in SamplingStrategy::ALL {
            for n in [1, 2, 7, 100] {
                let mut rng = RandomEngine::new(Some(1));
                let samples = draw(strategy, &space, n, &mut rng).unwrap();
                assert_eq!(samples.len(), n, "{} n={}", strategy, n);
                for s in &samples {
                    assert_eq!(s.len(), 3);
                    assert!(s.values().iter().all(|v| (0.0..=1.0).contains(v)), "{}", strategy);
                    assert!(s.weight > 0.0 && s.weight.is_finite());
                }
            }
        }
    }

    #[test]
    fn test_zero_n_rejected() {
        let mut rng = RandomEngine::new(Some(1));
        assert!(matches!(
            draw(SamplingStrategy::Uniform, &space(), 0, &mut rng),
            Err(SimError::InvalidSampleCount { .. })
        ));
    }

    #[test]
    fn test_strategies_are_reproducible() {
        let space = space();
        for strategy in SamplingStrategy::ALL {
            let a = draw(strategy, &space, 50, &mut RandomEngine::new(Some(99))).unwrap();
            let b = draw(strategy, &space, 50, &mut RandomEngine::new(Some(99))).unwrap();
            assert_eq!(a, b, "{}", strategy);
        }
    }

    #[test]
    fn test_antithetic_pairs_sum_to_one() {
        let mut rng = RandomEngine::new(Some(4));
        let samples = antithetic(&space(), 11, &mut rng);
        assert_eq!(samples.len(), 11);
        for pair in samples.chunks_exact(2) {
            for (u, v) in pair[0].values().iter().zip(pair[1].values()) {
                assert_eq!(u + v, 1.0);
            }
        }
    }

    #[test]
    fn test_strategy_identifiers() {
        for strategy in SamplingStrategy::ALL {
            assert_eq!(strategy.as_str().parse::<SamplingStrategy>().unwrap(), strategy);
        }
        assert_eq!("Latin-Hypercube".parse::<SamplingStrategy>().unwrap(), SamplingStrategy::LatinHypercube);
        assert!(matches!("sobol".parse::<SamplingStrategy>(), Err(SimError::UnknownStrategy(_))));

        let json = serde_json::to_string(&SamplingStrategy::QuasiRandom).unwrap();
        assert_eq!(json, "\"quasi_random\"");
    }
}
