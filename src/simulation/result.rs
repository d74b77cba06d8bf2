use serde::{Deserialize, Serialize};

use super::ConvergenceCriterion;
use crate::probability::Dimension;
use crate::sampling::SamplingStrategy;

/// Two-sided interval around the weighted mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub level: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }
}

/// Payoff percentile ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Summary of one `simulate` call. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Importance-weighted mean payoff
    pub weighted_mean: f64,
    /// Unweighted mean payoff
    pub mean: f64,
    /// Sample variance of the payoffs
    pub variance: f64,
    pub std_error: f64,
    pub confidence_interval: ConfidenceInterval,
    pub percentiles: Percentiles,
    /// Evaluated samples after burn-in and thinning
    pub sample_count: usize,
    pub effective_sample_size: f64,
    pub converged: bool,
    pub batches: usize,
    pub strategy: SamplingStrategy,
    pub criterion: ConvergenceCriterion,
    /// Echo of the input space
    pub distribution: Vec<Dimension>,
}

impl SimulationResult {
    /// True if every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }

    /// Name and value of the first statistic that is NaN or infinite.
    pub fn first_non_finite(&self) -> Option<(&'static str, f64)> {
        let p = &self.percentiles;
        let ci = &self.confidence_interval;
        [
            ("weighted_mean", self.weighted_mean),
            ("mean", self.mean),
            ("variance", self.variance),
            ("std_error", self.std_error),
            ("effective_sample_size", self.effective_sample_size),
            ("confidence_interval.level", ci.level),
            ("confidence_interval.lower", ci.lower),
            ("confidence_interval.upper", ci.upper),
            ("percentiles.p5", p.p5),
            ("percentiles.p25", p.p25),
            ("percentiles.p50", p.p50),
            ("percentiles.p75", p.p75),
            ("percentiles.p95", p.p95),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
    }
}
